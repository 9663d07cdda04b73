use chrono::{Duration, Utc};
use gatehouse_core::{
    LineType, LineTypeLookup, PendingVerification, PhoneNumber, SmsClient, UserId,
    VerificationCode, VerificationCodeStore, VerificationCodeStoreError,
};

/// Tunables for phone verification. The defaults are conservative, not
/// mandated; override them through configuration.
#[derive(Debug, Clone, Copy)]
pub struct PhoneVerificationPolicy {
    pub code_length: usize,
    pub code_ttl: Duration,
    pub max_attempts: u32,
    pub reject_voip: bool,
}

impl Default for PhoneVerificationPolicy {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_ttl: Duration::minutes(10),
            max_attempts: 5,
            reject_voip: false,
        }
    }
}

/// Error types specific to the code request use case
#[derive(Debug, thiserror::Error)]
pub enum RequestPhoneCodeError {
    #[error("VoIP numbers cannot be used for phone verification")]
    VoipRejected,
    #[error("Line type lookup failed: {0}")]
    LookupFailed(String),
    #[error("Failed to deliver verification code: {0}")]
    DeliveryFailed(String),
    #[error("Verification code store error: {0}")]
    CodeStoreError(#[from] VerificationCodeStoreError),
}

/// Request-code use case - issues and dispatches a one-time phone code
pub struct RequestPhoneCodeUseCase<V, M, L>
where
    V: VerificationCodeStore,
    M: SmsClient,
    L: LineTypeLookup,
{
    code_store: V,
    sms_client: M,
    line_type_lookup: L,
    policy: PhoneVerificationPolicy,
}

impl<V, M, L> RequestPhoneCodeUseCase<V, M, L>
where
    V: VerificationCodeStore,
    M: SmsClient,
    L: LineTypeLookup,
{
    pub fn new(
        code_store: V,
        sms_client: M,
        line_type_lookup: L,
        policy: PhoneVerificationPolicy,
    ) -> Self {
        Self {
            code_store,
            sms_client,
            line_type_lookup,
            policy,
        }
    }

    /// Execute the request-code use case
    ///
    /// Dispatch happens before the code is stored: a delivery failure must
    /// not leave behind a pending code the user believes was sent. Storing
    /// afterwards overwrites any earlier pending code for the number, so at
    /// most one code per number is ever confirmable.
    #[tracing::instrument(name = "RequestPhoneCodeUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        user_id: UserId,
        phone_number: PhoneNumber,
    ) -> Result<(), RequestPhoneCodeError> {
        if self.policy.reject_voip {
            let line_type = self
                .line_type_lookup
                .classify(&phone_number)
                .await
                .map_err(RequestPhoneCodeError::LookupFailed)?;
            if line_type == LineType::Voip {
                return Err(RequestPhoneCodeError::VoipRejected);
            }
        }

        let code = VerificationCode::generate(self.policy.code_length);
        let body = format!(
            "Your verification code is {}. It expires in {} minutes.",
            code.as_str(),
            self.policy.code_ttl.num_minutes()
        );

        self.sms_client
            .send_sms(&phone_number, &body)
            .await
            .map_err(RequestPhoneCodeError::DeliveryFailed)?;

        let pending = PendingVerification::new(
            user_id,
            phone_number,
            code,
            Utc::now(),
            self.policy.code_ttl,
            self.policy.max_attempts,
        );
        self.code_store.store_code(pending).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::{DateTime, Utc};
    use secrecy::Secret;
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Clone, Default)]
    struct MockCodeStore {
        codes: Arc<RwLock<HashMap<PhoneNumber, PendingVerification>>>,
    }

    #[async_trait::async_trait]
    impl VerificationCodeStore for MockCodeStore {
        async fn store_code(
            &self,
            pending: PendingVerification,
        ) -> Result<(), VerificationCodeStoreError> {
            self.codes
                .write()
                .await
                .insert(pending.phone_number().clone(), pending);
            Ok(())
        }

        async fn confirm_code(
            &self,
            _phone_number: &PhoneNumber,
            _submitted: &VerificationCode,
            _now: DateTime<Utc>,
        ) -> Result<UserId, VerificationCodeStoreError> {
            unimplemented!()
        }
    }

    #[derive(Clone, Default)]
    struct MockSms {
        sent: Arc<RwLock<Vec<String>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl SmsClient for MockSms {
        async fn send_sms(&self, _recipient: &PhoneNumber, body: &str) -> Result<(), String> {
            if self.fail {
                return Err("carrier unavailable".to_owned());
            }
            self.sent.write().await.push(body.to_owned());
            Ok(())
        }
    }

    #[derive(Clone)]
    struct FixedLookup(LineType);

    #[async_trait::async_trait]
    impl LineTypeLookup for FixedLookup {
        async fn classify(&self, _phone_number: &PhoneNumber) -> Result<LineType, String> {
            Ok(self.0)
        }
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::try_from(Secret::new("+15551234567".to_owned())).unwrap()
    }

    #[tokio::test]
    async fn issues_a_code_of_policy_length() {
        let store = MockCodeStore::default();
        let sms = MockSms::default();
        let use_case = RequestPhoneCodeUseCase::new(
            store.clone(),
            sms.clone(),
            FixedLookup(LineType::Mobile),
            PhoneVerificationPolicy::default(),
        );

        use_case.execute(UserId::new(), phone()).await.unwrap();

        let codes = store.codes.read().await;
        let pending = codes.get(&phone()).expect("code stored");
        assert_eq!(pending.attempts_remaining(), 5);
        assert_eq!(sms.sent.read().await.len(), 1);
    }

    #[tokio::test]
    async fn delivery_failure_leaves_no_pending_code() {
        let store = MockCodeStore::default();
        let sms = MockSms {
            fail: true,
            ..Default::default()
        };
        let use_case = RequestPhoneCodeUseCase::new(
            store.clone(),
            sms,
            FixedLookup(LineType::Mobile),
            PhoneVerificationPolicy::default(),
        );

        let result = use_case.execute(UserId::new(), phone()).await;
        assert!(matches!(result, Err(RequestPhoneCodeError::DeliveryFailed(_))));
        assert!(store.codes.read().await.is_empty());
    }

    #[tokio::test]
    async fn voip_numbers_are_rejected_when_gated() {
        let policy = PhoneVerificationPolicy {
            reject_voip: true,
            ..Default::default()
        };
        let use_case = RequestPhoneCodeUseCase::new(
            MockCodeStore::default(),
            MockSms::default(),
            FixedLookup(LineType::Voip),
            policy,
        );

        let result = use_case.execute(UserId::new(), phone()).await;
        assert!(matches!(result, Err(RequestPhoneCodeError::VoipRejected)));
    }

    #[tokio::test]
    async fn voip_gate_is_off_by_default() {
        let store = MockCodeStore::default();
        let use_case = RequestPhoneCodeUseCase::new(
            store.clone(),
            MockSms::default(),
            FixedLookup(LineType::Voip),
            PhoneVerificationPolicy::default(),
        );

        use_case.execute(UserId::new(), phone()).await.unwrap();
        assert_eq!(store.codes.read().await.len(), 1);
    }

    #[tokio::test]
    async fn a_new_request_replaces_the_previous_code() {
        let store = MockCodeStore::default();
        let use_case = RequestPhoneCodeUseCase::new(
            store.clone(),
            MockSms::default(),
            FixedLookup(LineType::Mobile),
            PhoneVerificationPolicy::default(),
        );
        let user_id = UserId::new();

        use_case.execute(user_id, phone()).await.unwrap();
        let first_issued = store.codes.read().await.get(&phone()).unwrap().issued_at();

        use_case.execute(user_id, phone()).await.unwrap();
        let codes = store.codes.read().await;
        assert_eq!(codes.len(), 1);
        assert!(codes.get(&phone()).unwrap().issued_at() >= first_issued);
    }
}
