use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gatehouse_core::{
    CodeConfirmation, PendingVerification, PhoneNumber, UserId, VerificationCode,
    VerificationCodeStore, VerificationCodeStoreError,
};
use tokio::sync::RwLock;

/// In-memory verification code store.
///
/// The whole confirmation transition runs under the write guard, so a
/// replace-on-request and a concurrent confirm can never both act on the
/// same code.
#[derive(Clone, Default)]
pub struct HashMapVerificationCodeStore {
    codes: Arc<RwLock<HashMap<PhoneNumber, PendingVerification>>>,
}

impl HashMapVerificationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VerificationCodeStore for HashMapVerificationCodeStore {
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
        phone_number: &PhoneNumber,
        submitted: &VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<UserId, VerificationCodeStoreError> {
        let mut codes = self.codes.write().await;
        let Some(pending) = codes.get_mut(phone_number) else {
            return Err(VerificationCodeStoreError::CodeNotFound);
        };

        match pending.confirm(submitted, now) {
            CodeConfirmation::Verified => {
                let user_id = pending.user_id();
                codes.remove(phone_number);
                Ok(user_id)
            }
            CodeConfirmation::Expired => {
                codes.remove(phone_number);
                Err(VerificationCodeStoreError::CodeExpired)
            }
            // The spent record stays so the caller keeps seeing exhaustion
            // rather than a misleading "not found".
            CodeConfirmation::Exhausted => Err(VerificationCodeStoreError::AttemptsExhausted),
            CodeConfirmation::Mismatch { .. } => Err(VerificationCodeStoreError::CodeMismatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use secrecy::Secret;

    use super::*;

    fn phone() -> PhoneNumber {
        PhoneNumber::try_from(Secret::new("+15551234567".to_owned())).unwrap()
    }

    fn code(s: &str) -> VerificationCode {
        VerificationCode::parse(s, s.len()).unwrap()
    }

    fn pending(user_id: UserId, c: &str, max_attempts: u32) -> PendingVerification {
        PendingVerification::new(
            user_id,
            phone(),
            code(c),
            Utc::now(),
            Duration::minutes(10),
            max_attempts,
        )
    }

    #[tokio::test]
    async fn confirm_consumes_the_code() {
        let store = HashMapVerificationCodeStore::new();
        let user_id = UserId::new();
        store.store_code(pending(user_id, "123456", 5)).await.unwrap();

        let confirmed = store
            .confirm_code(&phone(), &code("123456"), Utc::now())
            .await
            .unwrap();
        assert_eq!(confirmed, user_id);

        let replay = store.confirm_code(&phone(), &code("123456"), Utc::now()).await;
        assert_eq!(replay, Err(VerificationCodeStoreError::CodeNotFound));
    }

    #[tokio::test]
    async fn expired_code_is_discarded_on_confirm() {
        let store = HashMapVerificationCodeStore::new();
        store.store_code(pending(UserId::new(), "123456", 5)).await.unwrap();

        let later = Utc::now() + Duration::minutes(11);
        let result = store.confirm_code(&phone(), &code("123456"), later).await;
        assert_eq!(result, Err(VerificationCodeStoreError::CodeExpired));

        // Discarded, not retried as expired forever.
        let again = store.confirm_code(&phone(), &code("123456"), later).await;
        assert_eq!(again, Err(VerificationCodeStoreError::CodeNotFound));
    }

    #[tokio::test]
    async fn worked_example_from_the_verification_flow() {
        // 6-digit code, 5 attempts: one wrong submission costs an attempt,
        // the right code then verifies.
        let store = HashMapVerificationCodeStore::new();
        let user_id = UserId::new();
        store.store_code(pending(user_id, "429183", 5)).await.unwrap();

        let wrong = store.confirm_code(&phone(), &code("000000"), Utc::now()).await;
        assert_eq!(wrong, Err(VerificationCodeStoreError::CodeMismatch));

        let right = store
            .confirm_code(&phone(), &code("429183"), Utc::now())
            .await
            .unwrap();
        assert_eq!(right, user_id);
    }

    #[tokio::test]
    async fn exhaustion_is_reported_even_for_the_correct_code() {
        let store = HashMapVerificationCodeStore::new();
        store.store_code(pending(UserId::new(), "123456", 1)).await.unwrap();

        let wrong = store.confirm_code(&phone(), &code("000000"), Utc::now()).await;
        assert_eq!(wrong, Err(VerificationCodeStoreError::CodeMismatch));

        let right = store.confirm_code(&phone(), &code("123456"), Utc::now()).await;
        assert_eq!(right, Err(VerificationCodeStoreError::AttemptsExhausted));
    }

    #[tokio::test]
    async fn replacement_invalidates_the_previous_code() {
        let store = HashMapVerificationCodeStore::new();
        let user_id = UserId::new();
        store.store_code(pending(user_id, "111111", 5)).await.unwrap();
        store.store_code(pending(user_id, "222222", 5)).await.unwrap();

        let stale = store.confirm_code(&phone(), &code("111111"), Utc::now()).await;
        assert_eq!(stale, Err(VerificationCodeStoreError::CodeMismatch));

        let fresh = store.confirm_code(&phone(), &code("222222"), Utc::now()).await;
        assert_eq!(fresh, Ok(user_id));
    }
}
