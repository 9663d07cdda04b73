use chrono::Utc;
use gatehouse_core::{
    PhoneNumber, UserId, UserStore, UserStoreError, VerificationCode, VerificationCodeStore,
    VerificationCodeStoreError,
};

/// Error types specific to the code confirmation use case
#[derive(Debug, thiserror::Error)]
pub enum ConfirmPhoneCodeError {
    #[error("No pending code for this phone number")]
    CodeNotFound,
    #[error("Verification code has expired")]
    CodeExpired,
    #[error("Incorrect verification code")]
    CodeMismatch,
    #[error("No verification attempts remaining")]
    AttemptsExhausted,
    #[error("Verification code store error: {0}")]
    CodeStoreError(VerificationCodeStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

impl From<VerificationCodeStoreError> for ConfirmPhoneCodeError {
    fn from(error: VerificationCodeStoreError) -> Self {
        match error {
            VerificationCodeStoreError::CodeNotFound => Self::CodeNotFound,
            VerificationCodeStoreError::CodeExpired => Self::CodeExpired,
            VerificationCodeStoreError::CodeMismatch => Self::CodeMismatch,
            VerificationCodeStoreError::AttemptsExhausted => Self::AttemptsExhausted,
            other => Self::CodeStoreError(other),
        }
    }
}

/// Confirm-code use case - checks a submitted code and marks the user's
/// phone number as verified
pub struct ConfirmPhoneCodeUseCase<V, U>
where
    V: VerificationCodeStore,
    U: UserStore,
{
    code_store: V,
    user_store: U,
}

impl<V, U> ConfirmPhoneCodeUseCase<V, U>
where
    V: VerificationCodeStore,
    U: UserStore,
{
    pub fn new(code_store: V, user_store: U) -> Self {
        Self {
            code_store,
            user_store,
        }
    }

    /// Execute the confirm-code use case
    ///
    /// # Returns
    /// The id of the now phone-verified user
    #[tracing::instrument(name = "ConfirmPhoneCodeUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        phone_number: PhoneNumber,
        submitted: VerificationCode,
    ) -> Result<UserId, ConfirmPhoneCodeError> {
        let user_id = self
            .code_store
            .confirm_code(&phone_number, &submitted, Utc::now())
            .await?;

        self.user_store
            .mark_phone_verified(&user_id, phone_number)
            .await?;

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::{DateTime, Duration};
    use gatehouse_core::{CodeConfirmation, Email, OAuthProvider, PendingVerification, ProviderId, User};
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
                CodeConfirmation::Exhausted => Err(VerificationCodeStoreError::AttemptsExhausted),
                CodeConfirmation::Mismatch { .. } => Err(VerificationCodeStoreError::CodeMismatch),
            }
        }
    }

    #[derive(Clone, Default)]
    struct MockUserStore {
        verified: Arc<RwLock<Vec<UserId>>>,
    }

    #[async_trait::async_trait]
    impl UserStore for MockUserStore {
        async fn add_user(&self, _user: User) -> Result<(), UserStoreError> {
            unimplemented!()
        }

        async fn get_user(&self, _id: &UserId) -> Result<User, UserStoreError> {
            unimplemented!()
        }

        async fn find_by_email(&self, _email: &Email) -> Result<User, UserStoreError> {
            unimplemented!()
        }

        async fn find_by_provider_identity(
            &self,
            _provider: OAuthProvider,
            _provider_id: &ProviderId,
        ) -> Result<User, UserStoreError> {
            unimplemented!()
        }

        async fn mark_phone_verified(
            &self,
            id: &UserId,
            _phone_number: PhoneNumber,
        ) -> Result<(), UserStoreError> {
            self.verified.write().await.push(*id);
            Ok(())
        }
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::try_from(Secret::new("+15551234567".to_owned())).unwrap()
    }

    fn code(s: &str) -> VerificationCode {
        VerificationCode::parse(s, s.len()).unwrap()
    }

    async fn seed(store: &MockCodeStore, user_id: UserId, code_str: &str, max_attempts: u32) {
        store
            .store_code(PendingVerification::new(
                user_id,
                phone(),
                code(code_str),
                Utc::now(),
                Duration::minutes(10),
                max_attempts,
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn correct_code_marks_the_user_verified_exactly_once() {
        let code_store = MockCodeStore::default();
        let user_store = MockUserStore::default();
        let user_id = UserId::new();
        seed(&code_store, user_id, "123456", 5).await;

        let use_case = ConfirmPhoneCodeUseCase::new(code_store, user_store.clone());
        let confirmed = use_case.execute(phone(), code("123456")).await.unwrap();
        assert_eq!(confirmed, user_id);
        assert_eq!(user_store.verified.read().await.as_slice(), &[user_id]);

        // The code was consumed; a replay cannot verify again.
        let replay = use_case.execute(phone(), code("123456")).await;
        assert!(matches!(replay, Err(ConfirmPhoneCodeError::CodeNotFound)));
        assert_eq!(user_store.verified.read().await.len(), 1);
    }

    #[tokio::test]
    async fn mismatch_then_correct_code_succeeds() {
        let code_store = MockCodeStore::default();
        let user_store = MockUserStore::default();
        seed(&code_store, UserId::new(), "123456", 5).await;

        let use_case = ConfirmPhoneCodeUseCase::new(code_store, user_store);
        let wrong = use_case.execute(phone(), code("000000")).await;
        assert!(matches!(wrong, Err(ConfirmPhoneCodeError::CodeMismatch)));

        assert!(use_case.execute(phone(), code("123456")).await.is_ok());
    }

    #[tokio::test]
    async fn exhausting_the_budget_blocks_the_correct_code() {
        let code_store = MockCodeStore::default();
        let user_store = MockUserStore::default();
        seed(&code_store, UserId::new(), "123456", 2).await;

        let use_case = ConfirmPhoneCodeUseCase::new(code_store, user_store.clone());
        for _ in 0..2 {
            let result = use_case.execute(phone(), code("000000")).await;
            assert!(matches!(result, Err(ConfirmPhoneCodeError::CodeMismatch)));
        }

        let result = use_case.execute(phone(), code("123456")).await;
        assert!(matches!(result, Err(ConfirmPhoneCodeError::AttemptsExhausted)));
        assert!(user_store.verified.read().await.is_empty());
    }

    #[tokio::test]
    async fn missing_code_reports_not_found() {
        let use_case = ConfirmPhoneCodeUseCase::new(MockCodeStore::default(), MockUserStore::default());
        let result = use_case.execute(phone(), code("123456")).await;
        assert!(matches!(result, Err(ConfirmPhoneCodeError::CodeNotFound)));
    }
}
