use gatehouse_core::{
    Credential, Email, Password, PasswordHasher, PasswordHasherError, SessionError, SessionIssuer,
    SessionToken, UserId, UserStore, UserStoreError,
};

/// Response from the login use case
#[derive(Debug)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub token: SessionToken,
}

/// Error types specific to the login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Deliberately covers "no such user", "not a password account" and
    /// "wrong password" alike, so a caller cannot probe which emails exist.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    HashingError(#[from] PasswordHasherError),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Login use case - checks an email/password credential and mints a session
pub struct LoginUseCase<U, H, S>
where
    U: UserStore,
    H: PasswordHasher,
    S: SessionIssuer,
{
    user_store: U,
    password_hasher: H,
    session_issuer: S,
}

impl<U, H, S> LoginUseCase<U, H, S>
where
    U: UserStore,
    H: PasswordHasher,
    S: SessionIssuer,
{
    pub fn new(user_store: U, password_hasher: H, session_issuer: S) -> Self {
        Self {
            user_store,
            password_hasher,
            session_issuer,
        }
    }

    /// Execute the login use case
    ///
    /// # Returns
    /// A signed session token on success, `InvalidCredentials` otherwise
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
    ) -> Result<LoginResponse, LoginError> {
        let user = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => LoginError::InvalidCredentials,
                other => LoginError::UserStoreError(other),
            })?;

        // Only email accounts hold a password hash. Federated accounts must
        // come in through their provider, never the password form.
        let Credential::Password(password_hash) = user.credential() else {
            return Err(LoginError::InvalidCredentials);
        };

        if !self.password_hasher.verify(&password, password_hash).await? {
            return Err(LoginError::InvalidCredentials);
        }

        let token = self.session_issuer.issue(&user.id())?;

        Ok(LoginResponse {
            user_id: user.id(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_core::{
        OAuthProvider, PasswordHash, PersonName, PhoneNumber, ProviderId, User,
    };
    use secrecy::{ExposeSecret, Secret};

    use super::*;

    #[derive(Clone)]
    struct SingleUserStore {
        user: User,
    }

    #[async_trait::async_trait]
    impl UserStore for SingleUserStore {
        async fn add_user(&self, _user: User) -> Result<(), UserStoreError> {
            unimplemented!()
        }

        async fn get_user(&self, _id: &UserId) -> Result<User, UserStoreError> {
            unimplemented!()
        }

        async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
            if self.user.email() == Some(email) {
                Ok(self.user.clone())
            } else {
                Err(UserStoreError::UserNotFound)
            }
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
            _id: &UserId,
            _phone_number: PhoneNumber,
        ) -> Result<(), UserStoreError> {
            unimplemented!()
        }
    }

    #[derive(Clone)]
    struct StubHasher;

    #[async_trait::async_trait]
    impl PasswordHasher for StubHasher {
        async fn hash(&self, password: Password) -> Result<PasswordHash, PasswordHasherError> {
            Ok(PasswordHash::new(Secret::new(format!(
                "stub:{}",
                password.as_ref().expose_secret()
            ))))
        }

        async fn verify(
            &self,
            candidate: &Password,
            hash: &PasswordHash,
        ) -> Result<bool, PasswordHasherError> {
            Ok(hash.as_ref().expose_secret()
                == &format!("stub:{}", candidate.as_ref().expose_secret()))
        }
    }

    #[derive(Clone)]
    struct StubIssuer;

    impl SessionIssuer for StubIssuer {
        fn issue(&self, user_id: &UserId) -> Result<SessionToken, SessionError> {
            Ok(SessionToken::new(format!("token-for-{user_id}")))
        }

        fn validate(&self, _token: &str) -> Result<UserId, SessionError> {
            unimplemented!()
        }
    }

    fn email(s: &str) -> Email {
        Email::try_from(Secret::new(s.to_owned())).unwrap()
    }

    fn password(s: &str) -> Password {
        Password::try_from(Secret::new(s.to_owned())).unwrap()
    }

    fn password_user() -> User {
        User::with_password(
            email("test@example.com"),
            PersonName::parse("Test").unwrap(),
            PasswordHash::new(Secret::new("stub:password123".to_owned())),
        )
    }

    #[tokio::test]
    async fn correct_credentials_yield_a_token() {
        let user = password_user();
        let use_case = LoginUseCase::new(SingleUserStore { user: user.clone() }, StubHasher, StubIssuer);

        let response = use_case
            .execute(email("test@example.com"), password("password123"))
            .await
            .unwrap();

        assert_eq!(response.user_id, user.id());
        assert!(response.token.as_str().starts_with("token-for-"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let use_case = LoginUseCase::new(
            SingleUserStore {
                user: password_user(),
            },
            StubHasher,
            StubIssuer,
        );

        let result = use_case
            .execute(email("test@example.com"), password("wrong-password"))
            .await;
        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_identically() {
        let use_case = LoginUseCase::new(
            SingleUserStore {
                user: password_user(),
            },
            StubHasher,
            StubIssuer,
        );

        let result = use_case
            .execute(email("nobody@example.com"), password("password123"))
            .await;
        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn federated_accounts_cannot_login_with_a_password() {
        let user = User::with_federated_identity(
            OAuthProvider::Google,
            ProviderId::parse("g-123").unwrap(),
            email("test@example.com"),
            PersonName::parse("Test").unwrap(),
        );
        let use_case = LoginUseCase::new(SingleUserStore { user }, StubHasher, StubIssuer);

        let result = use_case
            .execute(email("test@example.com"), password("password123"))
            .await;
        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }
}
