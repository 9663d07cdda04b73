use gatehouse_core::{
    Email, Password, PasswordHasher, PasswordHasherError, PersonName, User, UserId, UserStore,
    UserStoreError,
};

/// Error types specific to the signup use case
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("{0}")]
    HashingError(#[from] PasswordHasherError),
}

/// Signup use case - registers a new email/password account
pub struct SignupUseCase<U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: U,
    password_hasher: H,
}

impl<U, H> SignupUseCase<U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    pub fn new(user_store: U, password_hasher: H) -> Self {
        Self {
            user_store,
            password_hasher,
        }
    }

    /// Execute the signup use case
    ///
    /// Hashes the password and inserts the new user. The store's uniqueness
    /// guarantee makes duplicate signups race-safe: exactly one of two
    /// concurrent calls for the same email succeeds.
    ///
    /// # Returns
    /// The new user's id, or `UserAlreadyExists` for a duplicate email
    #[tracing::instrument(name = "SignupUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: Email,
        name: PersonName,
        password: Password,
    ) -> Result<UserId, SignupError> {
        let password_hash = self.password_hasher.hash(password).await?;
        let user = User::with_password(email, name, password_hash);
        let user_id = user.id();

        self.user_store.add_user(user).await?;

        Ok(user_id)
    }
}
