use gatehouse_core::{
    Email, OAuthProvider, PersonName, ProviderId, SessionError, SessionIssuer, SessionToken, User,
    UserId, UserStore, UserStoreError,
};

/// Error types specific to the provider linking use case
#[derive(Debug, thiserror::Error)]
pub enum LinkProviderError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

/// Response from the provider linking use case
#[derive(Debug)]
pub struct LinkedUser {
    pub user_id: UserId,
    pub token: SessionToken,
    pub created: bool,
}

/// Link-or-create use case - associates an external OAuth identity with a
/// local account
pub struct LinkProviderUseCase<U, S>
where
    U: UserStore,
    S: SessionIssuer,
{
    user_store: U,
    session_issuer: S,
}

impl<U, S> LinkProviderUseCase<U, S>
where
    U: UserStore,
    S: SessionIssuer,
{
    pub fn new(user_store: U, session_issuer: S) -> Self {
        Self {
            user_store,
            session_issuer,
        }
    }

    /// Execute the link-or-create use case
    ///
    /// Idempotent: repeated calls with the same `(provider, provider_id)`
    /// return the same user. A lost insert race is resolved by re-fetching
    /// the winner's record instead of surfacing the conflict.
    #[tracing::instrument(name = "LinkProviderUseCase::execute", skip(self, email, name))]
    pub async fn execute(
        &self,
        provider: OAuthProvider,
        provider_id: ProviderId,
        email: Email,
        name: PersonName,
    ) -> Result<LinkedUser, LinkProviderError> {
        match self
            .user_store
            .find_by_provider_identity(provider, &provider_id)
            .await
        {
            Ok(user) => self.issue_for(user.id(), false),
            Err(UserStoreError::UserNotFound) => {
                let user = User::with_federated_identity(provider, provider_id.clone(), email, name);
                let user_id = user.id();

                match self.user_store.add_user(user).await {
                    Ok(()) => self.issue_for(user_id, true),
                    // Lost the race to a concurrent link for the same identity.
                    Err(UserStoreError::UserAlreadyExists) => {
                        let user = self
                            .user_store
                            .find_by_provider_identity(provider, &provider_id)
                            .await?;
                        self.issue_for(user.id(), false)
                    }
                    Err(other) => Err(other.into()),
                }
            }
            Err(other) => Err(other.into()),
        }
    }

    fn issue_for(&self, user_id: UserId, created: bool) -> Result<LinkedUser, LinkProviderError> {
        let token = self.session_issuer.issue(&user_id)?;
        Ok(LinkedUser {
            user_id,
            token,
            created,
        })
    }
}
