use std::collections::HashMap;
use std::sync::Arc;

use gatehouse_core::{
    Credential, Email, OAuthProvider, PhoneNumber, ProviderId, User, UserId, UserStore,
    UserStoreError,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Indexes {
    by_id: HashMap<UserId, User>,
    by_email: HashMap<Email, UserId>,
    by_identity: HashMap<(OAuthProvider, ProviderId), UserId>,
}

/// In-memory user store for tests and local development.
///
/// All indexes live under one lock, so the uniqueness checks in `add_user`
/// and the insert they guard are a single atomic step: of two concurrent
/// inserts for the same email or provider identity, exactly one wins.
#[derive(Clone, Default)]
pub struct HashMapUserStore {
    inner: Arc<RwLock<Indexes>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let mut inner = self.inner.write().await;

        if let Some(email) = user.email() {
            if inner.by_email.contains_key(email) {
                return Err(UserStoreError::UserAlreadyExists);
            }
        }
        if let Credential::Federated {
            provider,
            provider_id,
        } = user.credential()
        {
            if inner
                .by_identity
                .contains_key(&(*provider, provider_id.clone()))
            {
                return Err(UserStoreError::UserAlreadyExists);
            }
        }

        if let Some(email) = user.email() {
            inner.by_email.insert(email.clone(), user.id());
        }
        if let Credential::Federated {
            provider,
            provider_id,
        } = user.credential()
        {
            inner
                .by_identity
                .insert((*provider, provider_id.clone()), user.id());
        }
        inner.by_id.insert(user.id(), user);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        self.inner
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let inner = self.inner.read().await;
        let id = inner.by_email.get(email).ok_or(UserStoreError::UserNotFound)?;
        inner
            .by_id
            .get(id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn find_by_provider_identity(
        &self,
        provider: OAuthProvider,
        provider_id: &ProviderId,
    ) -> Result<User, UserStoreError> {
        let inner = self.inner.read().await;
        let id = inner
            .by_identity
            .get(&(provider, provider_id.clone()))
            .ok_or(UserStoreError::UserNotFound)?;
        inner
            .by_id
            .get(id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn mark_phone_verified(
        &self,
        id: &UserId,
        phone_number: PhoneNumber,
    ) -> Result<(), UserStoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.by_id.get_mut(id).ok_or(UserStoreError::UserNotFound)?;
        user.set_phone_verified(phone_number);
        Ok(())
    }
}
