use chrono::{DateTime, Utc};
use gatehouse_core::{
    Credential, Email, OAuthProvider, PasswordHash, PersonName, PhoneNumber, ProviderId, User,
    UserId, UserStore, UserStoreError,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Durable user store. Uniqueness of `email` and `(provider, provider_id)`
/// is enforced by database constraints, so concurrent inserts for the same
/// identity resolve in the database, not in this process.
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, email, name, provider, password_hash, provider_id, \
                              phone_number, phone_verified, created_at FROM users";

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let (provider, password_hash, provider_id) = match user.credential() {
            Credential::Password(hash) => (
                "email",
                Some(hash.as_ref().expose_secret().clone()),
                None,
            ),
            Credential::Federated {
                provider,
                provider_id,
            } => (
                match provider {
                    OAuthProvider::Google => "google",
                    OAuthProvider::Apple => "apple",
                },
                None,
                Some(provider_id.as_str().to_owned()),
            ),
        };

        let user_id = user.id();
        let query = sqlx::query(
            r#"
                INSERT INTO users
                    (id, email, name, provider, password_hash, provider_id,
                     phone_number, phone_verified, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(user.email().map(|e| e.as_ref().expose_secret().clone()))
        .bind(user.name().as_str())
        .bind(provider)
        .bind(password_hash)
        .bind(provider_id)
        .bind(
            user.phone_number()
                .map(|p| p.as_ref().expose_secret().clone()),
        )
        .bind(user.phone_verified())
        .bind(user.created_at());

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserStoreError::UserAlreadyExists;
                }
            }
            UserStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.map(user_from_row)
            .transpose()?
            .ok_or(UserStoreError::UserNotFound)
    }

    #[tracing::instrument(name = "Finding user by email in PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE email = $1"))
            .bind(email.as_ref().expose_secret())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.map(user_from_row)
            .transpose()?
            .ok_or(UserStoreError::UserNotFound)
    }

    #[tracing::instrument(name = "Finding user by provider identity in PostgreSQL", skip_all)]
    async fn find_by_provider_identity(
        &self,
        provider: OAuthProvider,
        provider_id: &ProviderId,
    ) -> Result<User, UserStoreError> {
        let row = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE provider = $1 AND provider_id = $2"
        ))
        .bind(provider.to_string())
        .bind(provider_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.map(user_from_row)
            .transpose()?
            .ok_or(UserStoreError::UserNotFound)
    }

    #[tracing::instrument(name = "Marking phone verified in PostgreSQL", skip_all)]
    async fn mark_phone_verified(
        &self,
        id: &UserId,
        phone_number: PhoneNumber,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE users
                SET phone_number = $1, phone_verified = TRUE
                WHERE id = $2
            "#,
        )
        .bind(phone_number.as_ref().expose_secret())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }
        Ok(())
    }
}

/// Rebuild a domain user from a row, re-checking the credential invariant.
/// A row violating it means the table was written around this store, which
/// is corruption, not a domain state.
fn user_from_row(row: PgRow) -> Result<User, UserStoreError> {
    let unexpected = |msg: String| UserStoreError::UnexpectedError(msg);

    let id: Uuid = row.try_get("id").map_err(|e| unexpected(e.to_string()))?;
    let email: Option<String> = row.try_get("email").map_err(|e| unexpected(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| unexpected(e.to_string()))?;
    let provider: String = row
        .try_get("provider")
        .map_err(|e| unexpected(e.to_string()))?;
    let password_hash: Option<String> = row
        .try_get("password_hash")
        .map_err(|e| unexpected(e.to_string()))?;
    let provider_id: Option<String> = row
        .try_get("provider_id")
        .map_err(|e| unexpected(e.to_string()))?;
    let phone_number: Option<String> = row
        .try_get("phone_number")
        .map_err(|e| unexpected(e.to_string()))?;
    let phone_verified: bool = row
        .try_get("phone_verified")
        .map_err(|e| unexpected(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| unexpected(e.to_string()))?;

    let credential = match (provider.as_str(), password_hash, provider_id) {
        ("email", Some(hash), None) => Credential::Password(PasswordHash::new(Secret::new(hash))),
        (tag @ ("google" | "apple"), None, Some(provider_id)) => Credential::Federated {
            provider: tag
                .parse::<OAuthProvider>()
                .map_err(|e| unexpected(e.to_string()))?,
            provider_id: ProviderId::parse(provider_id).map_err(|e| unexpected(e.to_string()))?,
        },
        (tag, _, _) => {
            return Err(unexpected(format!(
                "user row {id} violates the credential invariant (provider '{tag}')"
            )));
        }
    };

    let email = email
        .map(|e| Email::try_from(Secret::new(e)))
        .transpose()
        .map_err(|e| unexpected(e.to_string()))?;
    let phone_number = phone_number
        .map(|p| PhoneNumber::try_from(Secret::new(p)))
        .transpose()
        .map_err(|e| unexpected(e.to_string()))?;
    let name = PersonName::parse(name).map_err(|e| unexpected(e.to_string()))?;

    Ok(User::from_parts(
        UserId::parse(&id.to_string()).map_err(|e| unexpected(e.to_string()))?,
        email,
        name,
        credential,
        phone_number,
        phone_verified,
        created_at,
    ))
}
