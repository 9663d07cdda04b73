use argon2::{
    Algorithm, Argon2, Params, PasswordVerifier, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core},
};
use async_trait::async_trait;
use gatehouse_core::{Password, PasswordHash, PasswordHasher, PasswordHasherError};
use secrecy::{ExposeSecret, Secret};

/// Argon2id password hasher.
///
/// Hashing and verification are CPU-bound, so both run on the blocking
/// pool with the current span carried along.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            memory_kib: 15000,
            iterations: 2,
            parallelism: 1,
        }
    }

    /// Override the cost parameters, e.g. to keep tests fast.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordHasherError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHasherError(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: Password) -> Result<PasswordHash, PasswordHasherError> {
        let hasher = self.hasher()?;
        let current_span = tracing::Span::current();

        let phc_string = tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt = SaltString::generate(rand_core::OsRng);
                hasher
                    .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                    .map(|h| h.to_string())
                    .map_err(|e| PasswordHasherError(e.to_string()))
            })
        })
        .await
        .map_err(|e| PasswordHasherError(e.to_string()))??;

        Ok(PasswordHash::new(Secret::new(phc_string)))
    }

    #[tracing::instrument(name = "Verifying password hash", skip_all)]
    async fn verify(
        &self,
        candidate: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let hasher = self.hasher()?;
        let candidate = candidate.clone();
        let expected = hash.clone();
        let current_span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let parsed = argon2::PasswordHash::new(expected.as_ref().expose_secret())
                    .map_err(|e| PasswordHasherError(e.to_string()))?;

                match hasher
                    .verify_password(candidate.as_ref().expose_secret().as_bytes(), &parsed)
                {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordHasherError(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| PasswordHasherError(e.to_string()))?
    }
}
