pub mod config;
pub mod hashing;
pub mod http;
pub mod lookup;
pub mod persistence;
pub mod sessions;
pub mod sms;

pub use config::{Settings, SmsBackend, UserStoreBackend};
pub use hashing::Argon2PasswordHasher;
pub use lookup::{MockLineTypeLookup, TwilioLookupClient};
pub use persistence::{HashMapUserStore, HashMapVerificationCodeStore, PostgresUserStore};
pub use sessions::{JwtConfig, JwtSessionIssuer};
pub use sms::{MockSmsClient, TwilioSmsClient};
