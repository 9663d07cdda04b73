pub mod hashmap_user_store;
pub mod hashmap_verification_code_store;
pub mod postgres_user_store;

pub use hashmap_user_store::HashMapUserStore;
pub use hashmap_verification_code_store::HashMapVerificationCodeStore;
pub use postgres_user_store::PostgresUserStore;
