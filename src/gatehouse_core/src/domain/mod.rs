pub mod email;
pub mod password;
pub mod phone_number;
pub mod provider;
pub mod user;
pub mod verification;
