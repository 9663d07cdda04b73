pub mod confirm_phone_code;
pub mod error;
pub mod link_provider;
pub mod login;
pub mod request_phone_code;
pub mod signup;
pub mod verify_token;

pub use confirm_phone_code::confirm_phone_code;
pub use error::AuthApiError;
pub use link_provider::link_provider;
pub use login::login;
pub use request_phone_code::request_phone_code;
pub use signup::signup;
pub use verify_token::verify_token;
