pub mod confirm_phone_code;
pub mod link_provider;
pub mod login;
pub mod request_phone_code;
pub mod signup;
