pub mod env {
    pub const JWT_SECRET_ENV_VAR: &str = "JWT_SECRET";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const TWILIO_ACCOUNT_SID_ENV_VAR: &str = "TWILIO_ACCOUNT_SID";
    pub const TWILIO_AUTH_TOKEN_ENV_VAR: &str = "TWILIO_AUTH_TOKEN";
    pub const TWILIO_FROM_NUMBER_ENV_VAR: &str = "TWILIO_FROM_NUMBER";
    pub const GOOGLE_CLIENT_ID_ENV_VAR: &str = "GOOGLE_CLIENT_ID";
    pub const APPLE_CLIENT_ID_ENV_VAR: &str = "APPLE_CLIENT_ID";
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const JWT_SECRET: &str = "test-signing-secret";
}
