//! # Gatehouse - Authentication Service Library
//!
//! This is a facade crate that re-exports all public APIs from the gatehouse service components.
//! Use this crate to get access to all authentication functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! gatehouse = { path = "../gatehouse" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `PhoneNumber`, `User`, etc.
//! - **Repository traits**: `UserStore`, `VerificationCodeStore`
//! - **Use cases**: `SignupUseCase`, `LoginUseCase`, `LinkProviderUseCase`, etc.
//! - **Adapters**: `PostgresUserStore`, `Argon2PasswordHasher`, `TwilioSmsClient`, etc.
//! - **Service**: `AuthService` - The main entry point for the auth service

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use gatehouse_core::*;
}

// Re-export most commonly used core types at the root level
pub use gatehouse_core::{
    Credential, Email, OAuthProvider, Password, PasswordHash, PersonName, PhoneNumber, Provider,
    ProviderId, User, UserError, UserId, VerificationCode, VerificationCodeError,
};

// ============================================================================
// Repository Traits (Ports)
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use gatehouse_core::{
        UserStore, UserStoreError, VerificationCodeStore, VerificationCodeStoreError,
    };
}

// Re-export ports at root level
pub use gatehouse_core::{
    LineType, LineTypeLookup, PasswordHasher, SessionError, SessionIssuer, SessionToken,
    SmsClient, UserStore, UserStoreError, VerificationCodeStore, VerificationCodeStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use gatehouse_application::*;
}

// Re-export use cases at root level
pub use gatehouse_application::{
    ConfirmPhoneCodeUseCase, LinkProviderUseCase, LoginUseCase, PhoneVerificationPolicy,
    RequestPhoneCodeUseCase, SignupUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers
    pub mod http {
        pub use gatehouse_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use gatehouse_adapters::persistence::*;
    }

    /// Password hashing
    pub mod hashing {
        pub use gatehouse_adapters::hashing::*;
    }

    /// Session issuing and validation
    pub mod sessions {
        pub use gatehouse_adapters::sessions::*;
    }

    /// SMS delivery
    pub mod sms {
        pub use gatehouse_adapters::sms::*;
    }

    /// Phone line type lookup
    pub mod lookup {
        pub use gatehouse_adapters::lookup::*;
    }

    /// Configuration
    pub mod config {
        pub use gatehouse_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use gatehouse_adapters::{
    Argon2PasswordHasher, HashMapUserStore, HashMapVerificationCodeStore, JwtConfig,
    JwtSessionIssuer, MockLineTypeLookup, MockSmsClient, PostgresUserStore, Settings,
    TwilioLookupClient, TwilioSmsClient,
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

/// Main auth service
pub use gatehouse_service::{AllowedOrigins, AuthService};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
