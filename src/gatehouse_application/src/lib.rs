pub mod use_cases;

pub use use_cases::{
    confirm_phone_code::{ConfirmPhoneCodeError, ConfirmPhoneCodeUseCase},
    link_provider::{LinkProviderError, LinkProviderUseCase, LinkedUser},
    login::{LoginError, LoginResponse, LoginUseCase},
    request_phone_code::{PhoneVerificationPolicy, RequestPhoneCodeError, RequestPhoneCodeUseCase},
    signup::{SignupError, SignupUseCase},
};
