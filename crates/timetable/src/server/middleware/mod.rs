pub mod role_validator;
pub mod session_validator;
