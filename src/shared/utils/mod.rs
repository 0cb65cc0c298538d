pub mod email_validator;

pub use email_validator::validate_and_normalize_email;
