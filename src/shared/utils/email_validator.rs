use crate::domain::errors::{DomainError, DomainResult};

/// Validate an agent email used as an action value and normalize it to lowercase
pub fn validate_and_normalize_email(email: &str) -> DomainResult<String> {
    let trimmed = email.trim();

    if !email_address::EmailAddress::is_valid(trimmed) {
        return Err(DomainError::ValidationError(
            "Must be a valid email address (user@domain.tld)".to_string(),
        ));
    }

    // email_address accepts dotless domains; agents always live under a TLD
    if let Some(at_pos) = trimmed.find('@') {
        let domain_part = &trimmed[at_pos + 1..];
        if !domain_part.contains('.') {
            return Err(DomainError::ValidationError(
                "Email domain must include a TLD (e.g., .com, .org)".to_string(),
            ));
        }
    }

    Ok(trimmed.to_lowercase())
}
