//! Sign-in email validation.

use regex::Regex;

use crate::error::AccessError;

/// Lower-case `email` and check it is a plain address on `domain`.
pub fn normalize_email(email: &str, domain: &str) -> Result<String, AccessError> {
    let pattern = format!(r"^[a-zA-Z0-9._%+-]+@{}$", regex::escape(domain));
    let re = Regex::new(&pattern).map_err(|e| AccessError::Internal(format!("email pattern: {e}")))?;

    let email = email.trim().to_lowercase();
    if re.is_match(&email) {
        Ok(email)
    } else {
        Err(AccessError::InvalidEmail {
            domain: domain.to_string(),
        })
    }
}
