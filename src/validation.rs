//! Input validation before values reach a process or shell.

use crate::{OplaunchError, Result};

/// Characters that could enable command injection in a shell command line.
const DANGEROUS_CHARS: &str = ";|&$`<>(){}[]!*?~#%^\\\"' ";

/// Maximum allowed length for ids, field names and accounts.
const MAX_LENGTH: usize = 255;

fn check_common(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(OplaunchError::InvalidInput(format!("{} cannot be empty", kind)));
    }

    if value.len() > MAX_LENGTH {
        return Err(OplaunchError::InvalidInput(format!(
            "{} exceeds maximum length of {} characters",
            kind, MAX_LENGTH
        )));
    }

    if value.chars().any(|c| c.is_control()) {
        return Err(OplaunchError::InvalidInput(format!(
            "{} contains control characters",
            kind
        )));
    }

    Ok(())
}

/// Validates an item id or field name passed as a process argument.
///
/// Arguments never go through a shell, so only emptiness, control characters
/// and a leading `-` (which `op` would parse as a flag) are rejected.
///
/// # Example
///
/// ```
/// use oplaunch::validation::validate_item_ref;
///
/// assert!(validate_item_ref("nqikjvb2nm6wasp4y3ru5ikb3e").is_ok());
/// assert!(validate_item_ref("one-time password").is_ok());
/// assert!(validate_item_ref("--vault=x").is_err());
/// ```
pub fn validate_item_ref(value: &str) -> Result<()> {
    check_common("item reference", value)?;

    if value.starts_with('-') {
        return Err(OplaunchError::InvalidInput(
            "item reference cannot start with '-'".to_string(),
        ));
    }

    Ok(())
}

/// Validates an account identifier interpolated into the sign-in shell command.
///
/// # Example
///
/// ```
/// use oplaunch::validation::validate_account;
///
/// assert!(validate_account("my.1password.com").is_ok());
/// assert!(validate_account("me@example.com").is_ok());
/// assert!(validate_account("x; rm -rf /").is_err());
/// ```
pub fn validate_account(value: &str) -> Result<()> {
    check_common("account", value)?;

    if value.starts_with('-') {
        return Err(OplaunchError::InvalidInput(
            "account cannot start with '-'".to_string(),
        ));
    }

    if value.chars().any(|c| DANGEROUS_CHARS.contains(c)) {
        return Err(OplaunchError::InvalidInput(
            "account contains shell metacharacters".to_string(),
        ));
    }

    Ok(())
}
