//! Hostname validation

use crate::error::ResolverError;

/// Validate hostname format before it is handed to the resolver
///
/// # Errors
///
/// Returns [`ResolverError::InvalidHostname`] if:
/// - Hostname is empty
/// - Hostname exceeds maximum length (253 characters per DNS standards)
/// - Hostname contains invalid characters (non-ASCII, spaces, or forbidden symbols)
/// - A label is empty, longer than 63 characters, or starts/ends with a hyphen
pub fn validate_hostname(hostname: &str) -> Result<(), ResolverError> {
    if hostname.is_empty() {
        return Err(ResolverError::invalid_hostname("empty hostname"));
    }
    if hostname.len() > 253 {
        return Err(ResolverError::invalid_hostname(
            "hostname too long (max 253 characters)",
        ));
    }

    if !hostname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ResolverError::invalid_hostname(format!(
            "invalid characters in {hostname}"
        )));
    }

    for label in hostname.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(ResolverError::invalid_hostname(format!(
                "invalid label length in {hostname}"
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ResolverError::invalid_hostname(format!(
                "invalid label format in {hostname}"
            )));
        }
    }

    Ok(())
}
