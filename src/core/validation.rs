//! Encode-side validation for account records
//!
//! Decoding is best-effort, but nothing malformed is allowed back onto disk:
//! a record that would produce a line other tools cannot read aborts the
//! whole encode. Neither may a record that would read back differently:
//! decode trims every line and skips lines starting with `#`, so values at
//! either end of a line must not carry surrounding whitespace and names
//! must not start with `#`.

use crate::error::{AccountError, Result};

/// Lowest uid/gid accepted on encode
///
/// Some platforms use `-2` as the "unprivileged" sentinel id.
pub const MIN_ID: i64 = -2;

/// Validates the identity field of a record
///
/// # Errors
///
/// Returns `InvalidEntry` if the name is empty, starts with `#`, has
/// surrounding whitespace or contains a separator.
///
/// # Examples
///
/// ```
/// use accountdb_rs::core::validation::validate_name;
///
/// assert!(validate_name("root").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("ro:ot").is_err());
/// assert!(validate_name("#svc").is_err());
/// assert!(validate_name(" bob").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AccountError::InvalidEntry("empty name".to_string()));
    }
    if name.starts_with('#') {
        return Err(AccountError::InvalidEntry(format!(
            "name {:?} would be read back as a comment",
            name
        )));
    }
    validate_trimmed("name", name)?;
    validate_field("name", name)
}

/// Validates a numeric id against [`MIN_ID`]
pub fn validate_id(label: &str, id: i64) -> Result<()> {
    if id < MIN_ID {
        return Err(AccountError::InvalidEntry(format!(
            "{} {} is below {}",
            label, id, MIN_ID
        )));
    }
    Ok(())
}

/// Rejects values that would break the line structure
pub fn validate_field(label: &str, value: &str) -> Result<()> {
    if value.contains(':') || value.contains('\n') {
        return Err(AccountError::InvalidEntry(format!(
            "{} {:?} contains a field or line separator",
            label, value
        )));
    }
    Ok(())
}

/// Rejects values with leading or trailing whitespace
///
/// Applies to values that can end up at either end of a line, where decode
/// would trim it away.
pub fn validate_trimmed(label: &str, value: &str) -> Result<()> {
    if value.trim() != value {
        return Err(AccountError::InvalidEntry(format!(
            "{} {:?} has surrounding whitespace",
            label, value
        )));
    }
    Ok(())
}

/// Group members additionally must not contain the list separator
pub fn validate_member(member: &str) -> Result<()> {
    if member.is_empty() || member.contains(',') {
        return Err(AccountError::InvalidEntry(format!(
            "group member {:?} is empty or contains ','",
            member
        )));
    }
    validate_trimmed("group member", member)?;
    validate_field("group member", member)
}
