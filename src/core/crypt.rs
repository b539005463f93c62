//! SHA-512-crypt (`$6$`) password hashing
//!
//! Thin layer over `pwhash::sha512_crypt`, producing strings of the form
//! `$6$<salt>$<hash>` (or `$6$rounds=<n>$<salt>$<hash>` when a non-default
//! round count is requested). This is the format `/etc/shadow` expects and
//! `login`, `su`, `passwd` and PAM verify against.

use crate::error::{AccountError, Result};
use pwhash::sha512_crypt;
use rand::Rng;

/// Prefix identifying SHA-512-crypt hashes
pub const PREFIX: &str = "$6$";

/// Length of generated salts
pub const SALT_LENGTH: usize = 8;

/// Longest salt the scheme uses; longer salts are truncated
pub const MAX_SALT_LENGTH: usize = 16;

const ROUNDS_PREFIX: &str = "rounds=";

/// Salt alphabet (the crypt base-64 characters)
const SALT_ALPHABET: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Random salt of [`SALT_LENGTH`] characters from the crypt alphabet
pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LENGTH)
        .map(|_| SALT_ALPHABET[rng.gen_range(0..SALT_ALPHABET.len())] as char)
        .collect()
}

/// Hashes `plaintext` with a fresh random salt and the default round count
///
/// # Examples
///
/// ```
/// use accountdb_rs::core::crypt::{hash_password, verify_password};
///
/// let hash = hash_password("hunter2").unwrap();
/// assert!(hash.starts_with("$6$"));
/// assert!(verify_password("hunter2", &hash));
/// ```
pub fn hash_password(plaintext: &str) -> Result<String> {
    let setting = format!("{}{}", PREFIX, generate_salt());
    hash_with_setting(plaintext, &setting)
}

/// Hashes `plaintext` with the salt and rounds named in `setting`
///
/// `setting` is `$6$[rounds=<n>$]<salt>`, optionally followed by `$` and an
/// existing hash, which is ignored. Salts longer than [`MAX_SALT_LENGTH`]
/// are truncated.
///
/// # Errors
///
/// Returns `PasswordHash` if the setting is not a `$6$` setting, names an
/// invalid round count, or carries a salt that would corrupt the output.
pub fn hash_with_setting(plaintext: &str, setting: &str) -> Result<String> {
    let params = setting.strip_prefix(PREFIX).ok_or_else(|| {
        AccountError::PasswordHash(format!("setting must start with {}", PREFIX))
    })?;

    let (rounds, params) = match params.strip_prefix(ROUNDS_PREFIX) {
        Some(rest) => rest.split_once('$').map(|(count, rest)| (Some(count), rest)).ok_or_else(
            || AccountError::PasswordHash("rounds must be followed by '$'".to_string()),
        )?,
        None => (None, params),
    };
    if let Some(count) = rounds {
        count.parse::<u32>().map_err(|_| {
            AccountError::PasswordHash(format!("invalid rounds value {:?}", count))
        })?;
    }

    let salt = params.split('$').next().unwrap_or_default();
    let salt = &salt[..salt
        .char_indices()
        .nth(MAX_SALT_LENGTH)
        .map_or(salt.len(), |(index, _)| index)];
    if salt.contains(|c: char| c == ':' || c == '\n') {
        return Err(AccountError::PasswordHash(
            "salt contains a field or line separator".to_string(),
        ));
    }

    let setting = match rounds {
        Some(count) => format!("{}{}{}${}", PREFIX, ROUNDS_PREFIX, count, salt),
        None => format!("{}{}", PREFIX, salt),
    };
    sha512_crypt::hash_with(setting.as_str(), plaintext)
        .map_err(|err| AccountError::PasswordHash(err.to_string()))
}

/// Checks `plaintext` against a stored `$6$` hash
///
/// Returns false for anything that is not a SHA-512-crypt hash, including
/// the `!` and `*` placeholders of locked accounts.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    is_sha512_hash(hash) && sha512_crypt::verify(plaintext, hash)
}

/// True if `value` looks like a SHA-512-crypt hash
pub fn is_sha512_hash(value: &str) -> bool {
    value.starts_with(PREFIX) && value[PREFIX.len()..].contains('$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vector() {
        let hash = hash_with_setting("Hello world!", "$6$saltstring").unwrap();
        assert_eq!(
            hash,
            "$6$saltstring$svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1"
        );
    }

    #[test]
    fn test_reference_vector_with_rounds() {
        let hash =
            hash_with_setting("Hello world!", "$6$rounds=10000$saltstringsaltstring").unwrap();
        assert_eq!(
            hash,
            "$6$rounds=10000$saltstringsaltst$OW1/O6BYHV6BcXZu8QVeXbDWra3Oeqh0sbHbbMCVNSnCM/UrjmM0Dp8vOuZeHBy/YTBmSK6H9qs/y3RnOaw5v."
        );
        assert!(verify_password("Hello world!", &hash));
    }

    #[test]
    fn test_generated_salt() {
        let salt = generate_salt();
        assert_eq!(salt.len(), SALT_LENGTH);
        assert!(salt.bytes().all(|b| SALT_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(is_sha512_hash(&hash));
        // $6$ + 8 salt + $ + 86 digest characters
        assert_eq!(hash.len(), 3 + SALT_LENGTH + 1 + 86);
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(hash_with_setting("pw", "$1$salt").is_err());
        assert!(hash_with_setting("pw", "$6$rounds=abc$salt").is_err());
        assert!(hash_with_setting("pw", "$6$sa:lt").is_err());
        assert!(!verify_password("pw", "!"));
        assert!(!verify_password("pw", "*"));
    }

    #[test]
    fn test_empty_password_hashes() {
        let hash = hash_with_setting("", "$6$abcdefgh").unwrap();
        assert!(verify_password("", &hash));
    }
}
