//! Shadow table (`/etc/shadow`)
//!
//! Line format:
//! `name:password:lastchange:minage:maxage:warn:inactive:expire:unused`
//!
//! `lastchange` is a day count since the Unix epoch. The five aging fields
//! are optional day counts: an empty field means "no value", which is not
//! the same as `0` and is written back as an empty field.
//!
//! Decoding is best-effort and never fails: problems are collected on each
//! [`ShadowEntry`]. Encoding is strict: a single record without a name
//! aborts the whole batch.
//!
//! When a record is flagged with [`ShadowEntry::update_password`], encoding
//! replaces the stored plaintext with a salted SHA-512-crypt hash and stamps
//! the change time.

use crate::core::crypt;
use crate::core::days;
use crate::core::entries::Entries;
use crate::core::record::{self, Codec, Record, RecordError, Segments, TableKind};
use crate::core::validation;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Labels of the optional aging fields, in column order starting at index 3
const AGING_FIELDS: [&str; 5] = ["min-age", "max-age", "warning", "inactivity", "expiration"];
const AGING_OFFSET: usize = 3;

/// Password placeholder for an account that cannot log in with a password
pub const LOCKED_PASSWORD: &str = "!";

/// One shadow record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowEntry {
    pub name: String,

    /// Stored hash, a placeholder, or the new plaintext while
    /// `password_updated` is set
    pub password: String,

    /// Re-hash `password` on the next encode. Never written to disk.
    pub password_updated: bool,

    pub last_change: DateTime<Utc>,
    pub min_age: Option<Duration>,
    pub max_age: Option<Duration>,
    pub warning_period: Option<Duration>,
    pub inactivity_period: Option<Duration>,
    pub expiration_period: Option<Duration>,
    pub errors: Vec<RecordError>,
}

impl ShadowEntry {
    /// New locked entry with no aging policy
    pub fn new(name: impl Into<String>) -> Self {
        ShadowEntry {
            name: name.into(),
            password: LOCKED_PASSWORD.to_string(),
            ..Default::default()
        }
    }

    /// Store a new plaintext password; it is hashed on the next encode
    pub fn update_password(&mut self, plaintext: impl Into<String>) {
        self.password = plaintext.into();
        self.password_updated = true;
    }

    /// Check `plaintext` against the stored hash
    ///
    /// Always false while an update is pending or the account is locked.
    pub fn verify_password(&self, plaintext: &str) -> bool {
        !self.password_updated && crypt::verify_password(plaintext, &self.password)
    }

    /// The five aging fields in column order
    pub fn aging(&self) -> [Option<Duration>; 5] {
        [
            self.min_age,
            self.max_age,
            self.warning_period,
            self.inactivity_period,
            self.expiration_period,
        ]
    }

    fn from_segments(segments: &Segments<'_>) -> Self {
        let mut errors = Vec::new();
        // On a truncated line an empty field cannot be told apart from a
        // missing one, so both count as invalid there.
        let truncated = segments.check_arity(TableKind::Shadow, &mut errors);

        let name = segments.text(0);
        if name.is_empty() {
            errors.push(RecordError::EmptyName("username"));
        }

        let mut last_change = days::epoch();
        match segments.non_empty(2) {
            Some(field) => match record::parse_int(field).and_then(days::date_from_days) {
                Some(date) => last_change = date,
                None => errors.push(RecordError::InvalidField("last-change")),
            },
            None if truncated => errors.push(RecordError::InvalidField("last-change")),
            None => {}
        }

        let mut aging = [None; 5];
        for (offset, (slot, label)) in aging.iter_mut().zip(AGING_FIELDS).enumerate() {
            match segments.non_empty(AGING_OFFSET + offset) {
                Some(field) => match record::parse_int(field).and_then(days::duration_from_days) {
                    Some(duration) => *slot = Some(duration),
                    None => errors.push(RecordError::InvalidField(label)),
                },
                None if truncated => errors.push(RecordError::InvalidField(label)),
                None => {}
            }
        }
        let [min_age, max_age, warning_period, inactivity_period, expiration_period] = aging;

        ShadowEntry {
            name: name.to_string(),
            password: segments.text(1).to_string(),
            password_updated: false,
            last_change,
            min_age,
            max_age,
            warning_period,
            inactivity_period,
            expiration_period,
            errors,
        }
    }

    fn to_line(&self, password: &str, last_change: &DateTime<Utc>) -> String {
        let mut fields = Vec::with_capacity(TableKind::Shadow.max_segments());
        fields.push(self.name.clone());
        fields.push(password.to_string());
        fields.push(days::days_since_epoch(last_change).to_string());
        for duration in self.aging() {
            fields.push(
                duration
                    .map(|duration| days::whole_days(&duration).to_string())
                    .unwrap_or_default(),
            );
        }
        // reserved
        fields.push(String::new());
        fields.join(":")
    }
}

impl Default for ShadowEntry {
    fn default() -> Self {
        ShadowEntry {
            name: String::new(),
            password: String::new(),
            password_updated: false,
            last_change: days::epoch(),
            min_age: None,
            max_age: None,
            warning_period: None,
            inactivity_period: None,
            expiration_period: None,
            errors: Vec::new(),
        }
    }
}

impl Record for ShadowEntry {
    const KIND: TableKind = TableKind::Shadow;

    fn key(&self) -> &str {
        &self.name
    }

    fn errors(&self) -> &[RecordError] {
        &self.errors
    }
}

impl Codec for ShadowEntry {
    fn decode(data: &[u8]) -> Vec<Self> {
        decode(data)
    }

    fn encode(entries: &mut [Self]) -> Result<Vec<u8>> {
        encode(entries)
    }
}

/// Decode a shadow table
///
/// # Examples
///
/// ```
/// use accountdb_rs::core::shadow;
///
/// let entries = shadow::decode(b"daemon:*:19000:0:99999:7:::");
/// assert_eq!(entries[0].max_age.map(|d| d.num_days()), Some(99999));
/// assert!(entries[0].inactivity_period.is_none());
/// ```
pub fn decode(data: &[u8]) -> Vec<ShadowEntry> {
    record::decode_lines(data, ShadowEntry::from_segments)
}

/// Encode a shadow table
///
/// Records with `password_updated` set are hashed with a fresh salt and get
/// `last_change` set to now. Those changes are written back into `entries`
/// (clearing the flag) only once every record has encoded; on error the
/// records are left as they were.
///
/// # Errors
///
/// - `InvalidEntry` for the first record with an empty name or a name or
///   stored password containing `:` or a newline
/// - `PasswordHash` if hashing a new password fails
pub fn encode(entries: &mut [ShadowEntry]) -> Result<Vec<u8>> {
    let now = Utc::now();
    let mut lines = Vec::with_capacity(entries.len());
    let mut rehashed = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        validation::validate_name(&entry.name)?;

        let line = if entry.password_updated {
            let hash = crypt::hash_password(&entry.password)?;
            let line = entry.to_line(&hash, &now);
            rehashed.push((index, hash));
            line
        } else {
            validation::validate_field("password", &entry.password)?;
            entry.to_line(&entry.password, &entry.last_change)
        };
        lines.push(line);
    }

    for (index, hash) in rehashed {
        let entry = &mut entries[index];
        debug!("Hashed new password for {}", entry.name);
        entry.password = hash;
        entry.password_updated = false;
        entry.last_change = now;
    }

    Ok(record::join_lines(lines))
}

/// Shadow table entry set
pub type Shadows = Entries<ShadowEntry>;
