//! Shared plumbing for the colon-delimited account tables
//!
//! All three tables use the same line discipline: the input is split on
//! newlines, each line is trimmed, blank lines and `#` comments are skipped,
//! and the remainder is split on `:`. Problems found while reading a line are
//! collected as [`RecordError`]s on the record instead of aborting the file.

use crate::error::Result;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Which account table a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// User table (`/etc/passwd`)
    Passwd,
    /// Group table (`/etc/group`)
    Group,
    /// Shadow password-aging table (`/etc/shadow`)
    Shadow,
}

impl TableKind {
    /// Name used in messages
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Passwd => "passwd",
            TableKind::Group => "group",
            TableKind::Shadow => "shadow",
        }
    }

    /// Minimum number of `:` separated segments a well-formed line carries
    pub fn arity(self) -> usize {
        match self {
            TableKind::Passwd => 7,
            TableKind::Group => 4,
            TableKind::Shadow => 8,
        }
    }

    /// Maximum number of segments; shadow lines end in a reserved empty field
    pub fn max_segments(self) -> usize {
        match self {
            TableKind::Shadow => 9,
            other => other.arity(),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem found while decoding one line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{table} entry has less than {expected} segments")]
    TooFewSegments { table: TableKind, expected: usize },

    #[error("{table} entry has more than {max} segments")]
    TooManySegments { table: TableKind, max: usize },

    /// The identity field was empty
    #[error("invalid {0} parsed")]
    EmptyName(&'static str),

    /// A user line carried a real password instead of the `x` placeholder
    #[error("password not stored in shadow table")]
    PasswordNotShadowed,

    /// A field was missing or could not be parsed
    #[error("invalid {0}")]
    InvalidField(&'static str),
}

/// Common view over user, group and shadow records
pub trait Record {
    /// Table this record type is stored in
    const KIND: TableKind;

    /// Identity key (user or group name)
    fn key(&self) -> &str;

    /// Errors collected while decoding this record
    fn errors(&self) -> &[RecordError];

    /// True when decoding produced no errors
    fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

/// Records that carry a numeric id (uid or gid)
pub trait NumericId: Record {
    fn id(&self) -> i64;
}

/// Byte-level codec for one table kind
pub trait Codec: Record + Sized {
    /// Decode a whole file. Never fails; per-line problems land on the records.
    fn decode(data: &[u8]) -> Vec<Self>;

    /// Encode records into file contents.
    ///
    /// Takes `&mut` because encoding may commit derived values back into the
    /// records (the shadow table re-hashes updated passwords).
    fn encode(entries: &mut [Self]) -> Result<Vec<u8>>;
}

/// One line split into its `:` separated segments
#[derive(Debug, Clone)]
pub(crate) struct Segments<'a> {
    parts: Vec<&'a str>,
}

impl<'a> Segments<'a> {
    pub(crate) fn split(line: &'a str) -> Self {
        Segments {
            parts: line.split(':').collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.parts.len()
    }

    /// Segment at `index`, or `None` when the line is too short
    pub(crate) fn get(&self, index: usize) -> Option<&'a str> {
        self.parts.get(index).copied()
    }

    /// Segment at `index`, empty when the line is too short
    pub(crate) fn text(&self, index: usize) -> &'a str {
        self.get(index).unwrap_or_default()
    }

    /// Non-empty segment at `index`
    pub(crate) fn non_empty(&self, index: usize) -> Option<&'a str> {
        self.get(index).filter(|field| !field.is_empty())
    }

    /// Records segment-count problems. Returns true if the line is short.
    pub(crate) fn check_arity(&self, table: TableKind, errors: &mut Vec<RecordError>) -> bool {
        if self.len() < table.arity() {
            errors.push(RecordError::TooFewSegments {
                table,
                expected: table.arity(),
            });
            return true;
        }
        if self.len() > table.max_segments() {
            errors.push(RecordError::TooManySegments {
                table,
                max: table.max_segments(),
            });
        }
        false
    }
}

/// Integer field as the tables write them (base 10, optional sign)
pub(crate) fn parse_int(field: &str) -> Option<i64> {
    field.parse().ok()
}

/// Content lines of a table file, trimmed, without blanks and comments
pub(crate) fn content_lines(data: &str) -> impl Iterator<Item = &str> {
    data.trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Runs `parse` over every content line of `data`
pub(crate) fn decode_lines<T, F>(data: &[u8], parse: F) -> Vec<T>
where
    T: Record,
    F: Fn(&Segments<'_>) -> T,
{
    let text = String::from_utf8_lossy(data);
    let records: Vec<T> = content_lines(&text)
        .map(|line| parse(&Segments::split(line)))
        .collect();

    let flagged = records.iter().filter(|record| !record.is_valid()).count();
    if flagged > 0 {
        warn!(
            "{} of {} {} entries decoded with errors",
            flagged,
            records.len(),
            T::KIND
        );
    } else {
        debug!("Decoded {} {} entries", records.len(), T::KIND);
    }

    records
}

/// Joins encoded lines with `\n`, without a trailing newline
pub(crate) fn join_lines(lines: Vec<String>) -> Vec<u8> {
    lines.join("\n").into_bytes()
}
