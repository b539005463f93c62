//! # accountdb - Typed access to the Unix account files
//!
//! `accountdb-rs` reads and writes the three account tables:
//!
//! - **User table** (`/etc/passwd`) as [`UserEntry`] records
//! - **Group table** (`/etc/group`) as [`GroupEntry`] records
//! - **Shadow table** (`/etc/shadow`) as [`ShadowEntry`] records, with
//!   day-count aging fields and SHA-512-crypt password hashing
//!
//! Decoding is best-effort: a malformed line still produces a record, with
//! the problems listed in its `errors`. Saving always rewrites the whole file
//! under an exclusive `flock(2)` lock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use accountdb_rs::{Options, Result, ShadowEntry, Shadows, UserEntry, Users};
//!
//! # fn main() -> Result<()> {
//! // Point at a copy of the tables instead of the live system files
//! let options = Options::in_dir("/mnt/image/etc");
//!
//! let mut users = Users::load_with(&options)?;
//! users.push(UserEntry::new("alice", 1000, 1000, "Alice", "/home/alice", "/bin/bash"));
//! users.save_with(&options)?;
//!
//! let mut shadows = Shadows::load_with(&options)?;
//! let mut alice = ShadowEntry::new("alice");
//! alice.update_password("correct horse battery staple"); // hashed on save
//! shadows.push(alice);
//! shadows.save_with(&options)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Inspecting decode errors
//!
//! ```rust
//! use accountdb_rs::Shadows;
//!
//! let shadows = Shadows::from_bytes(b"root:x:0:");
//! let root = shadows.get("root").unwrap();
//! assert_eq!(root.errors[0].to_string(), "shadow entry has less than 8 segments");
//! ```

pub mod core;
pub mod error;

// Re-export the types callers need
pub use crate::core::{
    crypt::{hash_password, verify_password},
    entries::Entries,
    group::{GroupEntry, Groups},
    lock::write_with_lock,
    options::Options,
    passwd::{UserEntry, Users},
    record::{Codec, NumericId, Record, RecordError, TableKind},
    shadow::{ShadowEntry, Shadows},
};
pub use crate::error::{AccountError, Result};
