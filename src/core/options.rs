//! Table file locations
//!
//! Paths default to the real system files. Tests and tools that operate on a
//! copy (a chroot, an image being built) point them elsewhere, either with
//! the builder setters or from a TOML file:
//!
//! ```toml
//! passwd = "/mnt/image/etc/passwd"
//! shadow = "/mnt/image/etc/shadow"
//! ```
//!
//! Keys left out keep their default.

use crate::core::record::TableKind;
use crate::error::{AccountError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where each account table lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// User table
    pub passwd: PathBuf,

    /// Group table
    pub group: PathBuf,

    /// Shadow table
    pub shadow: PathBuf,
}

impl Options {
    pub const DEFAULT_PASSWD: &'static str = "/etc/passwd";
    pub const DEFAULT_GROUP: &'static str = "/etc/group";
    pub const DEFAULT_SHADOW: &'static str = "/etc/shadow";

    /// Options pointing at the system files
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with all three tables inside `dir` (`dir/passwd`, ...)
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Options {
            passwd: dir.join("passwd"),
            group: dir.join("group"),
            shadow: dir.join("shadow"),
        }
    }

    /// Parse options from TOML
    ///
    /// # Examples
    ///
    /// ```
    /// use accountdb_rs::Options;
    ///
    /// let options = Options::from_toml_str(r#"shadow = "/tmp/shadow""#).unwrap();
    /// assert_eq!(options.shadow.to_str(), Some("/tmp/shadow"));
    /// assert_eq!(options.passwd.to_str(), Some("/etc/passwd"));
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read options from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading account file options from {}", path.display());
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Set the user table path
    pub fn with_passwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.passwd = path.into();
        self
    }

    /// Set the group table path
    pub fn with_group(mut self, path: impl Into<PathBuf>) -> Self {
        self.group = path.into();
        self
    }

    /// Set the shadow table path
    pub fn with_shadow(mut self, path: impl Into<PathBuf>) -> Self {
        self.shadow = path.into();
        self
    }

    /// Configured path of `table`
    pub fn path(&self, table: TableKind) -> &Path {
        match table {
            TableKind::Passwd => &self.passwd,
            TableKind::Group => &self.group,
            TableKind::Shadow => &self.shadow,
        }
    }

    /// Raw contents of a configured table
    pub fn list(&self, table: TableKind) -> Result<String> {
        let path = self.path(table);
        fs::read_to_string(path).map_err(|source| AccountError::ListFailed {
            table,
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            passwd: PathBuf::from(Self::DEFAULT_PASSWD),
            group: PathBuf::from(Self::DEFAULT_GROUP),
            shadow: PathBuf::from(Self::DEFAULT_SHADOW),
        }
    }
}
