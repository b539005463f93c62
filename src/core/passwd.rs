//! User table (`/etc/passwd`)
//!
//! Line format: `name:password:uid:gid:info:home:shell`. The password field
//! is expected to be the `x` placeholder; the real hash lives in the shadow
//! table.

use crate::core::entries::Entries;
use crate::core::record::{self, Codec, NumericId, Record, RecordError, Segments, TableKind};
use crate::core::validation;
use crate::error::Result;

/// Password placeholder pointing at the shadow table
pub const SHADOW_PLACEHOLDER: &str = "x";

/// One user record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserEntry {
    pub name: String,
    pub password: String,
    pub uid: i64,
    pub gid: i64,
    /// GECOS / comment field
    pub info: String,
    pub home: String,
    pub shell: String,
    pub errors: Vec<RecordError>,
}

impl UserEntry {
    /// New user whose password lives in the shadow table
    pub fn new(
        name: impl Into<String>,
        uid: i64,
        gid: i64,
        info: impl Into<String>,
        home: impl Into<String>,
        shell: impl Into<String>,
    ) -> Self {
        UserEntry {
            name: name.into(),
            password: SHADOW_PLACEHOLDER.to_string(),
            uid,
            gid,
            info: info.into(),
            home: home.into(),
            shell: shell.into(),
            errors: Vec::new(),
        }
    }

    fn from_segments(segments: &Segments<'_>) -> Self {
        let mut errors = Vec::new();
        segments.check_arity(TableKind::Passwd, &mut errors);

        let name = segments.text(0);
        if name.is_empty() {
            errors.push(RecordError::EmptyName("username"));
        }

        let password = segments.text(1);
        if password != SHADOW_PLACEHOLDER {
            errors.push(RecordError::PasswordNotShadowed);
        }

        let uid = segments.get(2).and_then(record::parse_int).unwrap_or_else(|| {
            errors.push(RecordError::InvalidField("uid"));
            0
        });
        let gid = segments.get(3).and_then(record::parse_int).unwrap_or_else(|| {
            errors.push(RecordError::InvalidField("gid"));
            0
        });

        let mut text_field = |index: usize, label: &'static str| match segments.get(index) {
            Some(value) => value.to_string(),
            None => {
                errors.push(RecordError::InvalidField(label));
                String::new()
            }
        };
        let info = text_field(4, "info field");
        let home = text_field(5, "homedir");
        let shell = text_field(6, "shell");

        UserEntry {
            name: name.to_string(),
            password: password.to_string(),
            uid,
            gid,
            info,
            home,
            shell,
            errors,
        }
    }

    fn to_line(&self) -> Result<String> {
        validation::validate_name(&self.name)?;
        validation::validate_id("uid", self.uid)?;
        validation::validate_id("gid", self.gid)?;
        for (label, value) in [
            ("password", &self.password),
            ("info", &self.info),
            ("home", &self.home),
            ("shell", &self.shell),
        ] {
            validation::validate_field(label, value)?;
        }
        // last on the line
        validation::validate_trimmed("shell", &self.shell)?;

        Ok(format!(
            "{}:{}:{}:{}:{}:{}:{}",
            self.name, self.password, self.uid, self.gid, self.info, self.home, self.shell
        ))
    }
}

impl Record for UserEntry {
    const KIND: TableKind = TableKind::Passwd;

    fn key(&self) -> &str {
        &self.name
    }

    fn errors(&self) -> &[RecordError] {
        &self.errors
    }
}

impl NumericId for UserEntry {
    fn id(&self) -> i64 {
        self.uid
    }
}

impl Codec for UserEntry {
    fn decode(data: &[u8]) -> Vec<Self> {
        decode(data)
    }

    fn encode(entries: &mut [Self]) -> Result<Vec<u8>> {
        encode(entries)
    }
}

/// Decode a user table
pub fn decode(data: &[u8]) -> Vec<UserEntry> {
    record::decode_lines(data, UserEntry::from_segments)
}

/// Encode a user table
///
/// # Errors
///
/// Returns `InvalidEntry` for the first record with an empty name, a uid or
/// gid below -2, or a field containing `:` or a newline.
pub fn encode(entries: &[UserEntry]) -> Result<Vec<u8>> {
    let lines = entries
        .iter()
        .map(UserEntry::to_line)
        .collect::<Result<Vec<_>>>()?;
    Ok(record::join_lines(lines))
}

/// User table entry set
pub type Users = Entries<UserEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccountError;

    #[test]
    fn test_decode_short_line() {
        let users = decode(b"root:x:0:");
        assert_eq!(users.len(), 1);

        let root = &users[0];
        assert_eq!(root.name, "root");
        assert_eq!(root.password, "x");
        assert_eq!(root.uid, 0);
        assert_eq!(root.gid, 0);
        assert_eq!(
            root.errors,
            vec![
                RecordError::TooFewSegments {
                    table: TableKind::Passwd,
                    expected: 7
                },
                RecordError::InvalidField("gid"),
                RecordError::InvalidField("info field"),
                RecordError::InvalidField("homedir"),
                RecordError::InvalidField("shell"),
            ]
        );
    }

    #[test]
    fn test_decode_complete_line() {
        let users = decode(b"nobody:x:65534:65534:nobody:/nonexistent:/usr/sbin/nologin");
        assert_eq!(
            users[0],
            UserEntry {
                name: "nobody".to_string(),
                password: "x".to_string(),
                uid: 65534,
                gid: 65534,
                info: "nobody".to_string(),
                home: "/nonexistent".to_string(),
                shell: "/usr/sbin/nologin".to_string(),
                errors: Vec::new(),
            }
        );
    }

    #[test]
    fn test_decode_flags_inline_password() {
        let users = decode(b"legacy:$1$abc$def:1000:1000::/home/legacy:/bin/sh");
        assert_eq!(users[0].errors, vec![RecordError::PasswordNotShadowed]);
        assert_eq!(users[0].password, "$1$abc$def");
    }

    #[test]
    fn test_decode_flags_extra_segments() {
        let users = decode(b"odd:x:1:1:info:/home:/bin/sh:extra");
        assert_eq!(
            users[0].errors,
            vec![RecordError::TooManySegments {
                table: TableKind::Passwd,
                max: 7
            }]
        );
        assert_eq!(users[0].shell, "/bin/sh");
    }

    #[test]
    fn test_encode_defaults() {
        let users = vec![UserEntry {
            name: "root".to_string(),
            password: "x".to_string(),
            ..Default::default()
        }];
        assert_eq!(encode(&users).unwrap(), b"root:x:0:0:::");
    }

    #[test]
    fn test_encode_multiple() {
        let users = vec![
            UserEntry {
                name: "root".to_string(),
                password: "x".to_string(),
                ..Default::default()
            },
            UserEntry {
                name: "nobody".to_string(),
                password: "x".to_string(),
                info: "nobody".to_string(),
                home: "/nonexistent".to_string(),
                shell: "/usr/sbin/nonexistent".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(
            encode(&users).unwrap(),
            b"root:x:0:0:::\nnobody:x:0:0:nobody:/nonexistent:/usr/sbin/nonexistent"
        );
    }

    #[test]
    fn test_encode_rejects_invalid_entries() {
        let empty_name = UserEntry::new("", 0, 0, "", "/", "/bin/sh");
        assert!(matches!(
            encode(&[empty_name]),
            Err(AccountError::InvalidEntry(_))
        ));

        let below_floor = UserEntry::new("svc", -3, 0, "", "/", "/bin/sh");
        assert!(encode(&[below_floor]).is_err());

        let bad_gid = UserEntry::new("svc", 0, -3, "", "/", "/bin/sh");
        assert!(encode(&[bad_gid]).is_err());

        let sentinel = UserEntry::new("nobody", -2, -2, "", "/var/empty", "/usr/bin/false");
        assert_eq!(
            encode(&[sentinel]).unwrap(),
            b"nobody:x:-2:-2::/var/empty:/usr/bin/false"
        );
    }

    #[test]
    fn test_encode_rejects_records_that_would_not_read_back() {
        let root = UserEntry::new("root", 0, 0, "", "/root", "/bin/sh");

        let comment_like = UserEntry::new("#svc", 5, 5, "", "/", "/bin/sh");
        assert!(matches!(
            encode(&[root.clone(), comment_like]),
            Err(AccountError::InvalidEntry(_))
        ));

        let padded_shell = UserEntry::new("svc", 5, 5, "", "/", "/bin/sh ");
        assert!(encode(&[padded_shell]).is_err());

        // inner fields are not trimmed on decode
        let padded_info = UserEntry::new("svc", 5, 5, " Service ", "/", "/bin/sh");
        let encoded = encode(&[root, padded_info.clone()]).unwrap();
        assert_eq!(decode(&encoded)[1], padded_info);
    }

    #[test]
    fn test_encode_rejects_separator_in_field() {
        let user = UserEntry::new("alice", 1000, 1000, "Alice: admin", "/home/alice", "/bin/sh");
        assert!(encode(&[user]).is_err());
    }
}
