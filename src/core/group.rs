//! Group table (`/etc/group`)
//!
//! Line format: `name:password:gid:member1,member2,...`

use crate::core::entries::Entries;
use crate::core::record::{self, Codec, NumericId, Record, RecordError, Segments, TableKind};
use crate::core::validation;
use crate::error::{AccountError, Result};

/// One group record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupEntry {
    pub name: String,
    pub password: String,
    pub gid: i64,
    /// Supplementary members, in file order
    pub members: Vec<String>,
    pub errors: Vec<RecordError>,
}

impl GroupEntry {
    /// New group with no members and the `x` password placeholder
    pub fn new(name: impl Into<String>, gid: i64) -> Self {
        GroupEntry {
            name: name.into(),
            password: "x".to_string(),
            gid,
            members: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True if `name` is a supplementary member
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }

    /// Append `name` to the member list; a name already present is left alone
    pub fn add_member(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_member(&name) {
            self.members.push(name);
        }
    }

    /// Remove `name` from the member list
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `name` is not a member.
    pub fn remove_member(&mut self, name: &str) -> Result<()> {
        match self.members.iter().position(|member| member == name) {
            Some(index) => {
                self.members.remove(index);
                Ok(())
            }
            None => Err(AccountError::not_found("user in group", name)),
        }
    }

    fn from_segments(segments: &Segments<'_>) -> Self {
        let mut errors = Vec::new();
        segments.check_arity(TableKind::Group, &mut errors);

        let name = segments.text(0);
        if name.is_empty() {
            errors.push(RecordError::EmptyName("name"));
        }

        let gid = segments.get(2).and_then(record::parse_int).unwrap_or_else(|| {
            errors.push(RecordError::InvalidField("gid"));
            0
        });

        let members = match segments.get(3) {
            Some(list) => list
                .split(',')
                .filter(|member| !member.is_empty())
                .map(str::to_string)
                .collect(),
            None => {
                errors.push(RecordError::InvalidField("member list"));
                Vec::new()
            }
        };

        GroupEntry {
            name: name.to_string(),
            password: segments.text(1).to_string(),
            gid,
            members,
            errors,
        }
    }

    fn to_line(&self) -> Result<String> {
        validation::validate_name(&self.name)?;
        validation::validate_field("password", &self.password)?;
        for member in &self.members {
            validation::validate_member(member)?;
        }

        Ok(format!(
            "{}:{}:{}:{}",
            self.name,
            self.password,
            self.gid,
            self.members.join(",")
        ))
    }
}

impl Record for GroupEntry {
    const KIND: TableKind = TableKind::Group;

    fn key(&self) -> &str {
        &self.name
    }

    fn errors(&self) -> &[RecordError] {
        &self.errors
    }
}

impl NumericId for GroupEntry {
    fn id(&self) -> i64 {
        self.gid
    }
}

impl Codec for GroupEntry {
    fn decode(data: &[u8]) -> Vec<Self> {
        decode(data)
    }

    fn encode(entries: &mut [Self]) -> Result<Vec<u8>> {
        encode(entries)
    }
}

/// Decode a group table
pub fn decode(data: &[u8]) -> Vec<GroupEntry> {
    record::decode_lines(data, GroupEntry::from_segments)
}

/// Encode a group table
///
/// Only the name is required; the gid is written as-is.
pub fn encode(entries: &[GroupEntry]) -> Result<Vec<u8>> {
    let lines = entries
        .iter()
        .map(GroupEntry::to_line)
        .collect::<Result<Vec<_>>>()?;
    Ok(record::join_lines(lines))
}

/// Group table entry set
pub type Groups = Entries<GroupEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_members() {
        let groups = decode(b"wheel:x:10:alice,bob\nusers:x:100:\n");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec!["alice", "bob"]);
        assert!(groups[0].errors.is_empty());
        assert!(groups[1].members.is_empty());
        assert!(groups[1].errors.is_empty());
    }

    #[test]
    fn test_decode_short_line() {
        let groups = decode(b"staff:x");
        assert_eq!(groups[0].name, "staff");
        assert_eq!(
            groups[0].errors,
            vec![
                RecordError::TooFewSegments {
                    table: TableKind::Group,
                    expected: 4
                },
                RecordError::InvalidField("gid"),
                RecordError::InvalidField("member list"),
            ]
        );
    }

    #[test]
    fn test_decode_empty_name() {
        let groups = decode(b":x:5:");
        assert_eq!(groups[0].errors, vec![RecordError::EmptyName("name")]);
    }

    #[test]
    fn test_encode() {
        let mut wheel = GroupEntry::new("wheel", 10);
        wheel.add_member("alice");
        wheel.add_member("bob");
        let users = GroupEntry::new("users", 100);

        assert_eq!(
            encode(&[wheel, users]).unwrap(),
            b"wheel:x:10:alice,bob\nusers:x:100:"
        );
    }

    #[test]
    fn test_encode_requires_name_only() {
        assert!(encode(&[GroupEntry::new("", 10)]).is_err());
        assert!(encode(&[GroupEntry::new("nogroup", -5)]).is_ok());
    }

    #[test]
    fn test_encode_rejects_records_that_would_not_read_back() {
        let mut padded = GroupEntry::new("wheel", 10);
        padded.members.push("alice ".to_string());
        assert!(encode(&[padded]).is_err());

        assert!(encode(&[GroupEntry::new("#staff", 50)]).is_err());
        assert!(encode(&[GroupEntry::new("staff ", 50)]).is_err());
    }

    #[test]
    fn test_membership() {
        let mut group = GroupEntry::new("audio", 29);
        group.add_member("alice");
        group.add_member("alice");
        assert_eq!(group.members, vec!["alice"]);

        group.remove_member("alice").unwrap();
        assert!(!group.has_member("alice"));

        let err = group.remove_member("alice").unwrap_err();
        assert!(err.is_not_found());
    }
}
