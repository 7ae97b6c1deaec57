//! Group identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::{AuditError, AuditResult, FormatError};

/// Separator between the fields of an encoded record.
pub const FIELD_DELIMITER: char = '|';

/// Name of the group an action is recorded on behalf of.
///
/// Ids built locally with [`new`](Self::new) are never empty and free of the
/// field delimiter and control characters, so a record written here always
/// fits on one line with exactly four fields. Ids read back from a record
/// only have to be non-empty; other writers may use characters we refuse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(String);

impl GroupId {
    /// Validate and wrap a group id.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidGroupId`] if the id is empty or contains
    /// `|` or a control character.
    pub fn new(id: impl Into<String>) -> AuditResult<Self> {
        let id = id.into();
        match check(&id) {
            Ok(()) => Ok(Self(id)),
            Err(e) => Err(AuditError::InvalidGroupId {
                group_id: id,
                reason: e.to_string(),
            }),
        }
    }

    /// Wrap the group field of a record line.
    ///
    /// The line has already been split on `|`, so only emptiness is checked.
    pub(crate) fn from_field(field: &str) -> Result<Self, FormatError> {
        if field.is_empty() {
            return Err(FormatError::EmptyGroupId);
        }
        Ok(Self(field.to_string()))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id's UTF-8 bytes, as bound into the record hash.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

fn check(id: &str) -> Result<(), FormatError> {
    if id.is_empty() {
        return Err(FormatError::EmptyGroupId);
    }
    match id.chars().find(|c| *c == FIELD_DELIMITER || c.is_control()) {
        Some(c) => Err(FormatError::InvalidGroupId(c)),
        None => Ok(()),
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GroupId {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_group_ids() {
        for id in ["group", "ops team", "grupo-ñ", "a"] {
            let group = GroupId::new(id).unwrap();
            assert_eq!(group.as_str(), id);
            assert_eq!(group.to_string(), id);
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            GroupId::new(""),
            Err(AuditError::InvalidGroupId { .. })
        ));
        assert_eq!(GroupId::from_field(""), Err(FormatError::EmptyGroupId));
    }

    #[test]
    fn test_rejects_delimiter() {
        let err = GroupId::new("left|right").unwrap_err();
        assert!(err.to_string().contains("'|'"));
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(GroupId::new("two\nlines").is_err());
        assert!(matches!(
            GroupId::new("tab\there"),
            Err(AuditError::InvalidGroupId { .. })
        ));
    }

    #[test]
    fn test_record_field_allows_control_characters() {
        let group = GroupId::from_field("tab\there").unwrap();
        assert_eq!(group.as_str(), "tab\there");
        assert!(GroupId::from_field("cr\r").is_ok());
    }

    #[test]
    fn test_from_str() {
        let group: GroupId = "group".parse().unwrap();
        assert_eq!(group.as_bytes(), b"group");
        assert!("".parse::<GroupId>().is_err());
    }
}
