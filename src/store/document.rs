//! Persisted group documents

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// XP and level of one member
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub xp: u64,
    pub level: u64,
}

impl MemberRecord {
    pub fn new(xp: u64, level: u64) -> Self {
        Self { xp, level }
    }
}

/// A group and its members, keyed by member id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub members: BTreeMap<String, MemberRecord>,
}

impl GroupDocument {
    /// Create an empty group
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: BTreeMap::new(),
        }
    }

    pub fn member(&self, member_id: &str) -> Option<&MemberRecord> {
        self.members.get(member_id)
    }

    /// Apply a partial update, creating the member if needed
    pub fn apply(&mut self, member_id: &str, fields: MemberFields) {
        let record = self.members.entry(member_id.to_string()).or_default();
        if let Some(xp) = fields.xp {
            record.xp = xp;
        }
        if let Some(level) = fields.level {
            record.level = level;
        }
    }
}

/// Fields touched by a partial member update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberFields {
    pub xp: Option<u64>,
    pub level: Option<u64>,
}

impl MemberFields {
    /// Update both fields at once
    pub fn both(record: MemberRecord) -> Self {
        Self {
            xp: Some(record.xp),
            level: Some(record.level),
        }
    }
}

impl From<MemberRecord> for MemberFields {
    fn from(record: MemberRecord) -> Self {
        Self::both(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_partial_fields() {
        let mut doc = GroupDocument::new("g1");
        doc.apply("u1", MemberFields { xp: Some(40), level: None });
        assert_eq!(doc.member("u1"), Some(&MemberRecord::new(40, 0)));

        doc.apply("u1", MemberFields { xp: None, level: Some(2) });
        assert_eq!(doc.member("u1"), Some(&MemberRecord::new(40, 2)));
    }

    #[test]
    fn test_document_json_shape() {
        let mut doc = GroupDocument::new("g1");
        doc.apply("u1", MemberRecord::new(10, 1).into());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_id"], "g1");
        assert_eq!(json["members"]["u1"]["xp"], 10);

        let parsed: GroupDocument = serde_json::from_str(r#"{"_id":"g2"}"#).unwrap();
        assert!(parsed.members.is_empty());
    }
}
