//! In-memory store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{GroupDocument, MemberFields, Store};
use crate::error::StoreError;

/// Store keeping every group document in a map
#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: RwLock<HashMap<String, GroupDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored groups
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_group(&self, group_id: &str) -> Result<Option<GroupDocument>, StoreError> {
        Ok(self.groups.read().get(group_id).cloned())
    }

    async fn insert_group(&self, doc: GroupDocument) -> Result<(), StoreError> {
        self.groups.write().insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), StoreError> {
        self.groups.write().remove(group_id);
        Ok(())
    }

    async fn update_member_fields(
        &self,
        group_id: &str,
        member_id: &str,
        fields: MemberFields,
    ) -> Result<bool, StoreError> {
        let mut groups = self.groups.write();
        match groups.get_mut(group_id) {
            Some(doc) => {
                doc.apply(member_id, fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_member_key(&self, group_id: &str, member_id: &str) -> Result<(), StoreError> {
        if let Some(doc) = self.groups.write().get_mut(group_id) {
            doc.members.remove(member_id);
        }
        Ok(())
    }
}
