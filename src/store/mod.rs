//! Group document storage
//!
//! The ledger talks to persistence through the [`Store`] trait. Two
//! implementations ship with the crate: an in-memory map for tests and
//! embedding, and a directory of JSON files for local hosts.

pub mod document;
pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;

pub use document::{GroupDocument, MemberFields, MemberRecord};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Key-value persistence for group documents.
///
/// Writes are last-write-wins; a single call touches a single document.
#[async_trait]
pub trait Store: Send + Sync {
    /// Load a group document
    async fn find_group(&self, group_id: &str) -> Result<Option<GroupDocument>, StoreError>;

    /// Insert a new group document, replacing any document with the same id
    async fn insert_group(&self, doc: GroupDocument) -> Result<(), StoreError>;

    /// Remove a group document. Removing a missing group succeeds.
    async fn delete_group(&self, group_id: &str) -> Result<(), StoreError>;

    /// Set some fields of one member, creating the member key if needed.
    ///
    /// Returns `false` when the group does not exist.
    async fn update_member_fields(
        &self,
        group_id: &str,
        member_id: &str,
        fields: MemberFields,
    ) -> Result<bool, StoreError>;

    /// Remove one member key from a group
    async fn remove_member_key(&self, group_id: &str, member_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn find_group(&self, group_id: &str) -> Result<Option<GroupDocument>, StoreError> {
        (**self).find_group(group_id).await
    }

    async fn insert_group(&self, doc: GroupDocument) -> Result<(), StoreError> {
        (**self).insert_group(doc).await
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), StoreError> {
        (**self).delete_group(group_id).await
    }

    async fn update_member_fields(
        &self,
        group_id: &str,
        member_id: &str,
        fields: MemberFields,
    ) -> Result<bool, StoreError> {
        (**self).update_member_fields(group_id, member_id, fields).await
    }

    async fn remove_member_key(&self, group_id: &str, member_id: &str) -> Result<(), StoreError> {
        (**self).remove_member_key(group_id, member_id).await
    }
}
