//! JSON file store
//!
//! Keeps one pretty-printed JSON file per group inside a data directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use super::{GroupDocument, MemberFields, Store};
use crate::error::StoreError;

/// Store backed by a directory of `<group>.json` files
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    // Serializes read-modify-write cycles on documents
    write_lock: Mutex<()>,
}

/// Get the default data directory
pub fn default_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "guildxp", "Guildxp") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("groups");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./guildxp-data")
    }
}

/// File name for a group id. Anything outside `[A-Za-z0-9_-]` is
/// percent-encoded so ids can never escape the data directory.
fn file_name(group_id: &str) -> String {
    let mut name = String::with_capacity(group_id.len() + 5);
    for byte in group_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name.push_str(".json");
    name
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Open the store in the platform data directory
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_directory())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, group_id: &str) -> PathBuf {
        self.root.join(file_name(group_id))
    }

    async fn read(&self, group_id: &str) -> Result<Option<GroupDocument>, StoreError> {
        let path = self.path_for(group_id);
        match fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, doc: &GroupDocument) -> Result<(), StoreError> {
        let path = self.path_for(&doc.id);
        let json = serde_json::to_string_pretty(doc)?;

        // Write next to the target, then swap it in
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;

        log::debug!("Wrote group {} to {:?}", doc.id, path);
        Ok(())
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn find_group(&self, group_id: &str) -> Result<Option<GroupDocument>, StoreError> {
        self.read(group_id).await
    }

    async fn insert_group(&self, doc: GroupDocument) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(&doc).await
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(self.path_for(group_id)).await {
            Ok(()) => {
                log::info!("Deleted group file for {}", group_id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_member_fields(
        &self,
        group_id: &str,
        member_id: &str,
        fields: MemberFields,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(mut doc) = self.read(group_id).await? else {
            return Ok(false);
        };
        doc.apply(member_id, fields);
        self.write(&doc).await?;
        Ok(true)
    }

    async fn remove_member_key(&self, group_id: &str, member_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if let Some(mut doc) = self.read(group_id).await? {
            if doc.members.remove(member_id).is_some() {
                self.write(&doc).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemberRecord;

    #[test]
    fn test_file_name_encoding() {
        assert_eq!(file_name("guild_1"), "guild_1.json");
        assert_eq!(file_name("../etc"), "%2E%2E%2Fetc.json");
        assert_eq!(file_name("a b"), "a%20b.json");
    }

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.root(), dir.path());

        store.insert_group(GroupDocument::new("g1")).await.unwrap();
        assert!(dir.path().join("g1.json").exists());

        let fields = MemberFields::from(MemberRecord::new(1000, 5));
        assert!(store.update_member_fields("g1", "u1", fields).await.unwrap());
        assert!(!store.update_member_fields("missing", "u1", fields).await.unwrap());

        // A fresh handle sees the same data
        let reopened = JsonFileStore::open(dir.path()).unwrap();
        let doc = reopened.find_group("g1").await.unwrap().unwrap();
        assert_eq!(doc.member("u1"), Some(&MemberRecord::new(1000, 5)));

        reopened.remove_member_key("g1", "u1").await.unwrap();
        let doc = reopened.find_group("g1").await.unwrap().unwrap();
        assert!(doc.members.is_empty());

        reopened.delete_group("g1").await.unwrap();
        reopened.delete_group("g1").await.unwrap();
        assert!(reopened.find_group("g1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("g1.json"), "not json").unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let err = store.find_group("g1").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
