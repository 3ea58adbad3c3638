//! Per-member mutation locks
//!
//! Read-modify-write operations on one member run one at a time so that
//! concurrent increments never overwrite each other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::ids::Identifier;

/// Idle slots are swept once the registry grows past this size
const SWEEP_THRESHOLD: usize = 1024;

type Slot = Arc<AsyncMutex<()>>;

#[derive(Debug, Default)]
pub struct MemberLocks {
    slots: Mutex<HashMap<(Identifier, Identifier), Slot>>,
}

impl MemberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one member
    pub async fn acquire(&self, group_id: &Identifier, member_id: &Identifier) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock();
            if slots.len() > SWEEP_THRESHOLD {
                // Only the registry holds an idle slot
                slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            }
            slots
                .entry((group_id.clone(), member_id.clone()))
                .or_default()
                .clone()
        };
        slot.lock_owned().await
    }

    /// Number of tracked slots
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}
