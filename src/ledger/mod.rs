//! The xp ledger
//!
//! Public operations on groups and members. Every operation validates its
//! identifiers, reads the current state from the [`Store`], applies the curve
//! math and writes the result back.

pub mod locks;
pub mod outcome;

use std::collections::BTreeMap;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::ids::{self, IdInput, Identifier, NumericInput};
use crate::progression::{Change, Curve, Direction, ProgressCalculator, Transition};
use crate::store::{GroupDocument, MemberFields, MemberRecord, Store};

pub use locks::MemberLocks;
pub use outcome::{AddOutcome, SubtractOutcome, XpForNext};

/// Leaderboard page size when none is given
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Experience ledger over a [`Store`]
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    config: LedgerConfig,
    progress: ProgressCalculator,
    locks: MemberLocks,
}

fn group_id(input: impl Into<IdInput>) -> Result<Identifier> {
    Identifier::parse(input, "group_id")
}

fn member_ids(group: impl Into<IdInput>, member: impl Into<IdInput>) -> Result<(Identifier, Identifier)> {
    Ok((group_id(group)?, Identifier::parse(member, "member_id")?))
}

impl<S: Store> Ledger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        let progress = ProgressCalculator::new(Curve::new(config.growth));
        // Keep the normalized growth settings
        let config = LedgerConfig {
            growth: *progress.curve().config(),
            ..config
        };
        log::debug!("Ledger ready: {:?}", config);
        Self {
            store,
            config,
            progress,
            locks: MemberLocks::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn curve(&self) -> &Curve {
        self.progress.curve()
    }

    // ------------------------------------------------------------------
    // Curve
    // ------------------------------------------------------------------

    pub fn xp_for_level(&self, level: u64) -> i64 {
        self.curve().xp_for_level(level)
    }

    pub fn level_for_xp(&self, xp: u64) -> u64 {
        self.curve().level_for_xp(xp)
    }

    /// XP needed for the next level, detailed when `return_details` is on
    pub fn xp_for_next(&self, current_xp: u64) -> XpForNext {
        if self.config.return_details {
            XpForNext::Detailed(self.progress.next_level(current_xp))
        } else {
            XpForNext::Needed(self.progress.xp_for_next(current_xp))
        }
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    pub async fn create_group(&self, group: impl Into<IdInput>) -> Result<()> {
        let group = group_id(group)?;
        if self.store.find_group(group.as_str()).await?.is_some() {
            return Err(LedgerError::AlreadyExists(format!("Group {}", group)));
        }
        self.store.insert_group(GroupDocument::new(group.as_str())).await?;
        log::info!("Created group {}", group);
        Ok(())
    }

    pub async fn delete_group(&self, group: impl Into<IdInput>) -> Result<()> {
        let group = group_id(group)?;
        self.store.delete_group(group.as_str()).await?;
        log::info!("Deleted group {}", group);
        Ok(())
    }

    pub async fn group_exists(&self, group: impl Into<IdInput>) -> Result<bool> {
        let group = group_id(group)?;
        Ok(self.store.find_group(group.as_str()).await?.is_some())
    }

    /// Members of a group, or `None` if the group does not exist
    pub async fn get_group(&self, group: impl Into<IdInput>) -> Result<Option<BTreeMap<String, MemberRecord>>> {
        let group = group_id(group)?;
        Ok(self.store.find_group(group.as_str()).await?.map(|doc| doc.members))
    }

    /// Members ordered by xp, highest first, sliced to `[offset, offset + limit)`.
    ///
    /// Members with equal xp are ordered by id. A `limit` of `None` means
    /// [`DEFAULT_LEADERBOARD_LIMIT`]; `Some(0)` is an empty page. `None` if the
    /// group does not exist.
    pub async fn get_leaderboard(
        &self,
        group: impl Into<IdInput>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Option<Vec<(String, MemberRecord)>>> {
        let group = group_id(group)?;
        let Some(doc) = self.store.find_group(group.as_str()).await? else {
            return Ok(None);
        };

        let limit = limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
        let offset = offset.unwrap_or(0);

        // Members come out of the map in id order; the sort is stable
        let mut entries: Vec<(String, MemberRecord)> = doc.members.into_iter().collect();
        entries.sort_by(|a, b| b.1.xp.cmp(&a.1.xp));
        Ok(Some(entries.into_iter().skip(offset).take(limit).collect()))
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    pub async fn create_member(&self, group: impl Into<IdInput>, member: impl Into<IdInput>) -> Result<()> {
        let (group, member) = member_ids(group, member)?;
        let _guard = self.locks.acquire(&group, &member).await;

        let doc = self
            .store
            .find_group(group.as_str())
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("Group {}", group)))?;
        if doc.member(member.as_str()).is_some() {
            return Err(LedgerError::AlreadyExists(format!("Member {} in group {}", member, group)));
        }

        self.write(&group, &member, self.progress.initial_record()).await?;
        log::debug!("Created member {} in group {}", member, group);
        Ok(())
    }

    pub async fn delete_member(&self, group: impl Into<IdInput>, member: impl Into<IdInput>) -> Result<()> {
        let (group, member) = member_ids(group, member)?;
        let _guard = self.locks.acquire(&group, &member).await;
        self.store.remove_member_key(group.as_str(), member.as_str()).await?;
        log::debug!("Deleted member {} from group {}", member, group);
        Ok(())
    }

    pub async fn member_exists(&self, group: impl Into<IdInput>, member: impl Into<IdInput>) -> Result<bool> {
        Ok(self.get_member(group, member).await?.is_some())
    }

    /// A member's record, or `None` if the group or member does not exist
    pub async fn get_member(
        &self,
        group: impl Into<IdInput>,
        member: impl Into<IdInput>,
    ) -> Result<Option<MemberRecord>> {
        let (group, member) = member_ids(group, member)?;
        self.lookup(&group, &member).await
    }

    /// Set a member's xp; the level follows
    pub async fn set_xp(
        &self,
        group: impl Into<IdInput>,
        member: impl Into<IdInput>,
        xp: impl Into<NumericInput>,
    ) -> Result<()> {
        let (group, member) = member_ids(group, member)?;
        let xp = ids::non_negative(xp, "value")?;
        self.replace(&group, &member, self.progress.record_for_xp(xp)).await
    }

    /// Set a member's level; xp is reset to the start of that level
    pub async fn set_level(
        &self,
        group: impl Into<IdInput>,
        member: impl Into<IdInput>,
        level: impl Into<NumericInput>,
    ) -> Result<()> {
        let (group, member) = member_ids(group, member)?;
        let level = ids::non_negative(level, "value")?;
        self.replace(&group, &member, self.progress.record_for_level(level)).await
    }

    /// Put a member back to zero xp
    pub async fn reset_member(&self, group: impl Into<IdInput>, member: impl Into<IdInput>) -> Result<()> {
        let (group, member) = member_ids(group, member)?;
        self.replace(&group, &member, self.progress.record_for_xp(0)).await
    }

    pub async fn add_xp(
        &self,
        group: impl Into<IdInput>,
        member: impl Into<IdInput>,
        amount: impl Into<NumericInput>,
    ) -> Result<AddOutcome> {
        let (group, member) = member_ids(group, member)?;
        let amount = ids::magnitude(amount, "value")?;
        let transition = self.apply(&group, &member, Change::Xp(amount), Direction::Add).await?;
        Ok(AddOutcome::from_transition(&transition, self.config.return_details))
    }

    pub async fn add_level(
        &self,
        group: impl Into<IdInput>,
        member: impl Into<IdInput>,
        amount: impl Into<NumericInput>,
    ) -> Result<AddOutcome> {
        let (group, member) = member_ids(group, member)?;
        let amount = ids::magnitude(amount, "value")?;
        let transition = self.apply(&group, &member, Change::Levels(amount), Direction::Add).await?;
        Ok(AddOutcome::from_transition(&transition, self.config.return_details))
    }

    pub async fn subtract_xp(
        &self,
        group: impl Into<IdInput>,
        member: impl Into<IdInput>,
        amount: impl Into<NumericInput>,
    ) -> Result<SubtractOutcome> {
        let (group, member) = member_ids(group, member)?;
        let amount = ids::magnitude(amount, "value")?;
        let transition = self.apply(&group, &member, Change::Xp(amount), Direction::Subtract).await?;
        Ok(SubtractOutcome::from_transition(&transition, self.config.return_details))
    }

    pub async fn subtract_level(
        &self,
        group: impl Into<IdInput>,
        member: impl Into<IdInput>,
        amount: impl Into<NumericInput>,
    ) -> Result<SubtractOutcome> {
        let (group, member) = member_ids(group, member)?;
        let amount = ids::magnitude(amount, "value")?;
        let transition = self
            .apply(&group, &member, Change::Levels(amount), Direction::Subtract)
            .await?;
        Ok(SubtractOutcome::from_transition(&transition, self.config.return_details))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn lookup(&self, group: &Identifier, member: &Identifier) -> Result<Option<MemberRecord>> {
        Ok(self
            .store
            .find_group(group.as_str())
            .await?
            .and_then(|doc| doc.member(member.as_str()).copied()))
    }

    async fn require(&self, group: &Identifier, member: &Identifier) -> Result<MemberRecord> {
        self.lookup(group, member)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("Member {} in group {}", member, group)))
    }

    async fn write(&self, group: &Identifier, member: &Identifier, record: MemberRecord) -> Result<()> {
        let matched = self
            .store
            .update_member_fields(group.as_str(), member.as_str(), MemberFields::from(record))
            .await?;
        if !matched {
            // The group vanished between the read and the write
            return Err(LedgerError::NotFound(format!("Group {}", group)));
        }
        Ok(())
    }

    async fn replace(&self, group: &Identifier, member: &Identifier, record: MemberRecord) -> Result<()> {
        let _guard = self.locks.acquire(group, member).await;
        self.require(group, member).await?;
        self.write(group, member, record).await?;
        log::debug!("Set member {} in group {} to {:?}", member, group, record);
        Ok(())
    }

    async fn apply(
        &self,
        group: &Identifier,
        member: &Identifier,
        change: Change,
        direction: Direction,
    ) -> Result<Transition> {
        let _guard = self.locks.acquire(group, member).await;
        let before = self.require(group, member).await?;
        let transition = self.progress.compute_delta(before, change, direction);
        self.write(group, member, transition.after).await?;

        log::debug!(
            "{:?} {:?} for member {} in group {}: {:?} -> {:?}",
            direction,
            change,
            member,
            group,
            transition.before,
            transition.after
        );
        Ok(transition)
    }
}
