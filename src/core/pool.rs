use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use crate::models::{PreferenceProfile, RequesterId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("requester {0} is already waiting")]
    AlreadyWaiting(RequesterId),
}

/// Profiles of requesters currently searching for a partner
///
/// Iteration is oldest-first so scans favour whoever has waited longest.
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: HashMap<RequesterId, PreferenceProfile>,
    order: BTreeMap<u64, RequesterId>,
    next_seq: u64,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile, stamping it with the next insertion sequence
    pub fn insert(&mut self, mut profile: PreferenceProfile) -> Result<(), PoolError> {
        if self.entries.contains_key(&profile.requester_id) {
            return Err(PoolError::AlreadyWaiting(profile.requester_id));
        }

        self.next_seq += 1;
        profile.enqueued_at = self.next_seq;
        self.order.insert(profile.enqueued_at, profile.requester_id.clone());
        self.entries.insert(profile.requester_id.clone(), profile);
        Ok(())
    }

    /// Remove a profile; `None` if the requester was not waiting
    pub fn remove(&mut self, id: &RequesterId) -> Option<PreferenceProfile> {
        let profile = self.entries.remove(id)?;
        self.order.remove(&profile.enqueued_at);
        Some(profile)
    }

    /// All waiting profiles except `excluding`, oldest first
    pub fn iter_candidates<'a>(
        &'a self,
        excluding: &'a RequesterId,
    ) -> impl Iterator<Item = &'a PreferenceProfile> + 'a {
        self.order
            .values()
            .filter(move |id| *id != excluding)
            .filter_map(|id| self.entries.get(id))
    }

    /// All waiting profiles, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &PreferenceProfile> + '_ {
        self.order.values().filter_map(|id| self.entries.get(id))
    }

    pub fn contains(&self, id: &RequesterId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &RequesterId) -> Option<&PreferenceProfile> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
