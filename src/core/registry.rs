use std::collections::HashMap;
use chrono::{DateTime, Utc};
use thiserror::Error;
use crate::models::{ConnectedPair, RequesterId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("requester {0} is already paired")]
    AlreadyPaired(RequesterId),

    #[error("requester {0} cannot be paired with itself")]
    SelfPair(RequesterId),
}

#[derive(Debug, Clone)]
struct Link {
    partner: RequesterId,
    matched_at: DateTime<Utc>,
}

/// Active pairs, stored as two symmetric directed links
#[derive(Debug, Default)]
pub struct PairRegistry {
    links: HashMap<RequesterId, Link>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install both directed links for a new pair
    pub fn create(&mut self, a: &RequesterId, b: &RequesterId) -> Result<ConnectedPair, RegistryError> {
        if a == b {
            return Err(RegistryError::SelfPair(a.clone()));
        }
        for id in [a, b] {
            if self.links.contains_key(id) {
                return Err(RegistryError::AlreadyPaired(id.clone()));
            }
        }

        let matched_at = Utc::now();
        self.links.insert(a.clone(), Link { partner: b.clone(), matched_at });
        self.links.insert(b.clone(), Link { partner: a.clone(), matched_at });

        Ok(ConnectedPair {
            first: a.clone(),
            second: b.clone(),
            matched_at,
        })
    }

    pub fn partner_of(&self, id: &RequesterId) -> Option<&RequesterId> {
        self.links.get(id).map(|link| &link.partner)
    }

    /// The pair `id` belongs to, if any
    pub fn pair_of(&self, id: &RequesterId) -> Option<ConnectedPair> {
        self.links.get(id).map(|link| ConnectedPair {
            first: id.clone(),
            second: link.partner.clone(),
            matched_at: link.matched_at,
        })
    }

    /// Tear down the pair containing `id`, returning the partner
    ///
    /// Idempotent: a second call for the same id returns `None`.
    pub fn end(&mut self, id: &RequesterId) -> Option<RequesterId> {
        let link = self.links.remove(id)?;
        let back = self.links.remove(&link.partner);
        assert!(
            back.as_ref().map(|b| &b.partner) == Some(id),
            "pair registry asymmetric: {} -> {} without reverse link",
            id,
            link.partner
        );
        Some(link.partner)
    }

    pub fn contains(&self, id: &RequesterId) -> bool {
        self.links.contains_key(id)
    }

    pub fn pair_count(&self) -> usize {
        self.links.len() / 2
    }

    /// Every directed link as `(id, partner)`
    pub fn links(&self) -> impl Iterator<Item = (&RequesterId, &RequesterId)> + '_ {
        self.links.iter().map(|(id, link)| (id, &link.partner))
    }
}
