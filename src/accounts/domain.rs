use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::adverts::AdvertId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user as seen by the advert service.
///
/// Bookmarks are a set: an advert is either bookmarked or not. Entries may
/// point at adverts that were deleted or hidden since; readers filter them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub is_admin: bool,
    pub bookmark_ids: BTreeSet<AdvertId>,
}

impl Account {
    pub fn has_bookmark(&self, advert_id: AdvertId) -> bool {
        self.bookmark_ids.contains(&advert_id)
    }

    /// Flip bookmark membership. Returns whether the advert is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, advert_id: AdvertId) -> bool {
        if self.bookmark_ids.remove(&advert_id) {
            false
        } else {
            self.bookmark_ids.insert(advert_id);
            true
        }
    }
}
