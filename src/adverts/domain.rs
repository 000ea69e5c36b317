// Advert domain types. No I/O here.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::accounts::{Account, AccountId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdvertId(pub i64);

impl AdvertId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AdvertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who posted an advert.
///
/// Adverts created without a resolvable token belong to nobody. No caller
/// can ever own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    Account(AccountId),
    Unauthenticated,
}

impl Author {
    pub fn from_caller(caller: Option<&Account>) -> Self {
        match caller {
            Some(account) => Self::Account(account.id),
            None => Self::Unauthenticated,
        }
    }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Account(id) => Some(*id),
            Self::Unauthenticated => None,
        }
    }

    /// Ownership check. Fails closed when either side is unknown.
    pub fn is_owned_by(&self, caller: Option<&Account>) -> bool {
        match (self, caller) {
            (Self::Account(author), Some(account)) => *author == account.id,
            _ => false,
        }
    }
}

/// The fields an author may set. Used for both creation and full replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvertDraft {
    pub title: String,
    pub price: String,
    pub location: String,
    pub synopsis: String,
    pub phone: String,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advert {
    pub id: AdvertId,
    pub title: String,
    pub price: String,
    pub author: Author,
    pub is_shown: bool,
    pub location: String,
    pub synopsis: String,
    pub phone: String,
    pub photos: Vec<String>,
    pub date: DateTime<Utc>,
    pub views: u64,
}

impl Advert {
    /// Replace every editable field. Any content change sends the advert
    /// back to moderation.
    pub fn apply_draft(&mut self, draft: AdvertDraft) {
        self.title = draft.title;
        self.price = draft.price;
        self.location = draft.location;
        self.synopsis = draft.synopsis;
        self.phone = draft.phone;
        self.photos = draft.photos;
        self.is_shown = false;
    }

    pub fn record_view(&mut self) {
        self.views = self.views.saturating_add(1);
    }

    pub fn thumbnail(&self) -> &str {
        self.photos.first().map(String::as_str).unwrap_or("")
    }
}
