use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Advert, AdvertId};

/// Row in any advert listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdListItem {
    pub id: AdvertId,
    pub thumbnail: String,
    pub date: DateTime<Utc>,
    pub title: String,
    pub price: String,
    pub location: String,
    pub views: u64,
}

impl From<&Advert> for AdListItem {
    fn from(advert: &Advert) -> Self {
        Self {
            id: advert.id,
            thumbnail: advert.thumbnail().to_string(),
            date: advert.date,
            title: advert.title.clone(),
            price: advert.price.clone(),
            location: advert.location.clone(),
            views: advert.views,
        }
    }
}

/// Everything shown on a single advert's page.
///
/// An unknown id yields a placeholder with only `id` set and `date` absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AdvertDetail {
    pub id: AdvertId,
    pub photos: Vec<String>,
    pub title: String,
    pub price: String,
    pub location: String,
    pub date: Option<DateTime<Utc>>,
    pub views: u64,
    pub synopsis: String,
    pub username: String,
    pub phone: String,
    pub bookmarked: bool,
    pub shown: bool,
}

impl AdvertDetail {
    pub fn missing(id: AdvertId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn from_advert(advert: Advert, author_username: String, bookmarked: bool) -> Self {
        Self {
            id: advert.id,
            photos: advert.photos,
            title: advert.title,
            price: advert.price,
            location: advert.location,
            date: Some(advert.date),
            views: advert.views,
            synopsis: advert.synopsis,
            username: author_username,
            phone: advert.phone,
            bookmarked,
            shown: advert.is_shown,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.date.is_none()
    }
}
