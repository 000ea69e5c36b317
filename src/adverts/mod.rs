pub mod domain;
pub mod error;
pub mod pagination;
pub mod repository;
pub mod search;
pub mod service;
pub mod views;

pub use domain::{Advert, AdvertDraft, AdvertId, Author};
pub use error::AdvertError;
pub use pagination::{paginate, PageRequest, PAGE_SIZE};
pub use repository::{AdvertStore, SqliteAdvertStore};
pub use search::SearchQuery;
pub use service::AdvertService;
pub use views::{AdListItem, AdvertDetail};
