use thiserror::Error;

use crate::db::StoreError;

/// Why an advert operation did not complete.
///
/// Callers that only need a yes/no answer can use `Result::is_ok`.
#[derive(Debug, Error)]
pub enum AdvertError {
    #[error("Advert not found")]
    NotFound,

    #[error("Not allowed")]
    Forbidden,

    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

/// A row that disappeared under a write is a missing advert, not a store fault.
impl From<StoreError> for AdvertError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AdvertError::NotFound,
            other => AdvertError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanished_rows_become_not_found() {
        let err = AdvertError::from(StoreError::NotFound("advert 3".into()));
        assert!(matches!(err, AdvertError::NotFound));
    }

    #[test]
    fn other_store_failures_stay_store_errors() {
        let err = AdvertError::from(StoreError::Sql(rusqlite::Error::InvalidQuery));
        assert!(matches!(err, AdvertError::Store(StoreError::Sql(_))));
    }
}
