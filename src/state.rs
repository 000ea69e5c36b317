use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::adverts::AdvertService;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub service: AdvertService,
}
