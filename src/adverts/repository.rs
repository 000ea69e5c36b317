// Advert store - isolates all database side effects for adverts
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::HashMap;

use crate::accounts::AccountId;
use crate::adverts::domain::{Advert, AdvertDraft, AdvertId, Author};
use crate::db::StoreError;
use crate::state::DbPool;

#[async_trait]
pub trait AdvertStore: Send + Sync {
    /// Every advert, unfiltered, in store order.
    async fn load_all(&self) -> Result<Vec<Advert>, StoreError>;

    async fn load_by_id(&self, id: AdvertId) -> Result<Option<Advert>, StoreError>;

    /// Persist a new advert. It starts hidden with zero views; the store assigns the id.
    async fn insert(
        &self,
        draft: AdvertDraft,
        author: Author,
        date: DateTime<Utc>,
    ) -> Result<Advert, StoreError>;

    /// Overwrite an existing advert.
    async fn save(&self, advert: &Advert) -> Result<(), StoreError>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, id: AdvertId) -> Result<bool, StoreError>;
}

pub struct SqliteAdvertStore {
    pool: DbPool,
}

impl SqliteAdvertStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const ADVERT_COLUMNS: &str =
    "id, title, price, author_id, is_shown, location, synopsis, phone, date, views";

struct AdvertRow {
    id: i64,
    title: String,
    price: String,
    author_id: Option<i64>,
    is_shown: bool,
    location: String,
    synopsis: String,
    phone: String,
    date: String,
    views: i64,
}

impl AdvertRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            price: row.get(2)?,
            author_id: row.get(3)?,
            is_shown: row.get(4)?,
            location: row.get(5)?,
            synopsis: row.get(6)?,
            phone: row.get(7)?,
            date: row.get(8)?,
            views: row.get(9)?,
        })
    }

    fn into_advert(self, photos: Vec<String>) -> Result<Advert, StoreError> {
        let date = DateTime::parse_from_rfc3339(&self.date)?.with_timezone(&Utc);
        let author = match self.author_id {
            Some(id) => Author::Account(AccountId::new(id)),
            None => Author::Unauthenticated,
        };

        Ok(Advert {
            id: AdvertId::new(self.id),
            title: self.title,
            price: self.price,
            author,
            is_shown: self.is_shown,
            location: self.location,
            synopsis: self.synopsis,
            phone: self.phone,
            photos,
            date,
            views: u64::try_from(self.views).unwrap_or(0),
        })
    }
}

fn load_photos(conn: &Connection, id: AdvertId) -> Result<Vec<String>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT photo FROM advert_photos WHERE advert_id = ?1 ORDER BY position")?;
    let photos = stmt
        .query_map(params![id.get()], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(photos)
}

fn replace_photos(tx: &Transaction<'_>, id: AdvertId, photos: &[String]) -> Result<(), StoreError> {
    tx.execute(
        "DELETE FROM advert_photos WHERE advert_id = ?1",
        params![id.get()],
    )?;

    let mut insert =
        tx.prepare("INSERT INTO advert_photos (advert_id, position, photo) VALUES (?1, ?2, ?3)")?;
    for (position, photo) in photos.iter().enumerate() {
        insert.execute(params![id.get(), position as i64, photo])?;
    }

    Ok(())
}

fn views_column(views: u64) -> i64 {
    i64::try_from(views).unwrap_or(i64::MAX)
}

#[async_trait]
impl AdvertStore for SqliteAdvertStore {
    async fn load_all(&self) -> Result<Vec<Advert>, StoreError> {
        let conn = self.pool.get()?;

        let mut photos: HashMap<i64, Vec<String>> = HashMap::new();
        {
            let mut stmt = conn.prepare(
                "SELECT advert_id, photo FROM advert_photos ORDER BY advert_id, position",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (advert_id, photo) = row?;
                photos.entry(advert_id).or_default().push(photo);
            }
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM adverts ORDER BY id",
            ADVERT_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], AdvertRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| {
                let advert_photos = photos.remove(&row.id).unwrap_or_default();
                row.into_advert(advert_photos)
            })
            .collect()
    }

    async fn load_by_id(&self, id: AdvertId) -> Result<Option<Advert>, StoreError> {
        let conn = self.pool.get()?;

        let row = conn
            .query_row(
                &format!("SELECT {} FROM adverts WHERE id = ?1", ADVERT_COLUMNS),
                params![id.get()],
                AdvertRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => {
                let photos = load_photos(&conn, id)?;
                Ok(Some(row.into_advert(photos)?))
            }
            None => Ok(None),
        }
    }

    async fn insert(
        &self,
        draft: AdvertDraft,
        author: Author,
        date: DateTime<Utc>,
    ) -> Result<Advert, StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO adverts (title, price, author_id, is_shown, location, synopsis, phone, date, views)
             VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7, 0)",
            params![
                draft.title,
                draft.price,
                author.account_id().map(|id| id.get()),
                draft.location,
                draft.synopsis,
                draft.phone,
                date.to_rfc3339(),
            ],
        )?;
        let id = AdvertId::new(tx.last_insert_rowid());
        replace_photos(&tx, id, &draft.photos)?;
        tx.commit()?;

        Ok(Advert {
            id,
            title: draft.title,
            price: draft.price,
            author,
            is_shown: false,
            location: draft.location,
            synopsis: draft.synopsis,
            phone: draft.phone,
            photos: draft.photos,
            date,
            views: 0,
        })
    }

    async fn save(&self, advert: &Advert) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let updated = tx.execute(
            "UPDATE adverts SET
               title = ?2, price = ?3, author_id = ?4, is_shown = ?5,
               location = ?6, synopsis = ?7, phone = ?8, date = ?9, views = ?10
             WHERE id = ?1",
            params![
                advert.id.get(),
                advert.title,
                advert.price,
                advert.author.account_id().map(|id| id.get()),
                advert.is_shown,
                advert.location,
                advert.synopsis,
                advert.phone,
                advert.date.to_rfc3339(),
                views_column(advert.views),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("advert {}", advert.id)));
        }

        replace_photos(&tx, advert.id, &advert.photos)?;
        tx.commit()?;
        Ok(())
    }

    async fn delete(&self, id: AdvertId) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM adverts WHERE id = ?1", params![id.get()])?;
        Ok(rows > 0)
    }
}
