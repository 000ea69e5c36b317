// Account directory - resolves bearer tokens and persists bookmark sets
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

use crate::accounts::domain::{Account, AccountId};
use crate::adverts::AdvertId;
use crate::db::StoreError;
use crate::state::DbPool;

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Resolve an opaque token. Unknown, expired or malformed tokens give `None`.
    async fn resolve_token(&self, token: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Upsert the account, replacing its bookmark set.
    async fn save(&self, account: &Account) -> Result<(), StoreError>;
}

pub struct SqliteAccountDirectory {
    pool: DbPool,
}

impl SqliteAccountDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_bookmarks(conn: &Connection, id: AccountId) -> Result<BTreeSet<AdvertId>, StoreError> {
    let mut stmt = conn.prepare("SELECT advert_id FROM bookmarks WHERE account_id = ?1")?;
    let ids = stmt
        .query_map(params![id.get()], |row| row.get::<_, i64>(0))?
        .map(|r| r.map(AdvertId::new))
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(ids)
}

fn load_account(conn: &Connection, id: AccountId) -> Result<Option<Account>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, username, is_admin FROM accounts WHERE id = ?1",
            params![id.get()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, username, is_admin)) => {
            let id = AccountId::new(id);
            Ok(Some(Account {
                id,
                username,
                is_admin,
                bookmark_ids: load_bookmarks(conn, id)?,
            }))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl AccountDirectory for SqliteAccountDirectory {
    async fn resolve_token(&self, token: &str) -> Result<Option<Account>, StoreError> {
        if token.is_empty() {
            return Ok(None);
        }

        let conn = self.pool.get()?;
        let account_id: Option<i64> = conn
            .query_row(
                "SELECT account_id FROM sessions
                 WHERE token = ?1 AND expires_at > datetime('now')",
                params![token],
                |row| row.get(0),
            )
            .optional()?;

        match account_id {
            Some(id) => load_account(&conn, AccountId::new(id)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let conn = self.pool.get()?;
        load_account(&conn, id)
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO accounts (id, username, is_admin) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
               username = excluded.username,
               is_admin = excluded.is_admin",
            params![account.id.get(), account.username, account.is_admin],
        )?;

        tx.execute(
            "DELETE FROM bookmarks WHERE account_id = ?1",
            params![account.id.get()],
        )?;
        {
            let mut insert =
                tx.prepare("INSERT INTO bookmarks (account_id, advert_id) VALUES (?1, ?2)")?;
            for advert_id in &account.bookmark_ids {
                insert.execute(params![account.id.get(), advert_id.get()])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::session::{create_account, create_session};
    use crate::db;

    fn setup() -> (DbPool, SqliteAccountDirectory) {
        let pool = db::memory_pool().unwrap();
        db::run_migrations(&pool).unwrap();
        let directory = SqliteAccountDirectory::new(pool.clone());
        (pool, directory)
    }

    #[tokio::test]
    async fn resolves_valid_token() {
        let (pool, directory) = setup();
        let id = create_account(&pool, "alice", true).unwrap();
        let token = create_session(&pool, id, 1).unwrap();

        let account = directory.resolve_token(&token).await.unwrap().unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.username, "alice");
        assert!(account.is_admin);
        assert!(account.bookmark_ids.is_empty());
    }

    #[tokio::test]
    async fn unknown_and_empty_tokens_resolve_to_none() {
        let (_pool, directory) = setup();
        assert!(directory.resolve_token("nope").await.unwrap().is_none());
        assert!(directory.resolve_token("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_resolves_to_none() {
        let (pool, directory) = setup();
        let id = create_account(&pool, "bob", false).unwrap();
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO sessions (token, account_id, expires_at)
             VALUES ('old', ?1, datetime('now', '-1 hours'))",
            params![id.get()],
        )
        .unwrap();
        drop(conn);

        assert!(directory.resolve_token("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_bookmark_set() {
        let (pool, directory) = setup();
        let id = create_account(&pool, "carol", false).unwrap();

        let mut account = directory.find_by_id(id).await.unwrap().unwrap();
        account.bookmark_ids.insert(AdvertId(1));
        account.bookmark_ids.insert(AdvertId(2));
        directory.save(&account).await.unwrap();

        account.bookmark_ids.remove(&AdvertId(1));
        directory.save(&account).await.unwrap();

        let reloaded = directory.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.bookmark_ids, BTreeSet::from([AdvertId(2)]));
    }

    #[tokio::test]
    async fn find_missing_account_is_none() {
        let (_pool, directory) = setup();
        assert!(directory.find_by_id(AccountId(404)).await.unwrap().is_none());
    }
}
