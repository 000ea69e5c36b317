use rand::Rng;
use rusqlite::params;

use crate::accounts::domain::AccountId;
use crate::db::StoreError;
use crate::state::DbPool;

/// Register a new account. Returns its id.
pub fn create_account(
    pool: &DbPool,
    username: &str,
    is_admin: bool,
) -> Result<AccountId, StoreError> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO accounts (username, is_admin) VALUES (?1, ?2)",
        params![username, is_admin],
    )?;
    Ok(AccountId::new(conn.last_insert_rowid()))
}

/// Create a new session for an account. Returns the bearer token.
pub fn create_session(pool: &DbPool, account_id: AccountId, hours: u64) -> Result<String, StoreError> {
    let conn = pool.get()?;
    let token = generate_token();

    conn.execute(
        "INSERT INTO sessions (token, account_id, expires_at) VALUES (?1, ?2, datetime('now', ?3))",
        params![token, account_id.get(), format!("+{} hours", hours)],
    )?;

    Ok(token)
}

/// Delete a session by token.
pub fn delete_session(pool: &DbPool, token: &str) -> Result<(), StoreError> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
