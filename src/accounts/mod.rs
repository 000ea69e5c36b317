pub mod directory;
pub mod domain;
pub mod session;

pub use directory::{AccountDirectory, SqliteAccountDirectory};
pub use domain::{Account, AccountId};
