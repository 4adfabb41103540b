pub mod account;
pub mod email_history;

pub use account::PostgresAccountStore;
pub use email_history::PostgresEmailHistoryStore;
