// Ledger Projection - Core Library
// Reads ledger entries out of SQLite and hands back decoded, per-account buckets

pub mod error;
pub mod decode;
pub mod grouping;
pub mod asset;
pub mod store;
pub mod entities;
pub mod query;
pub mod snapshot;
pub mod config;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use decode::{AccountFlagSet, ThresholdLevels, PRECISION};
pub use grouping::{group_by, Keyed};
pub use asset::Asset;
pub use store::{open_read_only, setup_database};
pub use entities::{
    Account, AccountFlags, AccountThresholds,
    Trustline, TrustlineFlags,
    Signer, DataEntry,
};
pub use query::{
    query_accounts, query_trustlines, query_signers, query_data_entries,
    query_account, query_trustlines_with_native, query_accounts_signed_by,
};
pub use snapshot::{LedgerSnapshot, ImportStats, load_snapshot, insert_snapshot};
pub use config::{Config, OutputFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
