// Ledger entry models
//
// Each entity has:
// - a crate-private row type mirroring its table
// - a pure decode step producing the public snapshot
// - a `Keyed` impl naming the account it is bucketed under

pub mod account;
pub mod trustline;
pub mod signer;
pub mod data_entry;

pub use account::{Account, AccountFlags, AccountThresholds};
pub use trustline::{Trustline, TrustlineFlags};
pub use signer::Signer;
pub use data_entry::DataEntry;
