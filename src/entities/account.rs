// 💳 Account Entity - `accounts` row → decoded account snapshot
//
// Stored layout keeps the balance in stroops, the thresholds as a base64
// packed blob and the flags as a bitmask. `AccountRow` mirrors that layout;
// `Account` is what callers see.

use crate::decode::{self, AccountFlagSet, ThresholdLevels};
use crate::grouping::Keyed;
use crate::query::LedgerEntity;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

// ============================================================================
// RAW ROW (storage boundary)
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct AccountRow {
    accountid: String,
    balance: i64,
    seqnum: i64,
    numsubentries: i64,
    inflationdest: Option<String>,
    homedomain: Option<String>,
    thresholds: String,
    flags: i64,
    lastmodified: i64,
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

/// Signing thresholds of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountThresholds {
    pub id: String,
    #[serde(flatten)]
    pub levels: ThresholdLevels,
}

/// Authorization flags of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFlags {
    pub id: String,
    #[serde(flatten)]
    pub set: AccountFlagSet,
}

/// Account snapshot as of `last_modified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,

    /// Native balance in XLM (stored value / 10^7)
    pub balance: f64,

    pub sequence_number: i64,
    pub num_subentries: i64,
    pub inflation_dest: Option<String>,
    pub home_domain: Option<String>,
    pub thresholds: AccountThresholds,
    pub flags: AccountFlags,

    /// Ledger sequence that last touched this entry
    pub last_modified: i64,
}

impl Keyed for Account {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }
}

impl LedgerEntity for Account {
    type Row = AccountRow;

    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static str = "accountid, balance, seqnum, numsubentries, inflationdest, \
                                   homedomain, thresholds, flags, lastmodified";
    const ORDER_BY: &'static str = "accountid";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
        Ok(AccountRow {
            accountid: row.get(0)?,
            balance: row.get(1)?,
            seqnum: row.get(2)?,
            numsubentries: row.get(3)?,
            inflationdest: row.get(4)?,
            homedomain: row.get(5)?,
            thresholds: row.get(6)?,
            flags: row.get(7)?,
            lastmodified: row.get(8)?,
        })
    }

    fn decode(row: AccountRow) -> Account {
        let what = format!("accounts.thresholds of {}", row.accountid);
        let levels = decode::thresholds_column(&row.thresholds, &what);

        Account {
            balance: decode::amount(row.balance),
            sequence_number: row.seqnum,
            num_subentries: row.numsubentries,
            inflation_dest: row.inflationdest,
            home_domain: row.homedomain,
            thresholds: AccountThresholds {
                id: row.accountid.clone(),
                levels,
            },
            flags: AccountFlags {
                id: row.accountid.clone(),
                set: AccountFlagSet::from_raw(row.flags),
            },
            last_modified: row.lastmodified,
            id: row.accountid,
        }
    }
}
