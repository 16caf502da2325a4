// ✍️ Signer Entity - additional signing keys of an account

use crate::grouping::Keyed;
use crate::query::LedgerEntity;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub(crate) struct SignerRow {
    accountid: String,
    publickey: String,
    weight: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub account_id: String,
    pub public_key: String,
    pub weight: i64,
}

impl Keyed for Signer {
    type Key = String;

    fn key(&self) -> &String {
        &self.account_id
    }
}

impl LedgerEntity for Signer {
    type Row = SignerRow;

    const TABLE: &'static str = "signers";
    const COLUMNS: &'static str = "accountid, publickey, weight";
    const ORDER_BY: &'static str = "accountid, publickey";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<SignerRow> {
        Ok(SignerRow {
            accountid: row.get(0)?,
            publickey: row.get(1)?,
            weight: row.get(2)?,
        })
    }

    fn decode(row: SignerRow) -> Signer {
        Signer {
            account_id: row.accountid,
            public_key: row.publickey,
            weight: row.weight,
        }
    }
}
