// 🏷️ Data Entry Entity - named key/value pairs attached to an account
//
// Values are arbitrary bytes (up to 64) stored base64-encoded.

use crate::decode;
use crate::grouping::Keyed;
use crate::query::LedgerEntity;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub(crate) struct DataEntryRow {
    accountid: String,
    dataname: String,
    datavalue: String,
    lastmodified: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    /// `{account}-{name}`
    pub id: String,
    pub account_id: String,
    pub name: String,

    /// Decoded value as text; `None` when the bytes are not UTF-8
    pub value: Option<String>,

    #[serde(skip)]
    pub value_bytes: Vec<u8>,

    pub last_modified: i64,
}

impl Keyed for DataEntry {
    type Key = String;

    fn key(&self) -> &String {
        &self.account_id
    }
}

impl LedgerEntity for DataEntry {
    type Row = DataEntryRow;

    const TABLE: &'static str = "accountdata";
    const COLUMNS: &'static str = "accountid, dataname, datavalue, lastmodified";
    const ORDER_BY: &'static str = "accountid, dataname";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<DataEntryRow> {
        Ok(DataEntryRow {
            accountid: row.get(0)?,
            dataname: row.get(1)?,
            datavalue: row.get(2)?,
            lastmodified: row.get(3)?,
        })
    }

    fn decode(row: DataEntryRow) -> DataEntry {
        let what = format!("accountdata.datavalue of {}/{}", row.accountid, row.dataname);
        let value_bytes = decode::base64_column(&row.datavalue, &what);
        let value = String::from_utf8(value_bytes.clone()).ok();

        DataEntry {
            id: format!("{}-{}", row.accountid, row.dataname),
            account_id: row.accountid,
            name: row.dataname,
            value,
            value_bytes,
            last_modified: row.lastmodified,
        }
    }
}
