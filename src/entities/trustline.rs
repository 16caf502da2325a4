// 🔗 Trustline Entity - `trustlines` row → decoded trustline

use crate::asset::Asset;
use crate::decode::{self, AUTHORIZED_BIT};
use crate::entities::Account;
use crate::grouping::Keyed;
use crate::query::LedgerEntity;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub(crate) struct TrustlineRow {
    accountid: String,
    assettype: i64,
    issuer: String,
    assetcode: String,
    tlimit: i64,
    balance: i64,
    flags: i64,
    lastmodified: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustlineFlags {
    pub id: String,
    pub authorized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trustline {
    /// `{account}-{code}-{issuer}`
    pub id: String,
    pub account_id: String,
    #[serde(flatten)]
    pub asset: Asset,
    pub limit: f64,
    pub balance: f64,
    pub flags: TrustlineFlags,
    pub last_modified: i64,
}

fn trustline_id(account_id: &str, asset: &Asset) -> String {
    format!("{}-{}-{}", account_id, asset.code(), asset.issuer().unwrap_or("native"))
}

impl Trustline {
    /// The native balance of `account`, shaped as a trustline.
    ///
    /// Native holdings have no stored trustline; the limit is the largest
    /// representable amount and the line is always authorized.
    pub fn native_for(account: &Account) -> Trustline {
        let asset = Asset::Native;
        let id = trustline_id(&account.id, &asset);

        Trustline {
            flags: TrustlineFlags {
                id: id.clone(),
                authorized: true,
            },
            id,
            account_id: account.id.clone(),
            asset,
            limit: decode::amount(i64::MAX),
            balance: account.balance,
            last_modified: account.last_modified,
        }
    }

    /// Put the native line first in each bucket whose account exists.
    ///
    /// `accounts` and `trustlines` must be aligned to the same key list.
    pub fn prepend_native(
        accounts: &[Vec<Account>],
        trustlines: Vec<Vec<Trustline>>,
    ) -> Vec<Vec<Trustline>> {
        assert_eq!(accounts.len(), trustlines.len(), "buckets must share one key list");

        accounts
            .iter()
            .zip(trustlines)
            .map(|(account, lines)| match account.first() {
                Some(account) => {
                    let mut with_native = Vec::with_capacity(lines.len() + 1);
                    with_native.push(Trustline::native_for(account));
                    with_native.extend(lines);
                    with_native
                }
                None => lines,
            })
            .collect()
    }
}

impl Keyed for Trustline {
    type Key = String;

    fn key(&self) -> &String {
        &self.account_id
    }
}

impl LedgerEntity for Trustline {
    type Row = TrustlineRow;

    const TABLE: &'static str = "trustlines";
    const COLUMNS: &'static str =
        "accountid, assettype, issuer, assetcode, tlimit, balance, flags, lastmodified";
    const ORDER_BY: &'static str = "accountid, issuer, assetcode";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<TrustlineRow> {
        Ok(TrustlineRow {
            accountid: row.get(0)?,
            assettype: row.get(1)?,
            issuer: row.get(2)?,
            assetcode: row.get(3)?,
            tlimit: row.get(4)?,
            balance: row.get(5)?,
            flags: row.get(6)?,
            lastmodified: row.get(7)?,
        })
    }

    fn decode(row: TrustlineRow) -> Trustline {
        let asset = Asset::from_stored(row.assettype, row.assetcode, row.issuer);
        let id = trustline_id(&row.accountid, &asset);

        Trustline {
            flags: TrustlineFlags {
                id: id.clone(),
                authorized: decode::flag(row.flags, AUTHORIZED_BIT),
            },
            id,
            account_id: row.accountid,
            asset,
            limit: decode::amount(row.tlimit),
            balance: decode::amount(row.balance),
            last_modified: row.lastmodified,
        }
    }
}
