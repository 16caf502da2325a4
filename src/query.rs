// 🔎 Entity Query Service - one store round-trip, decode, group
//
// Every entity kind answers the same question: "for these account ids, give
// me one bucket each, in the order I asked". The kinds differ only in table,
// columns, ordering and decode step, which `LedgerEntity` captures.

use crate::entities::{Account, DataEntry, Signer, Trustline};
use crate::error::Result;
use crate::grouping::{group_by, Keyed};
use crate::store;
use rusqlite::{params, Connection, Row};
use tracing::debug;

/// Storage description + decode step for one entity kind.
///
/// `Row` mirrors the table layout and never leaves the crate.
pub(crate) trait LedgerEntity: Keyed<Key = String> + Clone + Sized {
    type Row;

    const TABLE: &'static str;
    const COLUMNS: &'static str;
    /// Primary discriminator first, then the secondary one (if any).
    const ORDER_BY: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self::Row>;

    fn decode(row: Self::Row) -> Self;
}

/// Column every entity table is bucketed by.
const ACCOUNT_COLUMN: &str = "accountid";

pub(crate) fn query_grouped<E, S>(conn: &Connection, account_ids: &[S]) -> Result<Vec<Vec<E>>>
where
    E: LedgerEntity,
    S: AsRef<str>,
{
    let keys: Vec<String> = account_ids.iter().map(|id| id.as_ref().to_string()).collect();

    let rows = store::fetch_rows(
        conn,
        E::TABLE,
        E::COLUMNS,
        ACCOUNT_COLUMN,
        E::ORDER_BY,
        &keys,
        E::from_row,
    )?;

    debug!(table = E::TABLE, keys = keys.len(), rows = rows.len(), "fetched ledger rows");

    let decoded: Vec<E> = rows.into_iter().map(E::decode).collect();
    Ok(group_by(&keys, decoded))
}

// ============================================================================
// PUBLIC QUERIES (one per entity kind, identical shape)
// ============================================================================

/// Accounts for each requested id (each bucket holds zero or one account).
pub fn query_accounts<S: AsRef<str>>(conn: &Connection, account_ids: &[S]) -> Result<Vec<Vec<Account>>> {
    query_grouped(conn, account_ids)
}

/// Trustlines owned by each requested account, ordered by issuer then code.
pub fn query_trustlines<S: AsRef<str>>(
    conn: &Connection,
    account_ids: &[S],
) -> Result<Vec<Vec<Trustline>>> {
    query_grouped(conn, account_ids)
}

/// Signers of each requested account, ordered by public key.
pub fn query_signers<S: AsRef<str>>(conn: &Connection, account_ids: &[S]) -> Result<Vec<Vec<Signer>>> {
    query_grouped(conn, account_ids)
}

/// Data entries of each requested account, ordered by name.
pub fn query_data_entries<S: AsRef<str>>(
    conn: &Connection,
    account_ids: &[S],
) -> Result<Vec<Vec<DataEntry>>> {
    query_grouped(conn, account_ids)
}

// ============================================================================
// CONVENIENCE QUERIES
// ============================================================================

/// Single account lookup.
pub fn query_account(conn: &Connection, account_id: &str) -> Result<Option<Account>> {
    let mut buckets = query_accounts(conn, &[account_id])?;
    Ok(buckets.pop().and_then(|bucket| bucket.into_iter().next()))
}

/// Trustlines with the native balance line prepended for every existing account.
pub fn query_trustlines_with_native<S: AsRef<str>>(
    conn: &Connection,
    account_ids: &[S],
) -> Result<Vec<Vec<Trustline>>> {
    let accounts = query_accounts(conn, account_ids)?;
    let trustlines = query_trustlines(conn, account_ids)?;
    Ok(Trustline::prepend_native(&accounts, trustlines))
}

/// The account holding `public_key` followed by up to `limit` accounts that
/// list it as a signer, ordered by account id.
///
/// Empty when `public_key` is not itself an account.
pub fn query_accounts_signed_by(
    conn: &Connection,
    public_key: &str,
    limit: u32,
) -> Result<Vec<Account>> {
    let Some(account) = query_account(conn, public_key)? else {
        return Ok(Vec::new());
    };

    let mut stmt = conn.prepare(
        "SELECT accountid FROM signers
         WHERE publickey = ?1 AND accountid <> ?1
         ORDER BY accountid
         LIMIT ?2",
    )?;

    let signed: Vec<String> = stmt
        .query_map(params![public_key, limit], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(public_key, signed = signed.len(), "accounts signed by key");

    let mut result = vec![account];
    result.extend(query_accounts(conn, &signed)?.into_iter().flatten());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{insert_snapshot, LedgerSnapshot};
    use crate::store::setup_database;

    fn ledger() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let snapshot: LedgerSnapshot = serde_json::from_value(serde_json::json!({
            "accounts": [
                { "accountid": "X", "balance": 1234500000, "seqnum": 10, "numsubentries": 2,
                  "thresholds": "FAoFDw==", "flags": 5, "lastmodified": 100 },
                { "accountid": "S", "balance": 50000000, "seqnum": 3,
                  "thresholds": "AQAAAA==", "flags": 0, "lastmodified": 90 },
                { "accountid": "W", "balance": 0, "seqnum": 1,
                  "thresholds": "AQAAAA==", "flags": 0, "lastmodified": 91 }
            ],
            "trustlines": [
                { "accountid": "X", "assettype": 2, "issuer": "GZ", "assetcode": "LONGASSET",
                  "tlimit": 1000000000, "balance": 10000000, "flags": 1, "lastmodified": 100 },
                { "accountid": "X", "assettype": 1, "issuer": "GB", "assetcode": "USD",
                  "tlimit": 500000000, "balance": 0, "flags": 0, "lastmodified": 100 }
            ],
            "signers": [
                { "accountid": "X", "publickey": "S", "weight": 1 },
                { "accountid": "W", "publickey": "S", "weight": 2 },
                { "accountid": "X", "publickey": "K", "weight": 5 }
            ],
            "data": [
                { "accountid": "X", "dataname": "b", "datavalue": "Yg==", "lastmodified": 100 },
                { "accountid": "X", "dataname": "a", "datavalue": "YQ==", "lastmodified": 100 }
            ]
        }))
        .unwrap();
        insert_snapshot(&conn, &snapshot).unwrap();
        conn
    }

    #[test]
    fn test_accounts_end_to_end_keeps_missing_keys() {
        let conn = ledger();

        let buckets = query_accounts(&conn, &["X", "Y"]).unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].len(), 1);
        assert!(buckets[1].is_empty());

        let x = &buckets[0][0];
        assert_eq!(x.id, "X");
        assert_eq!(x.balance, 123.45);
        assert_eq!(x.num_subentries, 2);
        assert_eq!(x.thresholds.levels, crate::decode::ThresholdLevels::unpack(&[20, 10, 5, 15]));
        assert!(x.flags.set.auth_required && x.flags.set.auth_immutable);
    }

    #[test]
    fn test_buckets_follow_caller_order_not_store_order() {
        let conn = ledger();

        let buckets = query_accounts(&conn, &["W", "Y", "S", "X"]).unwrap();
        let ids: Vec<Option<&str>> = buckets
            .iter()
            .map(|b| b.first().map(|a| a.id.as_str()))
            .collect();

        assert_eq!(ids, vec![Some("W"), None, Some("S"), Some("X")]);
    }

    #[test]
    fn test_trustlines_ordered_by_issuer() {
        let conn = ledger();

        let buckets = query_trustlines(&conn, &["X".to_string(), "S".to_string()]).unwrap();

        let codes: Vec<&str> = buckets[0].iter().map(|t| t.asset.code()).collect();
        assert_eq!(codes, vec!["USD", "LONGASSET"]);
        assert!(!buckets[0][0].flags.authorized);
        assert!(buckets[0][1].flags.authorized);
        assert_eq!(buckets[0][1].limit, 100.0);
        assert!(buckets[1].is_empty());
    }

    #[test]
    fn test_trustlines_with_native() {
        let conn = ledger();

        let buckets = query_trustlines_with_native(&conn, &["X", "nobody"]).unwrap();

        assert_eq!(buckets[0].len(), 3);
        assert!(buckets[0][0].asset.is_native());
        assert_eq!(buckets[0][0].balance, 123.45);
        assert!(buckets[1].is_empty());
    }

    #[test]
    fn test_signers_and_data_entries() {
        let conn = ledger();

        let signers = query_signers(&conn, &["X", "W", "X"]).unwrap();
        let keys: Vec<&str> = signers[0].iter().map(|s| s.public_key.as_str()).collect();
        assert_eq!(keys, vec!["K", "S"]);
        assert_eq!(signers[1], vec![Signer {
            account_id: "W".to_string(),
            public_key: "S".to_string(),
            weight: 2,
        }]);
        assert_eq!(signers[2], signers[0]);

        let data = query_data_entries(&conn, &["X"]).unwrap();
        let values: Vec<Option<&str>> = data[0].iter().map(|d| d.value.as_deref()).collect();
        assert_eq!(values, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn test_empty_key_list() {
        let conn = ledger();
        let keys: Vec<String> = Vec::new();

        assert!(query_accounts(&conn, &keys).unwrap().is_empty());
        assert!(query_data_entries(&conn, &keys).unwrap().is_empty());
    }

    #[test]
    fn test_query_account() {
        let conn = ledger();

        assert_eq!(query_account(&conn, "S").unwrap().map(|a| a.balance), Some(5.0));
        assert!(query_account(&conn, "Y").unwrap().is_none());
    }

    #[test]
    fn test_accounts_signed_by() {
        let conn = ledger();

        let accounts = query_accounts_signed_by(&conn, "S", 10).unwrap();
        let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["S", "W", "X"]);

        let limited = query_accounts_signed_by(&conn, "S", 1).unwrap();
        assert_eq!(limited.len(), 2);

        // K signs X but is not an account itself
        assert!(query_accounts_signed_by(&conn, "K", 10).unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "accounts.thresholds of bad")]
    fn test_one_corrupt_row_fails_the_whole_batch() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        let snapshot: LedgerSnapshot = serde_json::from_value(serde_json::json!({
            "accounts": [
                { "accountid": "good", "balance": 10000000, "seqnum": 1,
                  "thresholds": "AQAAAA==", "flags": 0, "lastmodified": 1 },
                { "accountid": "bad", "balance": 10000000, "seqnum": 1,
                  "thresholds": "AQAA", "flags": 0, "lastmodified": 1 }
            ]
        }))
        .unwrap();
        insert_snapshot(&conn, &snapshot).unwrap();

        // no partial result for "good"
        let _ = query_accounts(&conn, &["good", "bad"]);
    }

    #[test]
    fn test_store_error_is_surfaced() {
        let conn = Connection::open_in_memory().unwrap();

        let result = query_signers(&conn, &["X"]);

        assert!(matches!(result, Err(crate::error::LedgerError::Store(_))));
    }
}
