// 📦 Ledger snapshot import - JSON dump of stored rows → SQLite tables
//
// Field names match the table columns and values are stored as-is
// (stroops, base64 thresholds/data, flag masks). Nothing is decoded here.

use crate::error::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEntry {
    pub accountid: String,
    pub balance: i64,
    pub seqnum: i64,
    #[serde(default)]
    pub numsubentries: i64,
    #[serde(default)]
    pub inflationdest: Option<String>,
    #[serde(default)]
    pub homedomain: Option<String>,
    pub thresholds: String,
    #[serde(default)]
    pub flags: i64,
    pub lastmodified: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustlineEntry {
    pub accountid: String,
    pub assettype: i64,
    pub issuer: String,
    pub assetcode: String,
    pub tlimit: i64,
    pub balance: i64,
    #[serde(default)]
    pub flags: i64,
    pub lastmodified: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerEntry {
    pub accountid: String,
    pub publickey: String,
    pub weight: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEntryRecord {
    pub accountid: String,
    pub dataname: String,
    pub datavalue: String,
    pub lastmodified: i64,
}

/// Stored rows of every ledger table, as exported by an ingesting node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
    #[serde(default)]
    pub trustlines: Vec<TrustlineEntry>,
    #[serde(default)]
    pub signers: Vec<SignerEntry>,
    #[serde(default)]
    pub data: Vec<DataEntryRecord>,
}

/// Rows written by [`insert_snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub inserted: usize,
    pub duplicates: usize,
}

pub fn load_snapshot(path: &Path) -> Result<LedgerSnapshot> {
    let file = std::fs::File::open(path)?;
    let snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(snapshot)
}

fn record(stats: &mut ImportStats, result: rusqlite::Result<usize>) -> Result<()> {
    match result {
        Ok(_) => stats.inserted += 1,
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            stats.duplicates += 1;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Insert every row of `snapshot`. Rows whose primary key already exists
/// are skipped and counted as duplicates.
pub fn insert_snapshot(conn: &Connection, snapshot: &LedgerSnapshot) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for a in &snapshot.accounts {
        let result = conn.execute(
            "INSERT INTO accounts (
                accountid, balance, seqnum, numsubentries, inflationdest,
                homedomain, thresholds, flags, lastmodified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                a.accountid,
                a.balance,
                a.seqnum,
                a.numsubentries,
                a.inflationdest,
                a.homedomain,
                a.thresholds,
                a.flags,
                a.lastmodified,
            ],
        );
        record(&mut stats, result)?;
    }

    for t in &snapshot.trustlines {
        let result = conn.execute(
            "INSERT INTO trustlines (
                accountid, assettype, issuer, assetcode, tlimit, balance, flags, lastmodified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                t.accountid,
                t.assettype,
                t.issuer,
                t.assetcode,
                t.tlimit,
                t.balance,
                t.flags,
                t.lastmodified,
            ],
        );
        record(&mut stats, result)?;
    }

    for s in &snapshot.signers {
        let result = conn.execute(
            "INSERT INTO signers (accountid, publickey, weight) VALUES (?1, ?2, ?3)",
            params![s.accountid, s.publickey, s.weight],
        );
        record(&mut stats, result)?;
    }

    for d in &snapshot.data {
        let result = conn.execute(
            "INSERT INTO accountdata (accountid, dataname, datavalue, lastmodified)
             VALUES (?1, ?2, ?3, ?4)",
            params![d.accountid, d.dataname, d.datavalue, d.lastmodified],
        );
        record(&mut stats, result)?;
    }

    info!(inserted = stats.inserted, duplicates = stats.duplicates, "snapshot imported");

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::setup_database;

    fn sample() -> LedgerSnapshot {
        serde_json::from_value(serde_json::json!({
            "accounts": [{
                "accountid": "GA",
                "balance": 1234500000,
                "seqnum": 1,
                "thresholds": "FAoFDw==",
                "flags": 5,
                "lastmodified": 9
            }],
            "signers": [
                { "accountid": "GA", "publickey": "GS1", "weight": 1 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults_for_missing_tables() {
        let snapshot = sample();
        assert_eq!(snapshot.accounts.len(), 1);
        assert!(snapshot.trustlines.is_empty());
        assert!(snapshot.data.is_empty());
        assert_eq!(snapshot.accounts[0].numsubentries, 0);
        assert_eq!(snapshot.accounts[0].homedomain, None);
    }

    #[test]
    fn test_import_twice_skips_duplicates() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let first = insert_snapshot(&conn, &sample()).unwrap();
        let second = insert_snapshot(&conn, &sample()).unwrap();

        assert_eq!(first, ImportStats { inserted: 2, duplicates: 0 });
        assert_eq!(second, ImportStats { inserted: 0, duplicates: 2 });

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_load_snapshot_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.accounts[0].accountid, "GA");
        assert_eq!(loaded.signers.len(), 1);
    }
}
