// 🗄️ Store boundary - SQLite ledger tables + batched IN-queries
//
// The ledger tables are owned by the node that ingests ledgers; this crate
// only reads them. `setup_database` creates the same layout so a fresh or
// in-memory database can be queried (tests, snapshot imports).

use crate::error::{LedgerError, Result};
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use std::path::Path;

/// Open an existing ledger database for reading.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    if !path.exists() {
        return Err(LedgerError::DatabaseNotFound(path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery (in-memory databases report "memory")
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

    // ==========================================================================
    // Accounts (thresholds: base64 of 4 packed bytes)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            accountid VARCHAR(56) PRIMARY KEY,
            balance BIGINT NOT NULL CHECK (balance >= 0),
            seqnum BIGINT NOT NULL,
            numsubentries INT NOT NULL CHECK (numsubentries >= 0),
            inflationdest VARCHAR(56),
            homedomain VARCHAR(32),
            thresholds TEXT NOT NULL,
            flags INT NOT NULL,
            lastmodified INT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Trustlines
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS trustlines (
            accountid VARCHAR(56) NOT NULL,
            assettype INT NOT NULL,
            issuer VARCHAR(56) NOT NULL,
            assetcode VARCHAR(12) NOT NULL,
            tlimit BIGINT NOT NULL CHECK (tlimit > 0),
            balance BIGINT NOT NULL CHECK (balance >= 0),
            flags INT NOT NULL,
            lastmodified INT NOT NULL,
            PRIMARY KEY (accountid, issuer, assetcode)
        )",
        [],
    )?;

    // ==========================================================================
    // Signers
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS signers (
            accountid VARCHAR(56) NOT NULL,
            publickey VARCHAR(56) NOT NULL,
            weight INT NOT NULL,
            PRIMARY KEY (accountid, publickey)
        )",
        [],
    )?;

    // ==========================================================================
    // Data entries (datavalue: base64)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accountdata (
            accountid VARCHAR(56) NOT NULL,
            dataname VARCHAR(64) NOT NULL,
            datavalue VARCHAR(112) NOT NULL,
            lastmodified INT NOT NULL,
            PRIMARY KEY (accountid, dataname)
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS signersaccount ON signers(accountid)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS signerspublickey ON signers(publickey)",
        [],
    )?;

    Ok(())
}

/// `?1, ?2, …, ?n` for an IN-list of `n` parameters.
pub fn in_placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run `SELECT <columns> FROM <table> WHERE <key_column> IN (keys) ORDER BY <order_by>`.
///
/// An empty key set never reaches the store (`IN ()` is not valid SQL).
pub fn fetch_rows<T, F>(
    conn: &Connection,
    table: &str,
    columns: &str,
    key_column: &str,
    order_by: &str,
    keys: &[String],
    map_row: F,
) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {} FROM {} WHERE {} IN ({}) ORDER BY {}",
        columns,
        table,
        key_column,
        in_placeholders(keys.len()),
        order_by
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(keys.iter()), map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_placeholders() {
        assert_eq!(in_placeholders(1), "?1");
        assert_eq!(in_placeholders(3), "?1, ?2, ?3");
        assert_eq!(in_placeholders(0), "");
    }

    #[test]
    fn test_setup_database_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        setup_database(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('accounts', 'trustlines', 'signers', 'accountdata')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn test_fetch_rows_filters_and_orders() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO signers VALUES ('B', 'K2', 1);
             INSERT INTO signers VALUES ('A', 'K9', 2);
             INSERT INTO signers VALUES ('A', 'K1', 3);
             INSERT INTO signers VALUES ('C', 'K1', 4);",
        )
        .unwrap();

        let keys = vec!["B".to_string(), "A".to_string()];
        let rows: Vec<(String, String)> = fetch_rows(
            &conn,
            "signers",
            "accountid, publickey",
            "accountid",
            "accountid, publickey",
            &keys,
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();

        assert_eq!(rows, vec![
            ("A".to_string(), "K1".to_string()),
            ("A".to_string(), "K9".to_string()),
            ("B".to_string(), "K2".to_string()),
        ]);
    }

    #[test]
    fn test_fetch_rows_empty_keys_skips_store() {
        // no tables at all: any statement would fail
        let conn = Connection::open_in_memory().unwrap();

        let rows: Vec<String> =
            fetch_rows(&conn, "accounts", "accountid", "accountid", "accountid", &[], |row| row.get(0))
                .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_fetch_rows_surfaces_store_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let keys = vec!["A".to_string()];

        let result: Result<Vec<String>> =
            fetch_rows(&conn, "missing_table", "accountid", "accountid", "accountid", &keys, |row| row.get(0));

        assert!(matches!(result, Err(LedgerError::Store(_))));
    }

    #[test]
    fn test_open_read_only_missing_file() {
        let result = open_read_only(Path::new("/nonexistent/ledger.db"));
        assert!(matches!(result, Err(LedgerError::DatabaseNotFound(_))));
    }
}
