//! MySQL sink.
//!
//! Tables are created on first write, rows are upserted on their primary
//! keys, and a retention pass keeps only the newest N rows per symbol.
//! Replayed and overlapping job runs converge on the same rows instead of
//! conflicting.

use std::time::Duration;

use sqlx::Row;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use mercato_core::{CandleRow, IndexCode, MercatoError, NewsItem};

use crate::credentials::MySqlCredentials;

fn storage_err(e: sqlx::Error) -> MercatoError {
    MercatoError::storage(e.to_string())
}

fn ensure_ident(name: &str) -> Result<(), MercatoError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(MercatoError::InvalidArg(format!(
            "unsafe sql identifier: {name}"
        )))
    }
}

pub(crate) fn candle_table_ddl(table: &str) -> Result<String, MercatoError> {
    ensure_ident(table)?;
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS `{table}` (\
         `Symbol` VARCHAR(16) NOT NULL, \
         `Ts` DATETIME NOT NULL, \
         `Open` DECIMAL(18,6) NOT NULL, \
         `High` DECIMAL(18,6) NOT NULL, \
         `Low` DECIMAL(18,6) NOT NULL, \
         `Close` DECIMAL(18,6) NOT NULL, \
         `Volume` BIGINT UNSIGNED NULL, \
         PRIMARY KEY (`Symbol`, `Ts`)\
         ) ENGINE=InnoDB"
    ))
}

pub(crate) fn candle_upsert_sql(table: &str) -> Result<String, MercatoError> {
    ensure_ident(table)?;
    Ok(format!(
        "INSERT INTO `{table}` (`Symbol`, `Ts`, `Open`, `High`, `Low`, `Close`, `Volume`) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         ON DUPLICATE KEY UPDATE \
         `Open`=VALUES(`Open`), `High`=VALUES(`High`), `Low`=VALUES(`Low`), \
         `Close`=VALUES(`Close`), `Volume`=VALUES(`Volume`)"
    ))
}

pub(crate) fn news_table_ddl(table: &str) -> Result<String, MercatoError> {
    ensure_ident(table)?;
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS `{table}` (\
         `Symbol` VARCHAR(16) NOT NULL, \
         `Title` VARCHAR(255) NOT NULL, \
         `Summary` TEXT NULL, \
         `Url` VARCHAR(255) NOT NULL, \
         `Published` DATETIME NULL, \
         PRIMARY KEY (`Title`, `Url`)\
         ) ENGINE=InnoDB"
    ))
}

pub(crate) fn news_upsert_sql(table: &str) -> Result<String, MercatoError> {
    ensure_ident(table)?;
    Ok(format!(
        "INSERT INTO `{table}` (`Symbol`, `Title`, `Summary`, `Url`, `Published`) \
         VALUES (?, ?, ?, ?, ?) \
         ON DUPLICATE KEY UPDATE \
         `Symbol`=VALUES(`Symbol`), `Summary`=VALUES(`Summary`), `Published`=VALUES(`Published`)"
    ))
}

/// Delete everything beyond the newest `keep` rows per symbol, ordered by
/// `sort_col`. `key_cols` must identify a row (the table's primary key).
pub(crate) fn retention_delete_sql(
    table: &str,
    key_cols: &[&str],
    sort_col: &str,
    keep: u32,
) -> Result<String, MercatoError> {
    ensure_ident(table)?;
    ensure_ident(sort_col)?;
    for k in key_cols {
        ensure_ident(k)?;
    }
    let keys = key_cols
        .iter()
        .map(|k| format!("`{k}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let join_on = key_cols
        .iter()
        .map(|k| format!("t.`{k}` = sub.`{k}`"))
        .collect::<Vec<_>>()
        .join(" AND ");
    Ok(format!(
        "DELETE t FROM `{table}` AS t \
         JOIN (\
         SELECT {keys} FROM (\
         SELECT {keys}, ROW_NUMBER() OVER (PARTITION BY `Symbol` ORDER BY `{sort_col}` DESC) AS row_num \
         FROM `{table}`\
         ) AS ranked WHERE ranked.row_num > {keep}\
         ) AS sub ON {join_on}"
    ))
}

/// Pooled MySQL sink.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Connect a small pool using credentials from a JSON file.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] when the server is unreachable or
    /// rejects the credentials.
    pub async fn connect(creds: &MySqlCredentials) -> Result<Self, MercatoError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&creds.connect_url())
            .await
            .map_err(storage_err)?;
        Ok(Self { pool })
    }

    /// Upsert history bars into `table`, creating it if missing.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on any statement failure; the
    /// transaction rolls back as a unit.
    pub async fn upsert_candles(
        &self,
        table: &str,
        rows: &[CandleRow],
    ) -> Result<u64, MercatoError> {
        if rows.is_empty() {
            return Ok(0);
        }
        sqlx::query(&candle_table_ddl(table)?)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        let sql = candle_upsert_sql(table)?;
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        for row in rows {
            sqlx::query(&sql)
                .bind(row.code.as_str())
                .bind(row.ts.naive_utc())
                .bind(row.open)
                .bind(row.high)
                .bind(row.low)
                .bind(row.close)
                .bind(row.volume)
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }
        tx.commit().await.map_err(storage_err)?;
        tracing::debug!(table, rows = rows.len(), "upserted candles");
        Ok(rows.len() as u64)
    }

    /// Upsert news rows into `table`, creating it if missing.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on any statement failure.
    pub async fn upsert_news(&self, table: &str, rows: &[NewsItem]) -> Result<u64, MercatoError> {
        if rows.is_empty() {
            return Ok(0);
        }
        sqlx::query(&news_table_ddl(table)?)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        let sql = news_upsert_sql(table)?;
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        for row in rows {
            sqlx::query(&sql)
                .bind(row.code.as_str())
                .bind(&row.title)
                .bind(&row.summary)
                .bind(&row.url)
                .bind(row.published_at.map(|d| d.naive_utc()))
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }
        tx.commit().await.map_err(storage_err)?;
        Ok(rows.len() as u64)
    }

    /// Keep only the newest `keep` rows per symbol in `table`.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on statement failure.
    pub async fn prune_to_newest(
        &self,
        table: &str,
        key_cols: &[&str],
        sort_col: &str,
        keep: u32,
    ) -> Result<u64, MercatoError> {
        let sql = retention_delete_sql(table, key_cols, sort_col, keep)?;
        let res = sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        let deleted = res.rows_affected();
        if deleted > 0 {
            tracing::debug!(table, deleted, "pruned rows beyond retention");
        }
        Ok(deleted)
    }

    /// Read all news rows back from `table`.
    ///
    /// Rows whose symbol no longer parses as a canonical code are skipped.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on query failure.
    pub async fn fetch_news(&self, table: &str) -> Result<Vec<NewsItem>, MercatoError> {
        ensure_ident(table)?;
        let sql =
            format!("SELECT `Symbol`, `Title`, `Summary`, `Url`, `Published` FROM `{table}`");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            let symbol: String = r.try_get("Symbol").map_err(storage_err)?;
            let Ok(code) = symbol.parse::<IndexCode>() else {
                tracing::warn!(%symbol, table, "skipping news row with unknown symbol");
                continue;
            };
            let published: Option<chrono::NaiveDateTime> =
                r.try_get("Published").map_err(storage_err)?;
            out.push(NewsItem {
                code,
                title: r.try_get("Title").map_err(storage_err)?,
                summary: r.try_get("Summary").map_err(storage_err)?,
                url: r.try_get("Url").map_err(storage_err)?,
                published_at: published.map(|d| d.and_utc()),
            });
        }
        Ok(out)
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candle_statements_use_the_composite_key() {
        let ddl = candle_table_ddl("index_history_minute").unwrap();
        assert!(ddl.contains("PRIMARY KEY (`Symbol`, `Ts`)"));
        assert!(ddl.contains("ENGINE=InnoDB"));

        let upsert = candle_upsert_sql("index_history_minute").unwrap();
        assert!(upsert.contains("ON DUPLICATE KEY UPDATE"));
        assert!(upsert.contains("`Close`=VALUES(`Close`)"));
    }

    #[test]
    fn news_upsert_does_not_rewrite_its_own_keys() {
        let upsert = news_upsert_sql("investing_news").unwrap();
        assert!(!upsert.contains("`Title`=VALUES"));
        assert!(!upsert.contains("`Url`=VALUES"));
        assert!(upsert.contains("`Summary`=VALUES(`Summary`)"));
    }

    #[test]
    fn retention_sql_ranks_per_symbol_and_joins_on_the_keys() {
        let sql =
            retention_delete_sql("index_history_daily", &["Symbol", "Ts"], "Ts", 3650).unwrap();
        assert!(sql.contains("PARTITION BY `Symbol` ORDER BY `Ts` DESC"));
        assert!(sql.contains("row_num > 3650"));
        assert!(sql.contains("t.`Symbol` = sub.`Symbol` AND t.`Ts` = sub.`Ts`"));
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(candle_table_ddl("ok_table_1").is_ok());
        assert!(candle_table_ddl("bad`table").is_err());
        assert!(retention_delete_sql("t", &["Symbol"], "Ts; DROP", 1).is_err());
    }
}
