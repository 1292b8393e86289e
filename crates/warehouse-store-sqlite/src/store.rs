//! [`SqliteWarehouse`] — the SQLite implementation of [`WarehouseStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use rusqlite::types::Value as SqlValue;
use warehouse_core::{
  model::{InterviewEvent, StoredTopic},
  store::WarehouseStore,
  table::{KeyFilter, LoadReport, Row, SurrogateKey, Table, UpsertOutcome},
};

use crate::{
  Error, Result,
  encode::{RawTopic, encode_columns, encode_date, placeholders},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A warehouse backed by a single SQLite file.
///
/// Cloning is cheap, but clones share the one underlying connection and so
/// also share its open transaction.
#[derive(Clone)]
pub struct SqliteWarehouse {
  conn: tokio_rusqlite::Connection,
}

impl SqliteWarehouse {
  /// Open (or create) a warehouse at `path` and provision the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory warehouse — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn exec_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the connection, surfacing any error from the final flush.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

fn natural_key_column(table: Table) -> Result<&'static str> {
  table
    .natural_key_column()
    .ok_or(Error::Core(warehouse_core::Error::NotADimension(table)))
}

// ─── WarehouseStore impl ─────────────────────────────────────────────────────

impl WarehouseStore for SqliteWarehouse {
  type Error = Error;

  // ── Unit of work ──────────────────────────────────────────────────────────

  async fn begin(&self) -> Result<()> { self.exec_batch("BEGIN IMMEDIATE").await }

  async fn commit(&self) -> Result<()> { self.exec_batch("COMMIT").await }

  async fn rollback(&self) -> Result<()> { self.exec_batch("ROLLBACK").await }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert(&self, table: Table, row: Row) -> Result<UpsertOutcome> {
    let natural_key = natural_key_column(table)?;
    let (columns, params) = encode_columns(row.into_columns());

    // Conflict target is the natural key only: any other constraint failure
    // still raises.
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({natural_key}) DO NOTHING",
      table.name(),
      columns.join(", "),
      placeholders(columns.len()),
    );

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?))
      .await?;

    Ok(if changed == 0 {
      UpsertOutcome::Skipped
    } else {
      UpsertOutcome::Inserted
    })
  }

  async fn insert_events(&self, events: Vec<InterviewEvent>) -> Result<LoadReport> {
    let rows: Vec<_> = events
      .iter()
      .map(|e| encode_columns(e.to_row().into_columns()))
      .collect();
    let Some((columns, _)) = rows.first() else {
      return Ok(LoadReport::default());
    };

    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({})
       ON CONFLICT (interview_round_id, round_position) DO NOTHING",
      Table::InterviewEvent.name(),
      columns.join(", "),
      placeholders(columns.len()),
    );

    let report = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let mut report = LoadReport::default();
        for (_, params) in rows {
          let outcome = if stmt.execute(rusqlite::params_from_iter(params))? == 0 {
            UpsertOutcome::Skipped
          } else {
            UpsertOutcome::Inserted
          };
          report.record(outcome);
        }
        Ok(report)
      })
      .await?;

    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn surrogate_key(
    &self,
    table: Table,
    natural_key: String,
  ) -> Result<Option<SurrogateKey>> {
    let sql = format!(
      "SELECT {} FROM {} WHERE {} = ?1",
      table.surrogate_key_column(),
      table.name(),
      natural_key_column(table)?,
    );

    let key: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![natural_key], |row| row.get(0))
            .optional()?,
        )
      })
      .await?;

    Ok(key.map(SurrogateKey))
  }

  async fn surrogate_keys(
    &self,
    table: Table,
    filter: KeyFilter,
  ) -> Result<Vec<(String, SurrogateKey)>> {
    filter.check(table)?;
    let natural_key = natural_key_column(table)?;

    // Build WHERE clause dynamically.
    let mut conds: Vec<&'static str> = vec![];
    let mut params: Vec<SqlValue> = vec![];
    if let Some(level) = filter.topic_level {
      conds.push("topic_level = ?");
      params.push(SqlValue::Integer(level.into()));
    }
    if let Some(from) = filter.date_from {
      conds.push("full_date >= ?");
      params.push(SqlValue::Text(encode_date(from)));
    }
    if let Some(to) = filter.date_to {
      conds.push("full_date <= ?");
      params.push(SqlValue::Text(encode_date(to)));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let limit_clause = match filter.limit {
      Some(limit) => {
        params.push(SqlValue::Integer(limit.try_into().unwrap_or(i64::MAX)));
        "LIMIT ?"
      }
      None => "",
    };

    let surrogate = table.surrogate_key_column();
    let sql = format!(
      "SELECT {natural_key}, {surrogate} FROM {}
       {where_clause}
       ORDER BY {surrogate}
       {limit_clause}",
      table.name(),
    );

    let rows: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(natural, key)| (natural, SurrogateKey(key)))
        .collect(),
    )
  }

  async fn count_rows(&self, table: Table) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    let count: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;
    u64::try_from(count).map_err(|_| Error::Decode(format!("negative count {count}")))
  }

  async fn list_topics(&self) -> Result<Vec<StoredTopic>> {
    let raws: Vec<RawTopic> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT topic_key, topic_id, topic_name, parent_topic_key, topic_level
           FROM dim_topics
           ORDER BY topic_key",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTopic {
              topic_key:        row.get(0)?,
              topic_id:         row.get(1)?,
              topic_name:       row.get(2)?,
              parent_topic_key: row.get(3)?,
              topic_level:      row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTopic::into_topic).collect()
  }
}
