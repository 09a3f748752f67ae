// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed append-only memory store.
//!
//! All access goes through tokio-rusqlite's single background thread, which
//! serializes appends. Entries are ordered by an autoincrement sequence, and
//! `created_at` is clamped inside the write so timestamps never decrease.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::OptionalExtension;
use rusqlite::types::Type;
use switchyard_core::SwitchyardError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations::run_migrations;
use crate::types::{EntryType, MemoryEntry, MemoryMetadata};

const SELECT_COLUMNS: &str = "SELECT id, created_at, entry_type, input, output, metadata FROM memory_entries";

/// Convert tokio_rusqlite errors into `SwitchyardError::Storage`.
fn storage_err(e: tokio_rusqlite::Error) -> SwitchyardError {
    SwitchyardError::Storage {
        source: Box::new(e),
    }
}

/// Opening a connection reports a plain rusqlite error.
fn open_err(e: rusqlite::Error) -> SwitchyardError {
    SwitchyardError::Storage {
        source: Box::new(e),
    }
}

pub struct MemoryStore {
    conn: Connection,
}

impl MemoryStore {
    /// Opens (creating if needed) the database at `path` and applies migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SwitchyardError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SwitchyardError::Storage {
                    source: Box::new(e),
                })?;
        }

        let conn = Connection::open(path).await.map_err(open_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;

        Self::migrate(conn).await
    }

    /// A private in-memory database, used by tests and `--ephemeral` runs.
    pub async fn open_in_memory() -> Result<Self, SwitchyardError> {
        let conn = Connection::open_in_memory().await.map_err(open_err)?;
        Self::migrate(conn).await
    }

    async fn migrate(conn: Connection) -> Result<Self, SwitchyardError> {
        conn.call(|conn| -> Result<_, rusqlite::Error> { Ok(run_migrations(conn)) })
            .await
            .map_err(storage_err)?
            .map_err(|e| SwitchyardError::Storage {
                source: Box::new(e),
            })?;
        Ok(Self { conn })
    }

    /// Appends a new entry and returns it with its assigned id and timestamp.
    pub async fn append(
        &self,
        entry_type: EntryType,
        input: &str,
        output: &str,
        metadata: MemoryMetadata,
    ) -> Result<MemoryEntry, SwitchyardError> {
        let id = uuid::Uuid::new_v4().to_string();
        let metadata_json = serde_json::to_string(&metadata).map_err(|e| SwitchyardError::Storage {
            source: Box::new(e),
        })?;
        let row_id = id.clone();
        let (row_input, row_output) = (input.to_string(), output.to_string());

        let created_at = self
            .conn
            .call(move |conn| -> Result<DateTime<Utc>, rusqlite::Error> {
                let last: Option<String> = conn
                    .query_row(
                        "SELECT created_at FROM memory_entries ORDER BY seq DESC LIMIT 1",
                        [],
                        |row| row.get(0),
                    )
                    .optional()?;
                let now = Utc::now();
                let created_at = match last.as_deref().map(parse_timestamp).transpose()? {
                    Some(last) if last > now => last,
                    _ => now,
                };

                conn.execute(
                    "INSERT INTO memory_entries (id, created_at, entry_type, input, output, metadata)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    rusqlite::params![
                        row_id,
                        format_timestamp(&created_at),
                        entry_type.to_string(),
                        row_input,
                        row_output,
                        metadata_json,
                    ],
                )?;
                Ok(created_at)
            })
            .await
            .map_err(storage_err)?;

        debug!(id = id.as_str(), %entry_type, "memory entry appended");

        Ok(MemoryEntry {
            id,
            created_at,
            entry_type,
            input: input.to_string(),
            output: output.to_string(),
            metadata,
        })
    }

    /// The `limit` most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<MemoryEntry>, SwitchyardError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<Vec<MemoryEntry>, rusqlite::Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY seq DESC LIMIT ?1"))?;
                let entries = stmt
                    .query_map(rusqlite::params![limit], row_to_entry)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await
            .map_err(storage_err)
    }

    /// Entries whose input or output contains `query`, ignoring case, newest first.
    ///
    /// A blank query behaves like [`MemoryStore::recent`].
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<MemoryEntry>, SwitchyardError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.recent(limit).await;
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        self.conn
            .call(move |conn| -> Result<Vec<MemoryEntry>, rusqlite::Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY seq DESC"))?;
                let mut rows = stmt.query([])?;
                let mut found = Vec::new();
                while let Some(row) = rows.next()? {
                    let entry = row_to_entry(row)?;
                    if entry.matches(&needle) {
                        found.push(entry);
                        if found.len() >= limit {
                            break;
                        }
                    }
                }
                Ok(found)
            })
            .await
            .map_err(storage_err)
    }

    /// Entry counts per type, computed on demand.
    pub async fn counts_by_type(&self) -> Result<BTreeMap<EntryType, u64>, SwitchyardError> {
        self.conn
            .call(|conn| -> Result<BTreeMap<EntryType, u64>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT entry_type, COUNT(*) FROM memory_entries GROUP BY entry_type",
                )?;
                let counts = stmt
                    .query_map([], |row| {
                        let raw: String = row.get(0)?;
                        let entry_type = raw.parse::<EntryType>().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                        })?;
                        let count: i64 = row.get(1)?;
                        Ok((entry_type, count.max(0) as u64))
                    })?
                    .collect::<Result<BTreeMap<_, _>, _>>()?;
                Ok(counts)
            })
            .await
            .map_err(storage_err)
    }

    pub async fn len(&self) -> Result<u64, SwitchyardError> {
        self.conn
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM memory_entries", [], |row| row.get(0))
            })
            .await
            .map(|n| n.max(0) as u64)
            .map_err(storage_err)
    }

    pub async fn is_empty(&self) -> Result<bool, SwitchyardError> {
        Ok(self.len().await? == 0)
    }

    /// Deletes every entry. Returns the number removed.
    pub async fn clear(&self) -> Result<u64, SwitchyardError> {
        let removed = self
            .conn
            .call(|conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM memory_entries", [])
            })
            .await
            .map_err(storage_err)?;
        debug!(removed, "memory cleared");
        Ok(removed as u64)
    }

    pub async fn close(self) -> Result<(), SwitchyardError> {
        self.conn.close().await.map_err(storage_err)
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<MemoryEntry, rusqlite::Error> {
    let created_at: String = row.get(1)?;
    let entry_type: String = row.get(2)?;
    let metadata: String = row.get(5)?;
    Ok(MemoryEntry {
        id: row.get(0)?,
        created_at: parse_timestamp(&created_at)?,
        entry_type: entry_type
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        input: row.get(3)?,
        output: row.get(4)?,
        metadata: serde_json::from_str(&metadata)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(tags: &[&str]) -> MemoryMetadata {
        MemoryMetadata {
            success: true,
            execution_time_ms: 12,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            command_key: None,
            agent: Some("gpt-4o-mini".to_string()),
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::open_in_memory().await.unwrap();
        store
            .append(EntryType::Task, "What is our Pricing model?", "Tiered pricing.", meta(&["conversational"]))
            .await
            .unwrap();
        store
            .append(EntryType::SystemCommand, "open calculator", "Launched calculator", meta(&["automation"]))
            .await
            .unwrap();
        store
            .append(EntryType::Task, "draft email", "We discussed PRICING changes", meta(&[]))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn append_assigns_unique_ids_and_non_decreasing_timestamps() {
        let store = MemoryStore::open_in_memory().await.unwrap();
        let mut entries = Vec::new();
        for i in 0..20 {
            entries.push(
                store
                    .append(EntryType::Conversation, &format!("in {i}"), "out", MemoryMetadata::default())
                    .await
                    .unwrap(),
            );
        }
        let mut ids: Vec<_> = entries.iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert!(entries.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = seeded().await;
        let recent = store.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].input, "draft email");
        assert_eq!(recent[1].input, "open calculator");
        assert_eq!(recent[1].entry_type, EntryType::SystemCommand);
        assert_eq!(recent[1].metadata.tags, vec!["automation"]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_input_and_output() {
        let store = seeded().await;
        let hits = store.search("pricing", 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].input, "draft email");
        assert_eq!(hits[1].input, "What is our Pricing model?");

        assert_eq!(store.search("PRICING", 1).await.unwrap().len(), 1);
        assert!(store.search("nothing like this", 10).await.unwrap().is_empty());
        assert_eq!(store.search("   ", 10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn search_results_survive_later_appends() {
        let store = seeded().await;
        let before = store.search("pricing", 10).await.unwrap();
        store
            .append(EntryType::Learning, "pricing again", "noted", MemoryMetadata::default())
            .await
            .unwrap();
        let after = store.search("pricing", 10).await.unwrap();
        for entry in &before {
            assert!(after.contains(entry), "entry {} lost or mutated", entry.id);
        }
    }

    #[tokio::test]
    async fn counts_by_type_and_clear() {
        let store = seeded().await;
        let counts = store.counts_by_type().await.unwrap();
        assert_eq!(counts.get(&EntryType::Task), Some(&2));
        assert_eq!(counts.get(&EntryType::SystemCommand), Some(&1));
        assert_eq!(counts.get(&EntryType::Learning), None);

        assert_eq!(store.clear().await.unwrap(), 3);
        assert!(store.is_empty().await.unwrap());
        assert!(store.counts_by_type().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("memory.db");

        let store = MemoryStore::open(&path).await.unwrap();
        let entry = store
            .append(EntryType::Task, "persist me", "ok", meta(&["t"]))
            .await
            .unwrap();
        store.close().await.unwrap();

        let reopened = MemoryStore::open(&path).await.unwrap();
        let recent = reopened.recent(5).await.unwrap();
        assert_eq!(recent, vec![entry]);
        reopened.close().await.unwrap();
    }

    #[tokio::test]
    async fn unopenable_path_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();

        // a directory cannot be opened as a database file
        let err = MemoryStore::open(dir.path()).await.err().unwrap();
        assert!(matches!(err, SwitchyardError::Storage { .. }));
    }
}
