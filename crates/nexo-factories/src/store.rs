//! In-memory record store that factories and seeders write into

use crate::traits::Attributes;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use nexo_validation::data::{loosely_equals, scalar_text};
use nexo_validation::PresenceVerifier;
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: Vec<Attributes>,
}

/// Tables of JSON rows with auto-increment ids.
///
/// Also answers the `unique` and `exists` validation rules, so requests can
/// be validated against whatever the seeders produced.
#[derive(Debug, Default)]
pub struct RecordStore {
    tables: DashMap<String, Table>,
}

fn matches(row: &Attributes, column: &str, expected: &Value) -> bool {
    let Some(stored) = row.get(column) else {
        return false;
    };
    match scalar_text(expected) {
        Some(text) => loosely_equals(stored, &text),
        None => stored == expected,
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a row, assigning `id` and filling missing timestamps
    pub fn insert(&self, table: &str, mut attributes: Attributes) -> Attributes {
        let mut entry = self.tables.entry(table.to_string()).or_default();
        entry.next_id += 1;

        let now = json!(Utc::now().to_rfc3339());
        attributes.insert("id".to_string(), json!(entry.next_id));
        for column in ["created_at", "updated_at"] {
            if attributes.get(column).map_or(true, Value::is_null) {
                attributes.insert(column.to_string(), now.clone());
            }
        }

        entry.rows.push(attributes.clone());
        attributes
    }

    pub fn ids(&self, table: &str) -> Vec<i64> {
        self.tables
            .get(table)
            .map(|t| t.rows.iter().filter_map(|row| row.get("id").and_then(Value::as_i64)).collect())
            .unwrap_or_default()
    }

    /// A random existing id, if the table has rows
    pub fn random_id(&self, table: &str) -> Option<i64> {
        let ids = self.ids(table);
        if ids.is_empty() {
            None
        } else {
            Some(crate::fake::random_element(&ids))
        }
    }

    pub fn rows(&self, table: &str) -> Vec<Attributes> {
        self.tables.get(table).map(|t| t.rows.clone()).unwrap_or_default()
    }

    pub fn find(&self, table: &str, id: i64) -> Option<Attributes> {
        let t = self.tables.get(table)?;
        t.rows
            .iter()
            .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
            .cloned()
    }

    pub fn count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |t| t.rows.len())
    }

    /// Rows matching every condition, minus the row named by `ignore`
    pub fn count_where(
        &self,
        table: &str,
        conditions: &[(&str, &Value)],
        ignore: Option<(&str, &Value)>,
    ) -> usize {
        let Some(t) = self.tables.get(table) else {
            return 0;
        };
        t.rows
            .iter()
            .filter(|row| conditions.iter().all(|(column, value)| matches(row, column, value)))
            .filter(|row| match ignore {
                Some((column, id)) => !matches(row, column, id),
                None => true,
            })
            .count()
    }

    /// Row counts per table, sorted by table name
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.tables
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().rows.len()))
            .collect()
    }

    /// Every table as a JSON object of row arrays
    pub fn dump(&self) -> Value {
        let tables: BTreeMap<String, Vec<Attributes>> = self
            .tables
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().rows.clone()))
            .collect();
        json!(tables)
    }

    /// Remove a table's rows and reset its ids
    pub fn truncate(&self, table: &str) {
        self.tables.remove(table);
    }

    pub fn clear(&self) {
        self.tables.clear();
    }
}

#[async_trait]
impl PresenceVerifier for RecordStore {
    async fn count(
        &self,
        table: &str,
        conditions: &[(&str, &Value)],
        ignore: Option<(&str, &Value)>,
    ) -> usize {
        self.count_where(table, conditions, ignore)
    }
}
