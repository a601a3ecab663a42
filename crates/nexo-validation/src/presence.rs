//! Store lookups behind the `unique` and `exists` rules

use async_trait::async_trait;
use serde_json::Value;

/// Counts rows matching column/value conditions.
///
/// `ignore` excludes one row by `(id_column, id)`, which is how update
/// requests let a record keep its own unique value.
#[async_trait]
pub trait PresenceVerifier: Send + Sync {
    async fn count(
        &self,
        table: &str,
        conditions: &[(&str, &Value)],
        ignore: Option<(&str, &Value)>,
    ) -> usize;

    /// Whether at least one row matches
    async fn exists(&self, table: &str, conditions: &[(&str, &Value)]) -> bool {
        self.count(table, conditions, None).await > 0
    }
}
