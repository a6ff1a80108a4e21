//! Table Management
//!
//! Keeps every live table behind its own lock and runs the periodic
//! idle sweep.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};
use tokio::time::interval;
use tracing::info;

use crate::game::rules::RuleConfig;
use crate::session::table::{TableConfig, TableId, TurnTable};

/// Manages all tables.
pub struct TableManager {
    tables: RwLock<BTreeMap<TableId, Arc<RwLock<TurnTable>>>>,
}

impl TableManager {
    /// Create new table manager.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a new table.
    pub async fn create_table(&self, rules: RuleConfig, config: TableConfig) -> TableId {
        let id = uuid::Uuid::new_v4().into_bytes();
        let table = TurnTable::new(id, rules, config);

        let mut tables = self.tables.write().await;
        tables.insert(id, Arc::new(RwLock::new(table)));

        info!("Created table {}", hex::encode(&id[..4]));
        id
    }

    /// Get a table by ID.
    pub async fn get_table(&self, id: &TableId) -> Option<Arc<RwLock<TurnTable>>> {
        let tables = self.tables.read().await;
        tables.get(id).cloned()
    }

    /// Remove a table.
    pub async fn remove_table(&self, id: &TableId) -> bool {
        let mut tables = self.tables.write().await;
        tables.remove(id).is_some()
    }

    /// Get table count.
    pub async fn table_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.len()
    }

    /// Reset every table idle at `now`. Returns the tables that were reset.
    pub async fn sweep_idle(&self, now: DateTime<Utc>) -> Vec<TableId> {
        let tables: Vec<_> = {
            let tables = self.tables.read().await;
            tables.iter().map(|(id, t)| (*id, t.clone())).collect()
        };

        let mut reset = Vec::new();
        for (id, table) in tables {
            let mut table = table.write().await;
            if table.reset_if_idle(now) {
                reset.push(id);
            }
        }
        reset
    }

    /// Sweep every `period` until `shutdown` fires.
    pub async fn run_idle_sweep(self: Arc<Self>, period: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = interval(period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let reset = self.sweep_idle(Utc::now()).await;
                    for id in reset {
                        info!("Reset idle table {}", hex::encode(&id[..4]));
                    }
                }
                _ = shutdown.recv() => {
                    info!("Idle sweep stopped");
                    break;
                }
            }
        }
    }
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roster::PlayerId;

    fn roster() -> Vec<PlayerId> {
        ["A", "B", "C"].into_iter().map(PlayerId::from).collect()
    }

    #[tokio::test]
    async fn test_create_get_remove() {
        let manager = TableManager::new();
        let id = manager.create_table(RuleConfig::default(), TableConfig::default()).await;

        assert_eq!(manager.table_count().await, 1);
        let table = manager.get_table(&id).await.unwrap();
        assert_eq!(table.read().await.id, id);

        assert!(manager.remove_table(&id).await);
        assert!(!manager.remove_table(&id).await);
        assert!(manager.get_table(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_tables_are_independent() {
        let manager = TableManager::new();
        let a = manager.create_table(RuleConfig::default(), TableConfig::default()).await;
        let b = manager.create_table(RuleConfig::default(), TableConfig::default()).await;
        assert_ne!(a, b);

        let table_a = manager.get_table(&a).await.unwrap();
        table_a.write().await.start(roster()).unwrap();

        let table_b = manager.get_table(&b).await.unwrap();
        assert!(!table_b.read().await.state().is_active);
    }

    #[tokio::test]
    async fn test_sweep_resets_only_idle_active_tables() {
        let manager = TableManager::new();
        let active = manager.create_table(RuleConfig::default(), TableConfig::default()).await;
        let _idle_inactive = manager.create_table(RuleConfig::default(), TableConfig::default()).await;

        let table = manager.get_table(&active).await.unwrap();
        table.write().await.start(roster()).unwrap();

        assert!(manager.sweep_idle(Utc::now()).await.is_empty());

        let later = Utc::now() + chrono::Duration::hours(3);
        assert_eq!(manager.sweep_idle(later).await, vec![active]);
        assert!(!table.read().await.state().is_active);
    }

    #[tokio::test]
    async fn test_idle_sweep_stops_on_shutdown() {
        let manager = Arc::new(TableManager::new());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(manager.clone().run_idle_sweep(Duration::from_millis(10), shutdown_rx));
        shutdown_tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep did not stop")
            .unwrap();
    }
}
