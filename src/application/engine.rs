use super::partition::{EngineStats, PartitionWorker, WorkItem};
use crate::config::EngineConfig;
use crate::domain::decision::Outcome;
use crate::domain::ports::SharedCardLedger;
use crate::domain::transaction::Transaction;
use crate::error::{AuthorizationError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Maps a card number to the partition that owns it.
pub fn partition_for(card_number: &str, partitions: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    card_number.hash(&mut hasher);
    (hasher.finish() % partitions as u64) as usize
}

/// The main entry point for authorizing transactions.
///
/// `AuthorizationEngine` shards transactions across a fixed set of partition
/// workers by card number. All transactions for one card reach the same
/// worker, in submission order, which is what lets each worker keep its
/// credit estimates without locking. The card ledger is the only state the
/// workers share.
///
/// One [`Outcome`] per submitted transaction is delivered on the receiver
/// returned by [`AuthorizationEngine::start`]. Callers must keep draining it:
/// when it fills up, workers stop and `submit` eventually waits as well.
pub struct AuthorizationEngine {
    partitions: Vec<mpsc::Sender<WorkItem>>,
    workers: Vec<JoinHandle<EngineStats>>,
}

impl AuthorizationEngine {
    /// Spawns the partition workers on the current tokio runtime.
    pub fn start(
        ledger: SharedCardLedger,
        config: EngineConfig,
    ) -> Result<(Self, mpsc::Receiver<Outcome>)> {
        config.validate()?;

        let (outcome_tx, outcome_rx) = mpsc::channel(config.channel_capacity);
        let mut partitions = Vec::with_capacity(config.partitions);
        let mut workers = Vec::with_capacity(config.partitions);

        for id in 0..config.partitions {
            let (tx, rx) = mpsc::channel(config.channel_capacity);
            let worker = PartitionWorker::new(id, ledger.clone(), config.big_txn_threshold);
            workers.push(tokio::spawn(worker.run(rx, outcome_tx.clone())));
            partitions.push(tx);
        }

        info!(partitions = config.partitions, "authorization engine started");
        Ok((
            Self {
                partitions,
                workers,
            },
            outcome_rx,
        ))
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Queues a transaction on the partition owning its card number.
    pub async fn submit(&self, txn: Transaction) -> Result<()> {
        let partition = partition_for(&txn.card_number, self.partitions.len());
        self.partitions[partition]
            .send(WorkItem::Authorize(txn))
            .await
            .map_err(|_| AuthorizationError::EngineClosed)
    }

    /// Drops the owning partition's credit estimate for `card_number`.
    ///
    /// Transactions submitted afterwards re-seed from the ledger. Use after
    /// the ledger has been changed outside this engine.
    pub async fn invalidate(&self, card_number: &str) -> Result<()> {
        let partition = partition_for(card_number, self.partitions.len());
        self.partitions[partition]
            .send(WorkItem::Evict(card_number.to_string()))
            .await
            .map_err(|_| AuthorizationError::EngineClosed)
    }

    /// Closes every partition, waits for queued work to finish and returns
    /// the combined counters.
    pub async fn shutdown(self) -> Result<EngineStats> {
        drop(self.partitions);

        let mut stats = EngineStats::default();
        for worker in self.workers {
            stats += worker
                .await
                .map_err(|e| AuthorizationError::InternalError(Box::new(e)))?;
        }

        info!(
            processed = stats.processed,
            approved = stats.approved,
            declined = stats.declined,
            failed = stats.failed,
            settlement_overruns = stats.settlement_overruns,
            settlement_failures = stats.settlement_failures,
            "authorization engine stopped"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Card;
    use crate::domain::ports::CardLedger;
    use crate::domain::transaction::Status;
    use crate::infrastructure::in_memory::InMemoryCardLedger;
    use std::sync::Arc;

    async fn drain(mut rx: mpsc::Receiver<Outcome>) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    #[test]
    fn test_partition_for_is_stable() {
        for partitions in 1..8 {
            let first = partition_for("6771-8952-0704-5425", partitions);
            assert!(first < partitions);
            assert_eq!(first, partition_for("6771-8952-0704-5425", partitions));
        }
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let config = EngineConfig {
            partitions: 0,
            ..Default::default()
        };
        let result = AuthorizationEngine::start(Arc::new(InMemoryCardLedger::new()), config);
        assert!(matches!(result, Err(AuthorizationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_engine_emits_one_outcome_per_transaction() {
        let ledger = InMemoryCardLedger::with_cards([
            Card::new("4111", 100).unwrap(),
            Card::new("4222", 100).unwrap(),
        ]);
        let (engine, rx) =
            AuthorizationEngine::start(Arc::new(ledger.clone()), EngineConfig::default()).unwrap();
        let collector = tokio::spawn(drain(rx));

        engine.submit(Transaction::new("4111", "t1", 40, "m")).await.unwrap();
        engine.submit(Transaction::new("4222", "t2", 9000, "m")).await.unwrap();
        engine.submit(Transaction::new("4333", "t3", 10, "m")).await.unwrap();

        let stats = engine.shutdown().await.unwrap();
        let outcomes = collector.await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.declined, 1);
        assert_eq!(stats.failed, 1);

        let big = outcomes
            .iter()
            .find(|o| o.transaction_id() == "t2")
            .and_then(Outcome::decision)
            .unwrap();
        assert_eq!(big.status, Status::DeclinedBigTxn);

        let card = ledger.get("4111").await.unwrap().unwrap();
        assert_eq!(card.authorized_dollars, 40);
    }

    #[tokio::test]
    async fn test_invalidate_reseeds_from_ledger() {
        let ledger = InMemoryCardLedger::with_cards([Card::new("4111", 100).unwrap()]);
        let config = EngineConfig {
            partitions: 2,
            ..Default::default()
        };
        let (engine, mut rx) = AuthorizationEngine::start(Arc::new(ledger.clone()), config).unwrap();

        engine.submit(Transaction::new("4111", "t1", 50, "m")).await.unwrap();
        rx.recv().await.unwrap();

        // Administrative correction outside the engine.
        let mut card = ledger.get("4111").await.unwrap().unwrap();
        card.authorized_dollars = 100;
        ledger.put(card).await.unwrap();
        engine.invalidate("4111").await.unwrap();

        engine.submit(Transaction::new("4111", "t2", 1, "m")).await.unwrap();
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.decision().unwrap().status, Status::DeclinedOverLimit);

        engine.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_without_traffic() {
        let (engine, rx) =
            AuthorizationEngine::start(Arc::new(InMemoryCardLedger::new()), EngineConfig::default())
                .unwrap();
        assert_eq!(engine.partition_count(), 4);
        drop(rx);
        let stats = engine.shutdown().await.unwrap();
        assert_eq!(stats, EngineStats::default());
    }
}
