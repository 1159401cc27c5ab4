use super::settlement::SettlementApplier;
use crate::domain::decision::{Decision, Outcome};
use crate::domain::estimator::CreditEstimator;
use crate::domain::ports::SharedCardLedger;
use crate::domain::rules;
use crate::domain::transaction::{Status, Transaction};
use crate::error::{AuthorizationError, Result};
use std::ops::AddAssign;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Work routed to the partition that owns a card number.
#[derive(Debug)]
pub enum WorkItem {
    Authorize(Transaction),
    /// Drop the local credit estimate so the next transaction re-seeds it.
    Evict(String),
}

/// Counters reported by each partition when it stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub processed: u64,
    pub approved: u64,
    pub declined: u64,
    /// Transactions that could not be classified.
    pub failed: u64,
    /// Settlements that left the card above its credit limit.
    pub settlement_overruns: u64,
    /// Settlements the ledger could not apply.
    pub settlement_failures: u64,
}

impl AddAssign for EngineStats {
    fn add_assign(&mut self, rhs: Self) {
        self.processed += rhs.processed;
        self.approved += rhs.approved;
        self.declined += rhs.declined;
        self.failed += rhs.failed;
        self.settlement_overruns += rhs.settlement_overruns;
        self.settlement_failures += rhs.settlement_failures;
    }
}

/// Runs the rule chain for the card numbers of one partition.
///
/// The worker exclusively owns its [`CreditEstimator`]. Transactions for a
/// card are handled strictly in arrival order, one at a time.
pub struct PartitionWorker {
    id: usize,
    ledger: SharedCardLedger,
    estimator: CreditEstimator,
    settlement: SettlementApplier,
    big_txn_threshold: u64,
    stats: EngineStats,
}

impl PartitionWorker {
    pub fn new(id: usize, ledger: SharedCardLedger, big_txn_threshold: u64) -> Self {
        Self {
            id,
            settlement: SettlementApplier::new(ledger.clone()),
            ledger,
            estimator: CreditEstimator::new(),
            big_txn_threshold,
            stats: EngineStats::default(),
        }
    }

    pub fn estimator(&self) -> &CreditEstimator {
        &self.estimator
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Consumes work items until the inbox closes, then returns the counters.
    pub async fn run(
        mut self,
        mut inbox: mpsc::Receiver<WorkItem>,
        outcomes: mpsc::Sender<Outcome>,
    ) -> EngineStats {
        while let Some(item) = inbox.recv().await {
            match item {
                WorkItem::Authorize(txn) => self.authorize(txn, &outcomes).await,
                WorkItem::Evict(card_number) => {
                    if self.estimator.evict(&card_number) {
                        debug!(partition = self.id, card = %card_number, "credit estimate evicted");
                    }
                }
            }
        }
        self.stats
    }

    /// Classifies `txn`, emits its outcome and, if approved, settles it.
    ///
    /// The outcome is emitted before settlement starts and is never revised:
    /// settlement problems are logged and counted only.
    pub async fn authorize(&mut self, mut txn: Transaction, outcomes: &mpsc::Sender<Outcome>) {
        self.stats.processed += 1;
        txn.status = Status::New;

        if let Err(e) = self.classify(&mut txn).await {
            self.stats.failed += 1;
            error!(
                partition = self.id,
                card = %txn.card_number,
                txn = %txn.transaction_id,
                error = %e,
                "transaction could not be classified"
            );
            self.emit(outcomes, Outcome::failed(txn, e)).await;
            return;
        }

        debug!(
            partition = self.id,
            card = %txn.card_number,
            txn = %txn.transaction_id,
            amount = txn.amount,
            status = ?txn.status,
            "classified"
        );

        let settlement = if txn.status == Status::Approved {
            self.stats.approved += 1;
            Some((txn.card_number.clone(), txn.amount))
        } else {
            self.stats.declined += 1;
            None
        };

        self.emit(outcomes, Outcome::Decided(Decision::from(txn))).await;

        if let Some((card_number, amount)) = settlement {
            self.settle(&card_number, amount).await;
        }
    }

    /// Runs the four rule stages in order.
    pub async fn classify(&mut self, txn: &mut Transaction) -> Result<()> {
        rules::check_big_transaction(txn, self.big_txn_threshold);

        if txn.is_new() {
            let card = self
                .ledger
                .get(&txn.card_number)
                .await?
                .ok_or_else(|| AuthorizationError::UnknownCard(txn.card_number.clone()))?;

            rules::check_locked(txn, &card);

            if txn.is_new() {
                if !self.estimator.is_initialized(&card.card_number) {
                    debug!(
                        partition = self.id,
                        card = %card.card_number,
                        authorized = card.authorized_dollars,
                        "seeding credit estimate"
                    );
                }
                let estimate = self.estimator.initialize(&card);
                rules::check_credit_limit(txn, estimate);
            }
        }

        rules::final_approval(txn);
        Ok(())
    }

    async fn emit(&self, outcomes: &mpsc::Sender<Outcome>, outcome: Outcome) {
        if outcomes.send(outcome).await.is_err() {
            warn!(partition = self.id, "outcome receiver dropped");
        }
    }

    async fn settle(&mut self, card_number: &str, amount: u64) {
        match self.settlement.settle(card_number, amount).await {
            Ok(true) => {}
            Ok(false) => self.stats.settlement_overruns += 1,
            Err(e) => {
                self.stats.settlement_failures += 1;
                error!(
                    partition = self.id,
                    card = %card_number,
                    amount,
                    error = %e,
                    "settlement failed"
                );
            }
        }
    }
}
