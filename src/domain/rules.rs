//! The fixed, ordered authorization rules.
//!
//! Each stage acts only while the transaction is still `New`, so the first
//! decline recorded is the one that is emitted. Stages that need ledger data
//! take it as an argument; fetching it is the caller's job.

use super::card::Card;
use super::estimator::CreditEstimate;
use super::transaction::{Status, Transaction};

pub const DEFAULT_BIG_TXN_THRESHOLD: u64 = 5000;

/// Stage 1: decline anything above `threshold`.
pub fn check_big_transaction(txn: &mut Transaction, threshold: u64) {
    if txn.amount > threshold {
        txn.classify(Status::DeclinedBigTxn);
    }
}

/// Stage 2: decline transactions against a locked card.
pub fn check_locked(txn: &mut Transaction, card: &Card) {
    if card.locked {
        txn.classify(Status::DeclinedLocked);
    }
}

/// Stage 3: speculative credit-limit check against the local estimate.
///
/// Reserves the amount in the estimate when it fits. The ledger is not touched.
pub fn check_credit_limit(txn: &mut Transaction, estimate: &mut CreditEstimate) {
    if txn.is_new() && !estimate.check(txn.amount) {
        txn.classify(Status::DeclinedOverLimit);
    }
}

/// Stage 4: approve whatever survived the previous stages.
pub fn final_approval(txn: &mut Transaction) {
    txn.classify(Status::Approved);
}
