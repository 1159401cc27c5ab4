use super::transaction::{Status, Transaction};
use crate::error::AuthorizationError;
use serde::Serialize;

/// Final result delivered downstream for one transaction.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct Decision {
    pub card_number: String,
    pub transaction_id: String,
    pub status: Status,
}

impl From<Transaction> for Decision {
    fn from(txn: Transaction) -> Self {
        Self {
            card_number: txn.card_number,
            transaction_id: txn.transaction_id,
            status: txn.status,
        }
    }
}

/// What the engine emits for every inbound transaction: a decision, or the
/// error that prevented one.
#[derive(Debug)]
pub enum Outcome {
    Decided(Decision),
    Failed {
        card_number: String,
        transaction_id: String,
        error: AuthorizationError,
    },
}

impl Outcome {
    pub fn failed(txn: Transaction, error: AuthorizationError) -> Self {
        Outcome::Failed {
            card_number: txn.card_number,
            transaction_id: txn.transaction_id,
            error,
        }
    }

    pub fn transaction_id(&self) -> &str {
        match self {
            Outcome::Decided(decision) => &decision.transaction_id,
            Outcome::Failed { transaction_id, .. } => transaction_id,
        }
    }

    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Outcome::Decided(decision) => Some(decision),
            Outcome::Failed { .. } => None,
        }
    }
}
