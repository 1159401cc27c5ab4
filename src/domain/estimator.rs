use super::card::Card;
use std::collections::HashMap;

/// Local mirror of one card's authorized spend.
///
/// Decisions made against it are speculative: the ledger is only updated
/// later, by settlement, and may have moved in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditEstimate {
    pub estimated_authorized_dollars: u64,
    pub credit_limit_dollars: u64,
}

impl CreditEstimate {
    pub fn seeded_from(card: &Card) -> Self {
        Self {
            estimated_authorized_dollars: card.authorized_dollars,
            credit_limit_dollars: card.credit_limit_dollars,
        }
    }

    /// Returns `true` and reserves `amount` if it fits under the limit.
    /// Leaves the estimate untouched otherwise.
    pub fn check(&mut self, amount: u64) -> bool {
        let projected = self.estimated_authorized_dollars.saturating_add(amount);
        if projected <= self.credit_limit_dollars {
            self.estimated_authorized_dollars = projected;
            true
        } else {
            false
        }
    }
}

/// Per-partition arena of credit estimates, keyed by card number.
///
/// Owned by a single partition worker and never shared, so it carries no
/// locking of its own. Every card number routed to the partition is seeded
/// from the ledger once and then tracked in memory.
#[derive(Debug, Default)]
pub struct CreditEstimator {
    estimates: HashMap<String, CreditEstimate>,
}

impl CreditEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self, card_number: &str) -> bool {
        self.estimates.contains_key(card_number)
    }

    /// Seeds the estimate for `card` unless one already exists.
    pub fn initialize(&mut self, card: &Card) -> &mut CreditEstimate {
        self.estimates
            .entry(card.card_number.clone())
            .or_insert_with(|| CreditEstimate::seeded_from(card))
    }

    pub fn get(&self, card_number: &str) -> Option<&CreditEstimate> {
        self.estimates.get(card_number)
    }

    /// Runs the credit check for an already initialized card.
    ///
    /// Returns `None` when the card has not been seeded on this partition.
    pub fn check(&mut self, card_number: &str, amount: u64) -> Option<bool> {
        self.estimates
            .get_mut(card_number)
            .map(|estimate| estimate.check(amount))
    }

    /// Forgets a card so its next transaction re-seeds from the ledger.
    pub fn evict(&mut self, card_number: &str) -> bool {
        self.estimates.remove(card_number).is_some()
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}
