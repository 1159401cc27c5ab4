use crate::error::{AuthorizationError, Result};
use serde::{Deserialize, Serialize};

/// Authoritative ledger record for one card.
///
/// `authorized_dollars` only ever grows, and only through settlement.
/// `credit_limit_dollars` and `locked` are owned by provisioning.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Card {
    pub card_number: String,
    pub credit_limit_dollars: u64,
    #[serde(default)]
    pub authorized_dollars: u64,
    #[serde(default)]
    pub locked: bool,
}

impl Card {
    /// Provisions a new unlocked card with nothing authorized yet.
    pub fn new(card_number: impl Into<String>, credit_limit_dollars: u64) -> Result<Self> {
        let card = Self {
            card_number: card_number.into(),
            credit_limit_dollars,
            authorized_dollars: 0,
            locked: false,
        };
        card.validate()?;
        Ok(card)
    }

    pub fn validate(&self) -> Result<()> {
        if self.card_number.is_empty() {
            return Err(AuthorizationError::ValidationError(
                "card number must not be empty".to_string(),
            ));
        }
        if self.credit_limit_dollars == 0 {
            return Err(AuthorizationError::ValidationError(format!(
                "credit limit of card {} must be positive",
                self.card_number
            )));
        }
        Ok(())
    }

    pub fn is_within_limit(&self) -> bool {
        self.authorized_dollars <= self.credit_limit_dollars
    }

    /// Adds approved spend and reports whether the card is still within its limit.
    pub fn add_authorized_dollars(&mut self, amount: u64) -> bool {
        self.authorized_dollars = self.authorized_dollars.saturating_add(amount);
        self.is_within_limit()
    }
}
