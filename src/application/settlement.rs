use crate::domain::card::Card;
use crate::domain::ports::SharedCardLedger;
use crate::error::{AuthorizationError, Result};
use tracing::{debug, warn};

/// Applies the authoritative ledger update for approved transactions.
///
/// Settlement runs after the decision has been emitted and never changes it.
/// Its result only tells whether the card is still within its limit once the
/// amount has been added.
#[derive(Clone)]
pub struct SettlementApplier {
    ledger: SharedCardLedger,
}

impl SettlementApplier {
    pub fn new(ledger: SharedCardLedger) -> Self {
        Self { ledger }
    }

    /// Atomically adds `amount` to the card's authorized dollars.
    ///
    /// Returns whether the new total is still within the credit limit.
    pub async fn settle(&self, card_number: &str, amount: u64) -> Result<bool> {
        let card = self
            .ledger
            .atomic_update(
                card_number,
                Box::new(move |card: &mut Card| {
                    card.add_authorized_dollars(amount);
                }),
            )
            .await?
            .ok_or_else(|| AuthorizationError::UnknownCard(card_number.to_string()))?;

        let within_limit = card.is_within_limit();
        if within_limit {
            debug!(
                card = %card_number,
                amount,
                authorized = card.authorized_dollars,
                "settled"
            );
        } else {
            warn!(
                card = %card_number,
                amount,
                authorized = card.authorized_dollars,
                limit = card.credit_limit_dollars,
                "settlement exceeded credit limit"
            );
        }
        Ok(within_limit)
    }
}
