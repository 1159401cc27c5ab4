use super::card::Card;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A mutation applied to a card inside a single atomic ledger update.
pub type CardUpdate = Box<dyn FnOnce(&mut Card) + Send>;

/// Authoritative per-card record store.
///
/// Implementations must apply each `atomic_update` indivisibly: no other
/// update of the same card may interleave between its read and its write.
#[async_trait]
pub trait CardLedger: Send + Sync {
    /// Point read of a card.
    async fn get(&self, card_number: &str) -> Result<Option<Card>>;

    /// Applies `update` exactly once to the stored card and returns the
    /// updated record, or `None` if the card does not exist.
    async fn atomic_update(&self, card_number: &str, update: CardUpdate) -> Result<Option<Card>>;

    /// Provisions or replaces a card.
    async fn put(&self, card: Card) -> Result<()>;

    async fn all_cards(&self) -> Result<Vec<Card>>;
}

/// The ledger handle shared by every partition worker.
pub type SharedCardLedger = Arc<dyn CardLedger>;
