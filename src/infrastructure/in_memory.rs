use crate::domain::card::Card;
use crate::domain::ports::{CardLedger, CardUpdate};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory card ledger.
///
/// Uses `Arc<RwLock<HashMap<String, Card>>>` so clones share the same records.
/// Atomic updates hold the write lock across the whole read-modify-write.
#[derive(Default, Clone)]
pub struct InMemoryCardLedger {
    cards: Arc<RwLock<HashMap<String, Card>>>,
}

impl InMemoryCardLedger {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger pre-populated with `cards`.
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards = cards
            .into_iter()
            .map(|card| (card.card_number.clone(), card))
            .collect();
        Self {
            cards: Arc::new(RwLock::new(cards)),
        }
    }
}

#[async_trait]
impl CardLedger for InMemoryCardLedger {
    async fn get(&self, card_number: &str) -> Result<Option<Card>> {
        let cards = self.cards.read().await;
        Ok(cards.get(card_number).cloned())
    }

    async fn atomic_update(&self, card_number: &str, update: CardUpdate) -> Result<Option<Card>> {
        let mut cards = self.cards.write().await;
        Ok(cards.get_mut(card_number).map(|card| {
            update(card);
            card.clone()
        }))
    }

    async fn put(&self, card: Card) -> Result<()> {
        let mut cards = self.cards.write().await;
        cards.insert(card.card_number.clone(), card);
        Ok(())
    }

    async fn all_cards(&self) -> Result<Vec<Card>> {
        let cards = self.cards.read().await;
        Ok(cards.values().cloned().collect())
    }
}
