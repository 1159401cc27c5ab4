use crate::domain::card::Card;
use crate::domain::ports::{CardLedger, CardUpdate};
use crate::error::{AuthorizationError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing card records.
pub const CF_CARDS: &str = "cards";

/// Number of lock stripes guarding read-modify-write cycles.
const UPDATE_STRIPES: usize = 64;

/// A persistent card ledger backed by RocksDB.
///
/// Cards live in their own column family, JSON encoded and keyed by card
/// number. RocksDB has no read-modify-write primitive, so `atomic_update`
/// serialises updates per card through a striped set of async mutexes.
///
/// `Clone` shares the underlying `Arc<DB>` and stripes.
#[derive(Clone)]
pub struct RocksDBCardLedger {
    db: Arc<DB>,
    stripes: Arc<Vec<Mutex<()>>>,
}

impl RocksDBCardLedger {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "cards" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_cards = ColumnFamilyDescriptor::new(CF_CARDS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_cards])?;

        let stripes = (0..UPDATE_STRIPES).map(|_| Mutex::new(())).collect();
        Ok(Self {
            db: Arc::new(db),
            stripes: Arc::new(stripes),
        })
    }

    fn stripe(&self, card_number: &str) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        card_number.hash(&mut hasher);
        &self.stripes[(hasher.finish() as usize) % self.stripes.len()]
    }

    fn read(&self, card_number: &str) -> Result<Option<Card>> {
        let cf = self.cards_cf()?;
        match self.db.get_cf(cf, card_number.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, card: &Card) -> Result<()> {
        let cf = self.cards_cf()?;
        let value = serde_json::to_vec(card)?;
        self.db.put_cf(cf, card.card_number.as_bytes(), value)?;
        Ok(())
    }

    fn cards_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_CARDS).ok_or_else(|| {
            AuthorizationError::InternalError(Box::new(std::io::Error::other(
                "Cards column family not found",
            )))
        })
    }
}

#[async_trait]
impl CardLedger for RocksDBCardLedger {
    async fn get(&self, card_number: &str) -> Result<Option<Card>> {
        self.read(card_number)
    }

    async fn atomic_update(&self, card_number: &str, update: CardUpdate) -> Result<Option<Card>> {
        let _guard = self.stripe(card_number).lock().await;
        let Some(mut card) = self.read(card_number)? else {
            return Ok(None);
        };
        update(&mut card);
        self.write(&card)?;
        Ok(Some(card))
    }

    async fn put(&self, card: Card) -> Result<()> {
        let _guard = self.stripe(&card.card_number).lock().await;
        self.write(&card)
    }

    async fn all_cards(&self) -> Result<Vec<Card>> {
        let cf = self.cards_cf()?;
        let mut cards = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            cards.push(serde_json::from_slice(&value)?);
        }
        Ok(cards)
    }
}
