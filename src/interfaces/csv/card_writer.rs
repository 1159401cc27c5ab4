use crate::domain::card::Card;
use crate::error::Result;
use std::io::Write;

/// Writes a snapshot of the card ledger as CSV, ordered by card number.
pub struct CardWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CardWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_cards(&mut self, mut cards: Vec<Card>) -> Result<()> {
        cards.sort_by(|a, b| a.card_number.cmp(&b.card_number));
        for card in cards {
            self.writer.serialize(card)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
