use crate::domain::card::Card;
use crate::error::{AuthorizationError, Result};
use std::io::Read;

/// Reads card reference data from a CSV source.
///
/// Expected header: `card_number,credit_limit_dollars,authorized_dollars,locked`.
/// The last two columns may be omitted; they default to `0`
/// and `false`. Each record is validated before it is yielded.
pub struct CardReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CardReader<R> {
    /// Creates a new `CardReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads, deserializes and validates cards.
    pub fn cards(self) -> impl Iterator<Item = Result<Card>> {
        self.reader.into_deserialize().map(|result| {
            let card: Card = result.map_err(AuthorizationError::from)?;
            card.validate()?;
            Ok(card)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "card_number, credit_limit_dollars, authorized_dollars, locked\n\
                    4111, 100, 20, false\n\
                    4222, 500, 0, true\n\
                    4333, 50";
        let reader = CardReader::new(data.as_bytes());
        let results: Vec<Result<Card>> = reader.cards().collect();

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.card_number, "4111");
        assert_eq!(first.authorized_dollars, 20);

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.authorized_dollars, 0);
        assert!(second.locked);

        let third = results[2].as_ref().unwrap();
        assert_eq!(third.credit_limit_dollars, 50);
        assert!(!third.locked);
    }

    #[test]
    fn test_reader_rejects_invalid_records() {
        let data = "card_number, credit_limit_dollars, authorized_dollars, locked\n\
                    4111, not_a_number, 0, false\n\
                    4222, 0, 0, false\n\
                    4333, 10, 0, false";
        let reader = CardReader::new(data.as_bytes());
        let results: Vec<Result<Card>> = reader.cards().collect();

        assert!(matches!(results[0], Err(AuthorizationError::CsvError(_))));
        assert!(matches!(results[1], Err(AuthorizationError::ValidationError(_))));
        assert!(results[2].is_ok());
    }
}
