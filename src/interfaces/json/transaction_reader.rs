use crate::domain::transaction::Transaction;
use crate::error::{AuthorizationError, Result};
use std::io::BufRead;

/// Reads transactions from a JSON-lines source, one object per line.
///
/// Each line is parsed on its own, so a malformed line yields an error for
/// that line only and reading continues with the next one. Blank lines are
/// skipped.
pub struct TransactionReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> TransactionReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.source
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|(index, line)| {
                let line = line?;
                serde_json::from_str(&line).map_err(|e| {
                    AuthorizationError::ValidationError(format!("line {}: {}", index + 1, e))
                })
            })
    }
}
