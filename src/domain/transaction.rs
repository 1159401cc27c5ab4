use serde::{Deserialize, Serialize};

/// Authorization status of a transaction.
///
/// Every transaction enters the rule chain as `New` and leaves it in exactly
/// one of the terminal variants.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    New,
    DeclinedBigTxn,
    DeclinedLocked,
    DeclinedOverLimit,
    Approved,
}

impl Status {
    pub fn is_declined(self) -> bool {
        matches!(
            self,
            Status::DeclinedBigTxn | Status::DeclinedLocked | Status::DeclinedOverLimit
        )
    }
}

/// One card-present authorization request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Transaction {
    pub card_number: String,
    pub transaction_id: String,
    /// Whole currency units.
    pub amount: u64,
    #[serde(default)]
    pub merchant_id: String,
    /// Always `New` on ingestion: a status carried by the input is ignored.
    #[serde(default, skip_deserializing)]
    pub status: Status,
}

impl Transaction {
    pub fn new(
        card_number: impl Into<String>,
        transaction_id: impl Into<String>,
        amount: u64,
        merchant_id: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            transaction_id: transaction_id.into(),
            amount,
            merchant_id: merchant_id.into(),
            status: Status::New,
        }
    }

    pub fn is_new(&self) -> bool {
        self.status == Status::New
    }

    /// Records `status` only while the transaction is still `New`.
    ///
    /// Returns whether the status was changed. The first decision wins.
    pub fn classify(&mut self, status: Status) -> bool {
        if self.is_new() {
            self.status = status;
            true
        } else {
            false
        }
    }
}
