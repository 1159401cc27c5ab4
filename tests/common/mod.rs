#![allow(dead_code)]

use card_authz::domain::card::Card;
use card_authz::domain::transaction::Transaction;
use rand::Rng;
use rand::rngs::StdRng;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub fn card(card_number: &str, limit: u64, authorized: u64, locked: bool) -> Card {
    let mut card = Card::new(card_number, limit).expect("valid card");
    card.authorized_dollars = authorized;
    card.locked = locked;
    card
}

pub fn txn(card_number: &str, transaction_id: &str, amount: u64) -> Transaction {
    Transaction::new(card_number, transaction_id, amount, "8222")
}

pub fn write_cards_csv(cards: &[Card]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "card_number,credit_limit_dollars,authorized_dollars,locked")?;
    for card in cards {
        writeln!(
            file,
            "{},{},{},{}",
            card.card_number, card.credit_limit_dollars, card.authorized_dollars, card.locked
        )?;
    }
    file.flush()?;
    Ok(file)
}

pub fn write_transactions_jsonl(txns: &[Transaction]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    for txn in txns {
        writeln!(file, "{}", serde_json::to_string(txn)?)?;
    }
    file.flush()?;
    Ok(file)
}

/// Random workload over `cards` card numbers, including some big transactions.
pub fn random_workload(rng: &mut StdRng, cards: usize, count: usize) -> Vec<Transaction> {
    (0..count)
        .map(|i| {
            let card = format!("card-{}", rng.gen_range(0..cards));
            let amount = if rng.gen_ratio(1, 20) {
                rng.gen_range(5001..10_000)
            } else {
                rng.gen_range(1..400)
            };
            txn(&card, &format!("txn-{i}"), amount)
        })
        .collect()
}
