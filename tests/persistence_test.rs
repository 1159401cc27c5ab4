#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;
use common::{card, txn, write_cards_csv, write_transactions_jsonl};

#[test]
fn test_rocksdb_ledger_survives_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: provision the card and spend 60 of 100
    let cards = write_cards_csv(&[card("4111", 100, 0, false)]).unwrap();
    let txns1 = write_transactions_jsonl(&[txn("4111", "1", 60)]).unwrap();

    let output1 = Command::new(cargo_bin!("card-authz"))
        .arg(txns1.path())
        .arg("--cards")
        .arg(cards.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains(r#""transaction_id":"1","status":"APPROVED""#));

    // 2. Second run without reference data: the estimate re-seeds from the stored 60
    let txns2 = write_transactions_jsonl(&[txn("4111", "2", 50), txn("4111", "3", 40)]).unwrap();

    let output2 = Command::new(cargo_bin!("card-authz"))
        .arg(txns2.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    assert!(stdout2.contains(r#""transaction_id":"2","status":"DECLINED_OVER_LIMIT""#));
    assert!(stdout2.contains(r#""transaction_id":"3","status":"APPROVED""#));
}
