use card_authz::application::settlement::SettlementApplier;
use card_authz::domain::card::Card;
use card_authz::domain::ports::SharedCardLedger;
use card_authz::infrastructure::in_memory::InMemoryCardLedger;
use std::sync::Arc;

#[tokio::test]
async fn test_ledger_as_shared_trait_object() {
    let ledger: SharedCardLedger = Arc::new(InMemoryCardLedger::new());
    ledger.put(Card::new("4111", 1_000).unwrap()).await.unwrap();

    // Verify Send + Sync by settling from many tasks at once
    let mut handles = Vec::new();
    for _ in 0..10 {
        let applier = SettlementApplier::new(ledger.clone());
        handles.push(tokio::spawn(async move {
            applier.settle("4111", 100).await.unwrap()
        }));
    }

    let mut within_limit = 0;
    for handle in handles {
        if handle.await.unwrap() {
            within_limit += 1;
        }
    }
    assert_eq!(within_limit, 10);

    let card = ledger.get("4111").await.unwrap().unwrap();
    assert_eq!(card.authorized_dollars, 1_000);

    // One more settlement lands even though it breaks the limit.
    let applier = SettlementApplier::new(ledger.clone());
    assert!(!applier.settle("4111", 1).await.unwrap());
    assert_eq!(ledger.get("4111").await.unwrap().unwrap().authorized_dollars, 1_001);
}
