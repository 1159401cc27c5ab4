//! Application layer orchestrating the authorization flow.
//!
//! `AuthorizationEngine` routes transactions to partition workers by card
//! number. Each `PartitionWorker` runs the rule chain against its own credit
//! estimates, emits the outcome, and hands approvals to the
//! `SettlementApplier`, which performs the authoritative ledger update.

pub mod engine;
pub mod partition;
pub mod settlement;
