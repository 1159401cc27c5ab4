//! Domain model: cards, transactions, the authorization rules and the
//! ports the application layer talks to.

pub mod card;
pub mod decision;
pub mod estimator;
pub mod ports;
pub mod rules;
pub mod transaction;
