//! File formats at the edge of the engine: CSV for card reference data and
//! ledger snapshots, JSON lines for transactions and decisions.

pub mod csv;
pub mod json;
