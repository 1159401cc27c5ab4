pub mod decision_writer;
pub mod transaction_reader;
