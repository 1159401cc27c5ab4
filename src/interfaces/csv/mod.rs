pub mod card_reader;
pub mod card_writer;
