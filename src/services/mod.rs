pub mod bank_writer;
pub mod text_reader;
pub mod warn_writer;

pub use bank_writer::BankWriter;
pub use text_reader::{decode_text, TextReader};
pub use warn_writer::WarnWriter;
