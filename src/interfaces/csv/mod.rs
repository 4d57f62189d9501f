//! CSV adapters: purchase ingestion and receipt output.

pub mod purchase_reader;
pub mod receipt_writer;
