use crate::application::savings::RoundUpReceipt;
use crate::domain::money::{Currency, round_money};
use crate::domain::transaction::TransactionId;
use crate::domain::user::UserId;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ReceiptRow<'a> {
    tx: TransactionId,
    user: UserId,
    merchant: &'a str,
    amount: Decimal,
    round_up: Decimal,
    currency: Currency,
    total_saved: Decimal,
    upcoming_investment: Decimal,
}

/// Writes round-up receipts as CSV, one row per recorded purchase.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, receipt: &RoundUpReceipt) -> Result<()> {
        let tx = &receipt.transaction;
        self.writer.serialize(ReceiptRow {
            tx: tx.id,
            user: tx.user_id,
            merchant: &tx.merchant,
            amount: round_money(tx.amount),
            round_up: round_money(receipt.round_up_amount),
            currency: tx.currency,
            total_saved: round_money(receipt.total_saved),
            upcoming_investment: round_money(receipt.upcoming_investment),
        })?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
