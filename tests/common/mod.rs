use std::fs::File;
use std::io::Error;
use std::path::Path;

/// Writes `rows` purchases of 3.10 each for user 1, every one saving 0.90.
#[allow(dead_code)]
pub fn generate_purchases(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["user", "merchant", "amount", "payment_method", "currency"])?;
    for i in 1..=rows {
        wtr.write_record([
            "1",
            &format!("Shop {i}"),
            "3.10",
            "debit_card",
            "USD",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
