use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;

fn spare_change() -> Command {
    let mut cmd = Command::new(cargo_bin!("spare-change"));
    cmd.env_remove("SPARE_CHANGE_USER")
        .env_remove("SPARE_CHANGE_ANNUAL_RETURN")
        .env_remove("SPARE_CHANGE_DAILY_SAVINGS");
    cmd
}

#[test]
fn test_roundups_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    spare_change()
        .arg("roundups")
        .arg("tests/fixtures/purchases.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "tx,user,merchant,amount,round_up,currency,total_saved,upcoming_investment",
        ))
        .stdout(predicate::str::contains("6,1,Uber,8.45,0.55,USD,13.30,3.30"))
        .stdout(predicate::str::contains("7,1,Netflix,15.99,0.01,USD,13.31,3.31"))
        .stdout(predicate::str::contains("8,1,Cinema,12.00,0.00,USD,13.31,3.31"))
        .stderr(predicate::str::contains(
            "user 1: saved 13.31, invested 10.00, upcoming 3.31 USD",
        ));

    Ok(())
}

#[test]
fn test_malformed_rows_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("purchases.csv");
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(["merchant", "amount", "payment_method"])?;
    wtr.write_record(["Bakery", "not_a_number", "apple_pay"])?;
    wtr.write_record(["Bakery", "4.20", "cash"])?;
    wtr.write_record(["", "4.20", "apple_pay"])?;
    wtr.write_record(["Bakery", "4.20", "apple_pay"])?;
    wtr.flush()?;
    drop(wtr);

    spare_change()
        .arg("roundups")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading purchase"))
        .stderr(predicate::str::contains("Error processing purchase"))
        .stdout(predicate::str::contains("6,1,Bakery,4.20,0.80,USD,13.55,3.55"));

    Ok(())
}

#[test]
fn test_portfolio_view() {
    spare_change()
        .arg("portfolio")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"investmentCount\": 3"))
        .stdout(predicate::str::contains("\"stockSymbol\": \"AAPL\""))
        .stdout(predicate::str::contains("\"totalValue\": \"97.91\""));
}

#[test]
fn test_holdings_and_allocation() {
    spare_change()
        .args(["holdings", "--sort-by", "gain_loss", "--order", "asc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sortBy\": \"gainLoss\""));

    spare_change()
        .arg("allocation")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"bySector\""))
        .stdout(predicate::str::contains("\"Automotive\""));
}

#[test]
fn test_projection_uses_configured_return() {
    spare_change()
        .args(["project", "--years", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"annualReturn\": \"8.0%\""))
        .stdout(predicate::str::contains("\"label\": \"$1,000\""));

    spare_change()
        .args(["project", "--years", "1"])
        .env("SPARE_CHANGE_ANNUAL_RETURN", "0.12")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"annualReturn\": \"12.0%\""));
}

#[test]
fn test_projection_rejects_zero_years() {
    spare_change()
        .args(["project", "--years", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("projection horizon"));
}

#[test]
fn test_stocks_filtered_by_currency() {
    spare_change()
        .args(["stocks", "--currency", "INR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INFY"))
        .stdout(predicate::str::contains("AAPL").not());
}

#[test]
fn test_invest_needs_savings() {
    spare_change()
        .args(["invest", "AAPL", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));
}

#[test]
fn test_invest_after_ingesting_purchases() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("purchases.csv");
    // 2.75 seeded + 10 x 0.90
    common::generate_purchases(&path, 10)?;

    spare_change()
        .arg("--purchases")
        .arg(&path)
        .args(["invest", "AAPL", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stockSymbol\": \"AAPL\""))
        .stdout(predicate::str::contains("\"upcomingInvestment\": \"1.75\""));

    spare_change()
        .arg("--purchases")
        .arg(&path)
        .arg("auto-invest")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalInvested\": \"20.00\""));

    Ok(())
}

#[test]
fn test_unknown_user_from_env() {
    spare_change()
        .arg("stats")
        .env("SPARE_CHANGE_USER", "2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("user 2 not found"));
}

#[test]
fn test_transactions_paging() {
    spare_change()
        .args(["transactions", "--kind", "investment", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hasMore\": true"))
        .stdout(predicate::str::contains("\"totalInvestments\": \"25.50\""));
}
