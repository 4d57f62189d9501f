use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use spare_change::application::{PurchaseRequest, SavingsEngine, Stores, TransactionQuery};
use spare_change::config::EngineConfig;
use spare_change::domain::calc::{HoldingSortKey, Period, SortOrder};
use spare_change::domain::investment::{InvestmentId, InvestmentStatus};
use spare_change::domain::money::Currency;
use spare_change::domain::stock::{Country, StockCatalog};
use spare_change::domain::transaction::TransactionKind;
use spare_change::domain::user::UserId;
use spare_change::infrastructure::in_memory::{
    InMemoryInvestmentStore, InMemorySnapshotStore, InMemoryTransactionStore, InMemoryUserStore,
};
use spare_change::infrastructure::seed::seed_demo;
use spare_change::interfaces::csv::purchase_reader::PurchaseReader;
use spare_change::interfaces::csv::receipt_writer::ReceiptWriter;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// User the command acts on
    #[arg(long, global = true, env = "SPARE_CHANGE_USER", default_value_t = 1)]
    user: UserId,

    /// Annual return assumed by projections (0.08 = 8%)
    #[arg(long, global = true, env = "SPARE_CHANGE_ANNUAL_RETURN")]
    annual_return: Option<f64>,

    /// Spare change assumed per day when estimating the next investment
    #[arg(long, global = true, env = "SPARE_CHANGE_DAILY_SAVINGS")]
    daily_savings: Option<Decimal>,

    /// Purchases CSV to round up before running the command
    #[arg(long, global = true)]
    purchases: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Round up purchases from a CSV file and print the receipts as CSV
    Roundups { input: PathBuf },
    /// List positions with the portfolio summary
    Portfolio {
        #[arg(long)]
        status: Option<InvestmentStatus>,
    },
    /// Per-position breakdown with weights
    Holdings {
        #[arg(long, default_value = "value")]
        sort_by: HoldingSortKey,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
    },
    /// Portfolio weights by country, currency, sector and market cap
    Allocation,
    /// Change and volatility over a trailing window
    Performance {
        #[arg(long, default_value = "30d")]
        period: Period,
    },
    /// Compounding projection with milestones
    Project {
        #[arg(long, default_value_t = 5)]
        years: u32,
    },
    /// Buy fractional shares out of the pending savings
    Invest {
        symbol: String,
        amount: Decimal,
        #[arg(long, default_value = "USD")]
        currency: Currency,
    },
    /// Invest the threshold amount in an eligible stock
    AutoInvest,
    /// Sell shares of a position
    Sell {
        id: InvestmentId,
        shares: Decimal,
        price: Decimal,
    },
    /// User profile and preferences
    Profile,
    /// Savings dashboard figures
    Stats,
    /// Stocks available for investment
    Stocks {
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long)]
        country: Option<Country>,
    },
    /// Transaction history, newest first
    Transactions {
        #[arg(long)]
        kind: Option<TransactionKind>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{text}");
    Ok(())
}

/// Rounds up every readable purchase in `path`. Rows that cannot be read or
/// recorded are reported on stderr and skipped.
async fn ingest(engine: &SavingsEngine, path: &Path, now: NaiveDateTime, echo: bool) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    let reader = PurchaseReader::new(file);
    let stdout = io::stdout();
    let mut writer = echo.then(|| ReceiptWriter::new(stdout.lock()));

    for record in reader.purchases() {
        match record {
            Ok(record) => {
                let (request, at) = record.into_request();
                match engine.record_round_up(request, at.unwrap_or(now)).await {
                    Ok(receipt) => {
                        if let Some(writer) = writer.as_mut() {
                            writer.write(&receipt).into_diagnostic()?;
                        }
                    }
                    Err(e) => eprintln!("Error processing purchase: {}", e),
                }
            }
            Err(e) => eprintln!("Error reading purchase: {}", e),
        }
    }

    if let Some(writer) = writer {
        writer.finish().into_diagnostic()?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = EngineConfig::default();
    if let Some(annual_return) = cli.annual_return {
        config.annual_return = annual_return;
    }
    if let Some(daily_savings) = cli.daily_savings {
        config.daily_savings = daily_savings;
    }
    config.validate().into_diagnostic()?;

    let users = InMemoryUserStore::new();
    let transactions = InMemoryTransactionStore::new();
    let investments = InMemoryInvestmentStore::new();
    let snapshots = InMemorySnapshotStore::new();
    let catalog = StockCatalog::demo();
    seed_demo(&users, &transactions, &investments, &snapshots, &catalog)
        .await
        .into_diagnostic()?;

    let engine = SavingsEngine::new(
        Stores {
            users: Box::new(users),
            transactions: Box::new(transactions),
            investments: Box::new(investments),
            snapshots: Box::new(snapshots),
        },
        catalog,
    )
    .with_config(config);

    let now = Local::now().naive_local();
    let user = cli.user;
    if let Some(path) = &cli.purchases {
        ingest(&engine, path, now, false).await?;
    }

    match cli.command {
        Command::Roundups { input } => {
            ingest(&engine, &input, now, true).await?;
            for user in engine.into_users().await.into_diagnostic()? {
                eprintln!(
                    "user {}: saved {}, invested {}, upcoming {} {}",
                    user.id,
                    user.total_saved.value(),
                    user.total_invested.value(),
                    user.upcoming_investment.value(),
                    user.currency
                );
            }
        }
        Command::Portfolio { status } => {
            print_json(&engine.portfolio(user, status).await.into_diagnostic()?)?;
        }
        Command::Holdings { sort_by, order } => {
            print_json(&engine.holdings(user, sort_by, order).await.into_diagnostic()?)?;
        }
        Command::Allocation => {
            print_json(&engine.allocation(user).await.into_diagnostic()?)?;
        }
        Command::Performance { period } => {
            print_json(&engine.performance(user, period).await.into_diagnostic()?)?;
        }
        Command::Project { years } => {
            print_json(&engine.projections(user, years, None).await.into_diagnostic()?)?;
        }
        Command::Invest {
            symbol,
            amount,
            currency,
        } => {
            let request = PurchaseRequest {
                user_id: user,
                stock_symbol: symbol,
                amount,
                currency,
            };
            print_json(&engine.purchase(request, now).await.into_diagnostic()?)?;
        }
        Command::AutoInvest => {
            print_json(&engine.auto_invest(user, now).await.into_diagnostic()?)?;
        }
        Command::Sell { id, shares, price } => {
            print_json(&engine.sell(id, shares, price, now).await.into_diagnostic()?)?;
        }
        Command::Profile => {
            print_json(&engine.profile(user).await.into_diagnostic()?)?;
        }
        Command::Stats => {
            print_json(&engine.stats(user).await.into_diagnostic()?)?;
        }
        Command::Stocks { currency, country } => {
            print_json(&engine.available_stocks(currency, country))?;
        }
        Command::Transactions {
            kind,
            limit,
            offset,
        } => {
            let query = TransactionQuery { kind, limit, offset };
            print_json(&engine.transactions(user, &query).await.into_diagnostic()?)?;
        }
    }

    Ok(())
}
