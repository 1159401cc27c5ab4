use card_authz::application::engine::AuthorizationEngine;
use card_authz::config::EngineConfig;
use card_authz::domain::decision::Outcome;
use card_authz::domain::ports::SharedCardLedger;
use card_authz::domain::rules::DEFAULT_BIG_TXN_THRESHOLD;
use card_authz::infrastructure::in_memory::InMemoryCardLedger;
use card_authz::interfaces::csv::card_reader::CardReader;
use card_authz::interfaces::csv::card_writer::CardWriter;
use card_authz::interfaces::json::decision_writer::DecisionWriter;
use card_authz::interfaces::json::transaction_reader::TransactionReader;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input transactions, one JSON object per line
    input: PathBuf,

    /// Card reference data CSV file loaded into the ledger before processing
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Write the final card ledger as CSV to this file
    #[arg(long)]
    ledger_out: Option<PathBuf>,

    /// Number of partition workers
    #[arg(long, env = "CARD_AUTHZ_PARTITIONS", default_value_t = 4)]
    partitions: usize,

    /// Capacity of each partition queue and of the decision queue
    #[arg(long, env = "CARD_AUTHZ_CHANNEL_CAPACITY", default_value_t = 1024)]
    channel_capacity: usize,

    /// Amounts above this are declined as big transactions
    #[arg(long, env = "CARD_AUTHZ_BIG_TXN_THRESHOLD", default_value_t = DEFAULT_BIG_TXN_THRESHOLD)]
    big_txn_threshold: u64,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            partitions: self.partitions,
            channel_capacity: self.channel_capacity,
            big_txn_threshold: self.big_txn_threshold,
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_ledger(db_path: Option<&PathBuf>) -> Result<SharedCardLedger> {
    use card_authz::infrastructure::rocksdb::RocksDBCardLedger;

    match db_path {
        Some(path) => Ok(Arc::new(RocksDBCardLedger::open(path).into_diagnostic()?)),
        None => Ok(Arc::new(InMemoryCardLedger::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_ledger(db_path: Option<&PathBuf>) -> Result<SharedCardLedger> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Arc::new(InMemoryCardLedger::new()))
}

async fn load_cards(ledger: &SharedCardLedger, path: &Path) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    let mut loaded = 0usize;
    for card in CardReader::new(file).cards() {
        match card {
            Ok(card) => {
                ledger.put(card).await.into_diagnostic()?;
                loaded += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping invalid card record");
                eprintln!("Error reading card: {}", e);
            }
        }
    }
    info!(loaded, "card reference data loaded");
    Ok(())
}

/// Writes every decision to stdout and reports failed transactions on stderr.
async fn emit_outcomes(mut outcomes: mpsc::Receiver<Outcome>) -> card_authz::error::Result<()> {
    let mut writer = DecisionWriter::new(BufWriter::new(io::stdout()));
    while let Some(outcome) = outcomes.recv().await {
        match outcome {
            Outcome::Decided(decision) => writer.write_decision(&decision)?,
            Outcome::Failed {
                card_number,
                transaction_id,
                error,
            } => {
                eprintln!(
                    "Error processing transaction {} for card {}: {}",
                    transaction_id, card_number, error
                );
            }
        }
    }
    writer.flush()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let ledger = open_ledger(cli.db_path.as_ref())?;
    if let Some(cards) = &cli.cards {
        load_cards(&ledger, cards).await?;
    }

    let (engine, outcomes) =
        AuthorizationEngine::start(ledger.clone(), cli.engine_config()).into_diagnostic()?;
    let emitter = tokio::spawn(emit_outcomes(outcomes));

    let file = File::open(&cli.input).into_diagnostic()?;
    for txn in TransactionReader::new(BufReader::new(file)).transactions() {
        match txn {
            Ok(txn) => engine.submit(txn).await.into_diagnostic()?,
            Err(e) => {
                warn!(error = %e, "skipping malformed transaction");
                eprintln!("Error reading transaction: {}", e);
            }
        }
    }

    let stats = engine.shutdown().await.into_diagnostic()?;
    emitter.await.into_diagnostic()?.into_diagnostic()?;

    info!(
        processed = stats.processed,
        approved = stats.approved,
        declined = stats.declined,
        failed = stats.failed,
        settlement_overruns = stats.settlement_overruns,
        settlement_failures = stats.settlement_failures,
        "run complete"
    );

    if let Some(path) = &cli.ledger_out {
        let cards = ledger.all_cards().await.into_diagnostic()?;
        let file = File::create(path).into_diagnostic()?;
        CardWriter::new(file).write_cards(cards).into_diagnostic()?;
    }

    Ok(())
}
