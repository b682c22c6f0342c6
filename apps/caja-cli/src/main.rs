//! # caja: Branch Cash Ledger CLI
//!
//! Records sales and expenses, shows the day's cash position and closes the
//! day against the counted drawer.
//!
//! ## Module Organization
//! ```text
//! caja-cli/
//! ├── main.rs         ◄─── You are here (arguments, logging, startup)
//! └── commands/
//!     ├── mod.rs      ◄─── Output rendering (text / JSON)
//!     ├── sale.rs     ◄─── sale
//!     ├── expense.rs  ◄─── expense, payroll
//!     ├── closing.rs  ◄─── position, close
//!     ├── report.rs   ◄─── report
//!     └── roster.rs   ◄─── roster
//! ```
//!
//! ## Usage
//! ```bash
//! caja --branch "Sucursal Centro" sale --method cash --amount 1500 --tendered 2000
//! caja --branch "Sucursal Centro" --role owner payroll --all
//! caja --branch "Sucursal Centro" close --counted 3750 --note "falta cambio"
//! caja --json report --from 2026-03-01 --to 2026-03-31
//! ```

mod commands;

use anyhow::{Context, Result};
use caja_core::{ExpenseReason, Money, PaymentMethod, Role, Session};
use caja_db::{Database, DbConfig};
use caja_ledger::{Ledger, LedgerConfig};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::Output;

/// Branch cash ledger.
#[derive(Parser, Debug)]
#[command(name = "caja")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database file (overrides CAJA_DB_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Branch the session acts for
    #[arg(short, long, global = true, default_value = "Sucursal Centro")]
    branch: String,

    /// Role of the session: owner or cashier
    #[arg(short, long, global = true, default_value = "cashier")]
    role: Role,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a sale
    Sale {
        /// cash, digital_wallet_a, digital_wallet_b or store_credit
        #[arg(short, long)]
        method: PaymentMethod,

        /// Amount due
        #[arg(short, long)]
        amount: Money,

        /// Cash handed over (cash sales only)
        #[arg(short, long)]
        tendered: Option<Money>,

        /// Creditor name (store credit only)
        #[arg(long)]
        customer: Option<String>,

        /// Creditor phone (store credit only)
        #[arg(long)]
        phone: Option<String>,
    },
    /// Record an expense
    Expense {
        /// supplier, payroll, repairs or other
        #[arg(long)]
        reason: ExpenseReason,

        #[arg(short, long)]
        amount: Money,

        #[arg(short, long)]
        note: Option<String>,
    },
    /// Pay base salaries of selected employees (owner only)
    Payroll {
        /// Employee id; repeat for several
        #[arg(short, long = "employee", value_name = "ID")]
        employees: Vec<String>,

        /// Pay every active employee of the branch
        #[arg(long, conflicts_with = "employees")]
        all: bool,

        #[arg(short, long)]
        note: Option<String>,
    },
    /// Show the cash position of a day
    Position {
        /// Business date (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Close a day against the counted drawer
    Close {
        /// Cash counted in the drawer
        #[arg(short, long, allow_negative_numbers = true)]
        counted: Money,

        /// Business date (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        note: Option<String>,
    },
    /// Totals per payment method over a date range
    Report {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,

        /// Include every branch instead of the session's
        #[arg(long)]
        all_branches: bool,
    },
    /// Active employees and their last payroll payment
    Roster,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = LedgerConfig::from_env().context("invalid CAJA_* configuration")?;
    let db_path = get_database_path(args.db.as_ref(), &config)?;
    debug!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    info!("Database connected and migrations applied");

    let output = Output::new(args.json, &config.currency_symbol);
    let ledger = Ledger::system(db, config);
    let session = Session::new(args.branch, args.role);

    let result = match args.command {
        Command::Sale {
            method,
            amount,
            tendered,
            customer,
            phone,
        } => {
            let request = commands::sale::build_request(method, amount, tendered, customer, phone);
            commands::sale::record(&ledger, &session, request, &output).await
        }
        Command::Expense { reason, amount, note } => {
            commands::expense::record(&ledger, &session, reason, amount, note.as_deref(), &output)
                .await
        }
        Command::Payroll { employees, all, note } => {
            commands::expense::payroll(&ledger, &session, &employees, all, note.as_deref(), &output)
                .await
        }
        Command::Position { date } => {
            let date = date.unwrap_or_else(|| ledger.today());
            commands::closing::position(&ledger, &session, date, &output).await
        }
        Command::Close { counted, date, note } => {
            let date = date.unwrap_or_else(|| ledger.today());
            commands::closing::close(&ledger, &session, date, counted, note.as_deref(), &output)
                .await
        }
        Command::Report {
            from,
            to,
            all_branches,
        } => {
            let branch = (!all_branches).then_some(session.branch.as_str());
            commands::report::breakdown(&ledger, from, to, branch, &output).await
        }
        Command::Roster => commands::roster::show(&ledger, &session, &output).await,
    };

    ledger.database().close().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so `--json` output stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=caja=trace` - Show trace for caja crates only
/// - Default: `info,caja=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caja=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the database file.
///
/// ## Priority
/// 1. `--db`
/// 2. `CAJA_DB_PATH`
/// 3. Platform data directory:
///    - **macOS**: `~/Library/Application Support/com.caja.ledger/caja.db`
///    - **Windows**: `%APPDATA%\caja\ledger\data\caja.db`
///    - **Linux**: `~/.local/share/ledger/caja.db`
fn get_database_path(flag: Option<&PathBuf>, config: &LedgerConfig) -> Result<PathBuf> {
    if let Some(path) = flag.or(config.db_path.as_ref()) {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "caja", "ledger")
        .context("could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    Ok(data_dir.join("caja.db"))
}
