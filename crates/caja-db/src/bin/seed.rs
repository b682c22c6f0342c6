//! # Seed Data Generator
//!
//! Populates a ledger database with two branches, their staff and one
//! sample trading day, for development and demos.
//!
//! ## Usage
//! ```bash
//! # Seed ./caja_dev.db for today
//! cargo run -p caja-db --bin seed
//!
//! # Specify database path and the sample day
//! cargo run -p caja-db --bin seed -- --db ./data/caja.db --date 2026-03-14
//! ```
//!
//! ## Generated Data
//! - Branches: "Sucursal Centro", "Sucursal Norte"
//! - Three active employees per branch, plus one inactive
//! - A sample day per branch: cash, wallet and store-credit sales and a
//!   supplier expense (left open, so it can be closed from the CLI)

use caja_core::{
    EmployeeRecord, ExpenseLine, ExpenseReason, Money, PaymentMethod, Role, SaleRequest,
};
use caja_db::{Database, DbConfig};
use chrono::{NaiveDate, Utc};
use std::env;
use uuid::Uuid;

const BRANCHES: &[&str] = &["Sucursal Centro", "Sucursal Norte"];

/// (name, monthly base salary in cents, active)
const STAFF: &[&[(&str, i64, bool)]] = &[
    &[
        ("Ana Gómez", 45_000_000, true),
        ("Luis Pereyra", 38_000_000, true),
        ("Marta Díaz", 38_000_000, true),
        ("Carlos Ruiz", 36_000_000, false),
    ],
    &[
        ("Jorge Benítez", 44_000_000, true),
        ("Sofía Acosta", 37_500_000, true),
        ("Pablo Ledesma", 37_500_000, true),
        ("Lucía Romero", 35_000_000, false),
    ],
];

/// (method, amount in cents, tendered in cents for cash)
const SAMPLE_SALES: &[(PaymentMethod, i64, i64)] = &[
    (PaymentMethod::Cash, 150_000, 200_000),
    (PaymentMethod::Cash, 320_050, 320_050),
    (PaymentMethod::Cash, 29_900, 50_000),
    (PaymentMethod::DigitalWalletA, 180_000, 0),
    (PaymentMethod::DigitalWalletB, 120_000, 0),
    (PaymentMethod::StoreCredit, 30_000, 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./caja_dev.db");
    let mut date: NaiveDate = Utc::now().date_naive();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--date" => {
                if i + 1 < args.len() {
                    date = args[i + 1].parse()?;
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Caja Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./caja_dev.db)");
                println!("      --date <DATE>    Sample business day, YYYY-MM-DD (default: today UTC)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Caja Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Sample day: {}", date);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.employees().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} employees", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (branch, staff) in BRANCHES.iter().zip(STAFF) {
        println!();
        println!("{}", branch);

        for (name, salary_cents, active) in staff.iter() {
            db.employees()
                .hire(&EmployeeRecord {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    branch: branch.to_string(),
                    base_salary_cents: *salary_cents,
                    active: *active,
                })
                .await?;
        }
        println!("  ✓ {} employees", staff.len());

        for (method, amount, tendered) in SAMPLE_SALES.iter().copied() {
            let amount = Money::from_cents(amount);
            let request = match method {
                PaymentMethod::Cash => SaleRequest::cash(amount, Money::from_cents(tendered)),
                PaymentMethod::StoreCredit => {
                    SaleRequest::store_credit(amount, "Doña Rosa", Some("11 4555-1234".into()))
                }
                other => SaleRequest::digital(other, amount),
            };
            let record = request
                .classify()?
                .into_record(Uuid::new_v4().to_string(), branch, date, Utc::now());
            db.sales().append(&record).await?;
        }
        println!("  ✓ {} sales", SAMPLE_SALES.len());

        let supplier = ExpenseLine::new(
            Role::Cashier,
            ExpenseReason::Supplier,
            Money::from_cents(85_000),
            Some("Panadería"),
            caja_core::NOTE_MAX_LEN,
        )?
        .into_record(Uuid::new_v4().to_string(), branch, date, Utc::now());
        db.expenses().append(&supplier).await?;
        println!("  ✓ 1 expense");
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
