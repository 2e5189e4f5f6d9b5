use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use fintrack::{
    BudgetAmount, CategoryColor, CategoryName, TransactionBuilder, TransactionDescription,
    create_budget, create_category, create_transaction, initialize_db,
};

/// A utility for creating a test database for the fintrack web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test categories and budgets...");

    let groceries = create_category(
        CategoryName::new("Groceries")?,
        CategoryColor::new("#22c55e")?,
        Some("Supermarket shops".to_owned()),
        &conn,
    )?;
    let rent = create_category(
        CategoryName::new("Rent")?,
        CategoryColor::new("#ef4444")?,
        None,
        &conn,
    )?;
    let eating_out = create_category(
        CategoryName::new("Eating Out")?,
        CategoryColor::new("#f59e0b")?,
        Some("Cafes, restaurants and takeaways".to_owned()),
        &conn,
    )?;

    create_budget(
        groceries.id,
        BudgetAmount::new(600.0)?,
        Some("Aim for two shops per week".to_owned()),
        &conn,
    )?;
    create_budget(eating_out.id, BudgetAmount::new(150.0)?, None, &conn)?;

    println!("Creating test transactions...");

    let today = OffsetDateTime::now_utc().date();

    let seed_transactions = [
        ("Salary", 4200.0, today - Duration::days(7), None),
        ("Monthly rent", -1800.0, today - Duration::days(6), Some(rent.id)),
        ("Weekly shop", -132.50, today - Duration::days(5), Some(groceries.id)),
        ("Ramen night", -38.0, today - Duration::days(3), Some(eating_out.id)),
        ("Top-up shop", -41.75, today - Duration::days(1), Some(groceries.id)),
        ("Coffee", -5.50, today, Some(eating_out.id)),
        ("Bus fare", -2.80, today, None),
    ];

    for (description, amount, date, category_id) in seed_transactions {
        create_transaction(
            TransactionBuilder {
                description: TransactionDescription::new(description)?,
                amount,
                date,
                category_id,
                notes: None,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
