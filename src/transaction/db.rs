//! Database operations for transactions.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, TransactionDescription},
};

/// A transaction joined with its category's display fields, for listing
/// pages. The category fields are `None` for uncategorised transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionWithCategory {
    /// The transaction row.
    pub transaction: Transaction,
    /// The name of the assigned category, if any.
    pub category_name: Option<String>,
    /// The display color of the assigned category, if any.
    pub category_color: Option<String>,
}

/// Create a transaction and return it with its generated ID.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO \"transaction\" (description, amount, date, category_id, notes, created_at) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        (
            builder.description.as_ref(),
            builder.amount,
            builder.date,
            builder.category_id,
            &builder.notes,
            created_at,
        ),
    )?;

    let id = TransactionId::new(connection.last_insert_rowid());

    Ok(Transaction {
        id,
        description: builder.description,
        amount: builder.amount,
        date: builder.date,
        category_id: builder.category_id,
        notes: builder.notes,
        created_at,
        updated_at: None,
    })
}

/// Retrieve a single transaction by ID.
pub fn get_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, date, category_id, notes, created_at, updated_at \
            FROM \"transaction\" WHERE id = :id;",
        )?
        .query_row(&[(":id", &transaction_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all transactions with their category display fields, newest
/// first.
pub fn get_all_transactions(
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    // Sort by date, and then ID to keep transaction order stable after
    // updates.
    connection
        .prepare(
            "SELECT t.id, t.description, t.amount, t.date, t.category_id, t.notes, \
                t.created_at, t.updated_at, c.name, c.color \
            FROM \"transaction\" t LEFT JOIN category c ON t.category_id = c.id \
            ORDER BY t.date DESC, t.id DESC;",
        )?
        .query_map([], |row| {
            let transaction = map_row(row)?;

            Ok(TransactionWithCategory {
                transaction,
                category_name: row.get(8)?,
                category_color: row.get(9)?,
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Update a transaction's fields. Returns an error if the transaction
/// doesn't exist.
///
/// A `None` category explicitly clears the stored reference.
pub fn update_transaction(
    transaction_id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET description = ?1, amount = ?2, date = ?3, \
        category_id = ?4, notes = ?5, updated_at = ?6 WHERE id = ?7",
        (
            builder.description.as_ref(),
            builder.amount,
            builder.date,
            builder.category_id,
            &builder.notes,
            OffsetDateTime::now_utc(),
            transaction_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete a transaction by ID. Returns an error if the transaction doesn't
/// exist.
pub fn delete_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [transaction_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Initialize the transaction table.
///
/// `category_id` is nullable and carries no foreign key: the reference is a
/// soft one, guarded by the category delete endpoint instead.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            category_id INTEGER,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_description: String = row.get(1)?;
    let description = TransactionDescription::new_unchecked(&raw_description);

    Ok(Transaction {
        id: row.get(0)?,
        description,
        amount: row.get(2)?,
        date: row.get(3)?,
        category_id: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
