//! Database operations for budgets.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    budget::{Budget, BudgetAmount},
    database_id::{BudgetId, CategoryId},
};

/// A budget joined with its category's display fields, for listing pages.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetWithCategory {
    /// The budget row.
    pub budget: Budget,
    /// The name of the budgeted category.
    pub category_name: String,
    /// The display color of the budgeted category.
    pub category_color: String,
}

/// Create a budget for a category and return it with its generated ID.
///
/// At most one budget may exist per category. The existence check here gives
/// a friendly error on the common path; the unique index on
/// `budget.category_id` closes the check-then-insert race, and a constraint
/// violation from a concurrent insert maps to the same [Error::DuplicateBudget].
pub fn create_budget(
    category_id: CategoryId,
    amount: BudgetAmount,
    notes: Option<String>,
    connection: &Connection,
) -> Result<Budget, Error> {
    if get_budget_by_category(category_id, connection)?.is_some() {
        return Err(Error::DuplicateBudget);
    }

    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO budget (category_id, amount, notes, created_at) VALUES (?1, ?2, ?3, ?4);",
        (category_id, amount.as_f64(), &notes, created_at),
    )?;

    let id = BudgetId::new(connection.last_insert_rowid());

    Ok(Budget {
        id,
        category_id,
        amount,
        notes,
        created_at,
        updated_at: None,
    })
}

/// Retrieve a single budget by ID.
pub fn get_budget(budget_id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, category_id, amount, notes, created_at, updated_at \
            FROM budget WHERE id = :id;",
        )?
        .query_row(&[(":id", &budget_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve the budget for a category, if one exists.
pub fn get_budget_by_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Option<Budget>, Error> {
    let result = connection
        .prepare(
            "SELECT id, category_id, amount, notes, created_at, updated_at \
            FROM budget WHERE category_id = :category_id;",
        )?
        .query_row(&[(":category_id", &category_id)], map_row);

    match result {
        Ok(budget) => Ok(Some(budget)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Retrieve all budgets with their category display fields, ordered by
/// category name.
pub fn get_all_budgets(connection: &Connection) -> Result<Vec<BudgetWithCategory>, Error> {
    connection
        .prepare(
            "SELECT b.id, b.category_id, b.amount, b.notes, b.created_at, b.updated_at, \
                c.name, c.color \
            FROM budget b INNER JOIN category c ON b.category_id = c.id \
            ORDER BY c.name ASC;",
        )?
        .query_map([], |row| {
            let budget = map_row(row)?;

            Ok(BudgetWithCategory {
                budget,
                category_name: row.get(6)?,
                category_color: row.get(7)?,
            })
        })?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Update a budget's fields. Returns an error if the budget doesn't exist.
///
/// When the submitted category differs from the stored one, the uniqueness
/// check is re-run against the other budgets so a budget cannot be moved onto
/// a category that already has one.
pub fn update_budget(
    budget_id: BudgetId,
    category_id: CategoryId,
    amount: BudgetAmount,
    notes: Option<String>,
    connection: &Connection,
) -> Result<(), Error> {
    if let Some(existing) = get_budget_by_category(category_id, connection)?
        && existing.id != budget_id
    {
        return Err(Error::DuplicateBudget);
    }

    let rows_affected = connection.execute(
        "UPDATE budget SET category_id = ?1, amount = ?2, notes = ?3, updated_at = ?4 \
        WHERE id = ?5",
        (
            category_id,
            amount.as_f64(),
            &notes,
            OffsetDateTime::now_utc(),
            budget_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(())
}

/// Delete a budget by ID. Returns an error if the budget doesn't exist.
pub fn delete_budget(budget_id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = ?1", [budget_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Initialize the budget table.
///
/// The UNIQUE index on `category_id` enforces the one-budget-per-category
/// rule at the storage layer.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_budget_category_id ON budget(category_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let amount: f64 = row.get(2)?;

    Ok(Budget {
        id: row.get(0)?,
        category_id: row.get(1)?,
        amount: BudgetAmount::new_unchecked(amount),
        notes: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
