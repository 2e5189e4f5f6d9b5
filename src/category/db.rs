//! Database operations for categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryColor, CategoryName},
    database_id::CategoryId,
};

/// Create a category and return it with its generated ID.
pub fn create_category(
    name: CategoryName,
    color: CategoryColor,
    description: Option<String>,
    connection: &Connection,
) -> Result<Category, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO category (name, color, description, created_at) VALUES (?1, ?2, ?3, ?4);",
            (name.as_ref(), color.as_ref(), &description, created_at),
        )
        .map_err(|error| map_duplicate_name(error, name.as_ref()))?;

    let id = CategoryId::new(connection.last_insert_rowid());

    Ok(Category {
        id,
        name,
        color,
        description,
        created_at,
        updated_at: None,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, color, description, created_at, updated_at \
            FROM category WHERE id = :id;",
        )?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, color, description, created_at, updated_at \
            FROM category ORDER BY name ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category's fields. Returns an error if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    name: CategoryName,
    color: CategoryColor,
    description: Option<String>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, color = ?2, description = ?3, updated_at = ?4 \
            WHERE id = ?5",
            (
                name.as_ref(),
                color.as_ref(),
                &description,
                OffsetDateTime::now_utc(),
                category_id,
            ),
        )
        .map_err(|error| map_duplicate_name(error, name.as_ref()))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
///
/// This only removes the row. The referential-integrity guard against
/// deleting a category that transactions still reference lives in the delete
/// endpoint, which must call [count_transactions_with_category] first.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Count the transactions that reference `category_id`.
pub fn count_transactions_with_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<i64, Error> {
    connection
        .prepare("SELECT COUNT(1) FROM \"transaction\" WHERE category_id = :category_id;")?
        .query_row(&[(":category_id", &category_id)], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &str) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
        {
            Error::DuplicateCategoryName(name.to_string())
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;

    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    let raw_color: String = row.get(2)?;
    let color = CategoryColor::new_unchecked(&raw_color);

    Ok(Category {
        id,
        name,
        color,
        description: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            CategoryColor, CategoryName, count_transactions_with_category, create_category,
            delete_category, get_all_categories, get_category, update_category,
        },
        database_id::CategoryId,
        initialize_db,
        transaction::{TransactionBuilder, TransactionDescription, create_transaction},
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).expect("Could not initialize test DB");
        connection
    }

    fn test_category(name: &str, connection: &Connection) -> crate::category::Category {
        create_category(
            CategoryName::new_unchecked(name),
            CategoryColor::new_unchecked("#00ff00"),
            None,
            connection,
        )
        .expect("Could not create test category")
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Groceries").unwrap();
        let color = CategoryColor::new("#00ff00").unwrap();

        let category = create_category(
            name.clone(),
            color.clone(),
            Some("Weekly shop".to_string()),
            &connection,
        )
        .expect("Could not create category");

        assert!(category.id.as_i64() > 0);
        assert_eq!(category.name, name);
        assert_eq!(category.color, color);
        assert_eq!(category.description.as_deref(), Some("Weekly shop"));
        assert_eq!(category.updated_at, None);
    }

    #[test]
    fn create_category_fails_on_duplicate_name() {
        let connection = get_test_db_connection();
        test_category("Groceries", &connection);

        let result = create_category(
            CategoryName::new_unchecked("Groceries"),
            CategoryColor::new_unchecked("#123456"),
            None,
            &connection,
        );

        assert_eq!(
            result,
            Err(Error::DuplicateCategoryName("Groceries".to_string()))
        );
    }

    #[test]
    fn get_category_succeeds() {
        let connection = get_test_db_connection();
        let inserted_category = test_category("Rent", &connection);

        let selected_category = get_category(inserted_category.id, &connection);

        assert_eq!(Ok(inserted_category), selected_category);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted_category = test_category("Rent", &connection);

        let selected_category = get_category(
            CategoryId::new(inserted_category.id.as_i64() + 123),
            &connection,
        );

        assert_eq!(selected_category, Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories_is_sorted_by_name() {
        let connection = get_test_db_connection();
        let second = test_category("Utilities", &connection);
        let first = test_category("Groceries", &connection);

        let categories = get_all_categories(&connection).expect("Could not get all categories");

        assert_eq!(categories, vec![first, second]);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_db_connection();
        let category = test_category("Original", &connection);

        let new_name = CategoryName::new_unchecked("Updated");
        let new_color = CategoryColor::new_unchecked("#ff0000");
        let result = update_category(
            category.id,
            new_name.clone(),
            new_color.clone(),
            Some("now with a description".to_string()),
            &connection,
        );

        assert!(result.is_ok());

        let updated = get_category(category.id, &connection).expect("Could not get category");
        assert_eq!(updated.name, new_name);
        assert_eq!(updated.color, new_color);
        assert_eq!(
            updated.description.as_deref(),
            Some("now with a description")
        );
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let result = update_category(
            CategoryId::new(999999),
            CategoryName::new_unchecked("Updated"),
            CategoryColor::new_unchecked("#ff0000"),
            None,
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_category_succeeds() {
        let connection = get_test_db_connection();
        let category = test_category("ToDelete", &connection);

        let result = delete_category(category.id, &connection);

        assert!(result.is_ok());
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let result = delete_category(CategoryId::new(999999), &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }

    #[test]
    fn counts_only_transactions_referencing_the_category() {
        let connection = get_test_db_connection();
        let groceries = test_category("Groceries", &connection);
        let rent = test_category("Rent", &connection);

        let today = time::OffsetDateTime::now_utc().date();
        for i in 0..3 {
            create_transaction(
                TransactionBuilder {
                    description: TransactionDescription::new_unchecked(&format!("shop {i}")),
                    amount: -10.0,
                    date: today,
                    category_id: Some(groceries.id),
                    notes: None,
                },
                &connection,
            )
            .expect("Could not create test transaction");
        }
        create_transaction(
            TransactionBuilder {
                description: TransactionDescription::new_unchecked("flat"),
                amount: -500.0,
                date: today,
                category_id: Some(rent.id),
                notes: None,
            },
            &connection,
        )
        .expect("Could not create test transaction");

        assert_eq!(
            count_transactions_with_category(groceries.id, &connection),
            Ok(3)
        );
        assert_eq!(
            count_transactions_with_category(rent.id, &connection),
            Ok(1)
        );
    }
}
