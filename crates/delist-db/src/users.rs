//! User record operations.
//!
//! Users are created once at onboarding and never updated afterwards; the
//! rest of the system references them by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};

/// A registered user's identity and address profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address (unique across users)
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Date of birth, free-form string as supplied at onboarding
    pub date_of_birth: String,
    /// Current street address
    pub current_address: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// ZIP code
    pub zip_code: String,
    /// Optional free-text previous addresses
    pub previous_addresses: Option<String>,
    /// When the user registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The user's full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields supplied when registering a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Date of birth
    pub date_of_birth: String,
    /// Current street address
    pub current_address: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// ZIP code
    pub zip_code: String,
    /// Optional free-text previous addresses
    #[serde(default)]
    pub previous_addresses: Option<String>,
}

/// Create a new user.
///
/// # Errors
/// Returns `sqlx::Error` if the insert fails (including on a duplicate
/// email, which violates the unique constraint).
pub async fn create_user(pool: &Pool<Sqlite>, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = delist_core::types::new_record_id();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO users (id, first_name, last_name, email, phone, date_of_birth,
                            current_address, city, state, zip_code, previous_addresses, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.email)
    .bind(&new_user.phone)
    .bind(&new_user.date_of_birth)
    .bind(&new_user.current_address)
    .bind(&new_user.city)
    .bind(&new_user.state)
    .bind(&new_user.zip_code)
    .bind(&new_user.previous_addresses)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(User {
        id,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        email: new_user.email,
        phone: new_user.phone,
        date_of_birth: new_user.date_of_birth,
        current_address: new_user.current_address,
        city: new_user.city,
        state: new_user.state,
        zip_code: new_user.zip_code,
        previous_addresses: new_user.previous_addresses,
        created_at,
    })
}

/// Get a user by id.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_user(pool: &Pool<Sqlite>, id: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(parse_user_from_row).transpose()
}

/// Get a user by email address.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_user_by_email(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.map(parse_user_from_row).transpose()
}

fn parse_user_from_row(row: sqlx::sqlite::SqliteRow) -> Result<User, sqlx::Error> {
    let created_at_str: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);

    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        date_of_birth: row.try_get("date_of_birth")?,
        current_address: row.try_get("current_address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zip_code: row.try_get("zip_code")?,
        previous_addresses: row.try_get("previous_addresses")?,
        created_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Database;

    pub(crate) fn sample_user() -> NewUser {
        NewUser {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: "1985-06-15".to_string(),
            current_address: "123 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            previous_addresses: None,
        }
    }

    async fn setup_test_db() -> Database {
        let db = Database::new(":memory:", 1).await.expect("create database");
        db.run_migrations().await.expect("run migrations");
        db
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = setup_test_db().await;

        let user = create_user(db.pool(), sample_user()).await.expect("create");
        assert_eq!(user.full_name(), "John Doe");

        let loaded = get_user(db.pool(), &user.id)
            .await
            .expect("query")
            .expect("user exists");
        assert_eq!(loaded.email, "john@example.com");
        assert_eq!(loaded.created_at, user.created_at);
    }

    #[tokio::test]
    async fn test_get_user_by_email() {
        let db = setup_test_db().await;

        create_user(db.pool(), sample_user()).await.expect("create");

        let found = get_user_by_email(db.pool(), "john@example.com")
            .await
            .expect("query");
        assert!(found.is_some());

        let missing = get_user_by_email(db.pool(), "nobody@example.com")
            .await
            .expect("query");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = setup_test_db().await;

        create_user(db.pool(), sample_user()).await.expect("create");
        let result = create_user(db.pool(), sample_user()).await;
        assert!(result.is_err());
    }
}
