//! User accounts and credentials

use crate::is_unique_violation;
use chrono::Utc;
use devconnector_core::{
    error::Result,
    types::{normalize_email, CreateUser, User, UserId},
    CoreError,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const USER_COLUMNS: &str = "id, name, email, password_hash, avatar, created_at";

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        avatar: row.try_get("avatar")?,
        date: row.try_get("created_at")?,
    })
}

/// Create a new user
///
/// The email is stored normalized; a second account with the same address
/// fails with `Duplicate` on the `email` field and nothing is written.
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let id = UserId::generate();
    let email = normalize_email(&user.email);
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, avatar, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user.name.trim())
    .bind(&email)
    .bind(&user.password_hash)
    .bind(&user.avatar)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "users.email") {
            CoreError::duplicate("email", "Email already exists")
        } else {
            CoreError::from(e)
        }
    })?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| CoreError::storage("Failed to retrieve created user"))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Find user by email (case-insensitive)
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY name"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(user_from_row).collect()
}

/// Delete a user and their profile in one transaction
///
/// Posts and comments keep their denormalized author fields and survive.
pub async fn delete_account(pool: &SqlitePool, id: &UserId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM profiles WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        tx.rollback().await?;
        return Err(CoreError::not_found("user", id.as_str()));
    }

    tx.commit().await?;
    Ok(())
}
