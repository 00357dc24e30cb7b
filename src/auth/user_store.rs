//! User Storage
//! Mission: Securely store and manage user accounts with SQLite

use crate::auth::models::{CreateUserRequest, User, UserRole};
use crate::auth::password::{hash_password, verify_password};
use crate::db;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use tracing::info;

/// User storage with SQLite backend
#[derive(Clone)]
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the users table.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn open(&self) -> Result<Connection> {
        db::open(&self.db_path)
    }

    /// Initialize database schema
    fn init_db(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                username TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                hashed_password TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                role TEXT NOT NULL,
                phone_number TEXT
            )",
            [],
        )?;

        Ok(())
    }

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let role_str: String = row.get(7)?;
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            username: row.get(2)?,
            first_name: row.get(3)?,
            last_name: row.get(4)?,
            hashed_password: row.get(5)?,
            is_active: row.get(6)?,
            role: UserRole::from_str(&role_str).unwrap_or(UserRole::User),
            phone_number: row.get(8)?,
        })
    }

    const USER_COLUMNS: &'static str =
        "id, email, username, first_name, last_name, hashed_password, is_active, role, phone_number";

    /// Create a new user with a freshly hashed password.
    ///
    /// Fails on duplicate email or username (UNIQUE constraints).
    pub fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        let hashed_password = hash_password(&request.password)?;

        let conn = self.open()?;
        conn.execute(
            "INSERT INTO users (email, username, first_name, last_name, hashed_password, is_active, role, phone_number)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
            params![
                request.email,
                request.username,
                request.first_name,
                request.last_name,
                hashed_password,
                request.role.as_str(),
                request.phone_number,
            ],
        )
        .context("Failed to insert user")?;

        let id = conn.last_insert_rowid();

        info!("Created user: {} ({})", request.username, request.role.as_str());

        Ok(User {
            id,
            email: request.email.clone(),
            username: request.username.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            hashed_password,
            is_active: true,
            role: request.role,
            phone_number: request.phone_number.clone(),
        })
    }

    /// Get user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.open()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE username = ?1",
            Self::USER_COLUMNS
        ))?;

        match stmt.query_row(params![username], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get user by id
    pub fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.open()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE id = ?1",
            Self::USER_COLUMNS
        ))?;

        match stmt.query_row(params![user_id], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and return the matching user.
    ///
    /// Returns `None` for an unknown username or a wrong password; callers
    /// cannot tell the two apart.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        match self.get_user_by_username(username)? {
            Some(user) => {
                if verify_password(password, &user.hashed_password)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Replace a user's password hash.
    pub fn update_password(&self, user_id: i64, new_password: &str) -> Result<()> {
        let hashed = hash_password(new_password)?;

        let conn = self.open()?;
        let rows = conn.execute(
            "UPDATE users SET hashed_password = ?1 WHERE id = ?2",
            params![hashed, user_id],
        )?;

        if rows == 0 {
            anyhow::bail!("User not found");
        }

        info!("Password updated for user id {}", user_id);
        Ok(())
    }

    /// Update a user's phone number.
    pub fn update_phone_number(&self, user_id: i64, phone_number: &str) -> Result<()> {
        let conn = self.open()?;
        let rows = conn.execute(
            "UPDATE users SET phone_number = ?1 WHERE id = ?2",
            params![phone_number, user_id],
        )?;

        if rows == 0 {
            anyhow::bail!("User not found");
        }

        Ok(())
    }

    /// Delete a user by id. Their todos go with them (ON DELETE CASCADE).
    pub fn delete_user(&self, user_id: i64) -> Result<()> {
        let conn = self.open()?;

        let rows = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;

        if rows == 0 {
            anyhow::bail!("User not found");
        }

        info!("Deleted user id {}", user_id);
        Ok(())
    }
}
