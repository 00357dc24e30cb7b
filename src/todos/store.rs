//! Todo Storage
//! Mission: Ownership-scoped todo persistence with SQLite

use crate::db;
use crate::todos::models::{Todo, TodoRequest, TodoStats};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use tracing::info;

/// Todo storage with SQLite backend.
///
/// Every non-admin operation filters by owner_id, so a caller can neither
/// observe nor mutate another user's rows. A missing row and a foreign row
/// look the same to the caller.
#[derive(Clone)]
pub struct TodoStore {
    db_path: String,
}

impl TodoStore {
    /// Create a new todo store and initialize the todos table.
    ///
    /// The users table must exist first (owner_id references it).
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

    fn init_db(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                priority INTEGER NOT NULL,
                complete INTEGER NOT NULL DEFAULT 0,
                owner_id INTEGER NOT NULL,
                FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
            )",
            [],
        )?;

        Ok(())
    }

    fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
        Ok(Todo {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            priority: row.get(3)?,
            complete: row.get(4)?,
            owner_id: row.get(5)?,
        })
    }

    /// List all todos belonging to one user.
    pub fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Todo>> {
        let conn = self.open()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, description, priority, complete, owner_id
             FROM todos WHERE owner_id = ?1 ORDER BY id",
        )?;

        let todos = stmt
            .query_map(params![owner_id], Self::row_to_todo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(todos)
    }

    /// Get a single todo if it exists and belongs to the given user.
    pub fn get_for_owner(&self, todo_id: i64, owner_id: i64) -> Result<Option<Todo>> {
        let conn = self.open()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, description, priority, complete, owner_id
             FROM todos WHERE id = ?1 AND owner_id = ?2",
        )?;

        match stmt.query_row(params![todo_id, owner_id], Self::row_to_todo) {
            Ok(todo) => Ok(Some(todo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a new todo owned by the given user.
    pub fn create(&self, request: &TodoRequest, owner_id: i64) -> Result<Todo> {
        let conn = self.open()?;

        conn.execute(
            "INSERT INTO todos (title, description, priority, complete, owner_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                request.title,
                request.description,
                request.priority,
                request.complete,
                owner_id,
            ],
        )
        .context("Failed to insert todo")?;

        let id = conn.last_insert_rowid();

        info!("Created todo {} for user {}", id, owner_id);

        Ok(Todo {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            priority: request.priority,
            complete: request.complete,
            owner_id,
        })
    }

    /// Full update of an owned todo. Returns false when the row is absent or
    /// owned by someone else.
    pub fn update_for_owner(
        &self,
        todo_id: i64,
        owner_id: i64,
        request: &TodoRequest,
    ) -> Result<bool> {
        let conn = self.open()?;

        let rows = conn.execute(
            "UPDATE todos SET title = ?1, description = ?2, priority = ?3, complete = ?4
             WHERE id = ?5 AND owner_id = ?6",
            params![
                request.title,
                request.description,
                request.priority,
                request.complete,
                todo_id,
                owner_id,
            ],
        )?;

        Ok(rows > 0)
    }

    /// Delete an owned todo. Returns false when absent or foreign.
    pub fn delete_for_owner(&self, todo_id: i64, owner_id: i64) -> Result<bool> {
        let conn = self.open()?;

        let rows = conn.execute(
            "DELETE FROM todos WHERE id = ?1 AND owner_id = ?2",
            params![todo_id, owner_id],
        )?;

        Ok(rows > 0)
    }

    /// Flip the completion flag of an owned todo and return the new state.
    pub fn toggle_for_owner(&self, todo_id: i64, owner_id: i64) -> Result<Option<Todo>> {
        let conn = self.open()?;

        let rows = conn.execute(
            "UPDATE todos SET complete = NOT complete WHERE id = ?1 AND owner_id = ?2",
            params![todo_id, owner_id],
        )?;

        if rows == 0 {
            return Ok(None);
        }

        drop(conn);
        self.get_for_owner(todo_id, owner_id)
    }

    /// Aggregate completion statistics for one user's todos.
    pub fn stats_for_owner(&self, owner_id: i64) -> Result<TodoStats> {
        let conn = self.open()?;

        let (total, completed): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(complete), 0) FROM todos WHERE owner_id = ?1",
            params![owner_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let completion_rate = if total > 0 {
            let rate = completed as f64 / total as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(TodoStats {
            total_todos: total,
            completed_todos: completed,
            pending_todos: total - completed,
            completion_rate,
        })
    }

    /// List every todo regardless of owner (admin only).
    pub fn list_all(&self) -> Result<Vec<Todo>> {
        let conn = self.open()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, description, priority, complete, owner_id
             FROM todos ORDER BY id",
        )?;

        let todos = stmt
            .query_map([], Self::row_to_todo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(todos)
    }

    /// Delete any todo regardless of owner (admin only). Returns false when
    /// absent.
    pub fn delete_any(&self, todo_id: i64) -> Result<bool> {
        let conn = self.open()?;

        let rows = conn.execute("DELETE FROM todos WHERE id = ?1", params![todo_id])?;

        if rows > 0 {
            info!("Admin deleted todo {}", todo_id);
        }

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{CreateUserRequest, UserRole};
    use crate::auth::user_store::UserStore;
    use tempfile::NamedTempFile;

    fn test_request(title: &str, priority: i64, complete: bool) -> TodoRequest {
        TodoRequest {
            title: title.to_string(),
            description: "Need to learn everyday".to_string(),
            priority,
            complete,
        }
    }

    /// Users table must exist for the owner_id foreign key, so both stores
    /// share one temp database.
    fn create_test_stores() -> (UserStore, TodoStore, i64, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();

        let users = UserStore::new(db_path).unwrap();
        let todos = TodoStore::new(db_path).unwrap();

        let owner = users
            .create_user(&CreateUserRequest {
                email: "alice@example.com".to_string(),
                username: "alice".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Smith".to_string(),
                password: "testpassword".to_string(),
                role: UserRole::User,
                phone_number: None,
            })
            .unwrap();

        (users, todos, owner.id, temp_file)
    }

    fn second_user(users: &UserStore) -> i64 {
        users
            .create_user(&CreateUserRequest {
                email: "bob@example.com".to_string(),
                username: "bob".to_string(),
                first_name: "Bob".to_string(),
                last_name: "Jones".to_string(),
                password: "testpassword".to_string(),
                role: UserRole::User,
                phone_number: None,
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_create_and_list() {
        let (_users, todos, owner, _temp) = create_test_stores();

        assert!(todos.list_for_owner(owner).unwrap().is_empty());

        let created = todos.create(&test_request("Learn to code", 5, false), owner).unwrap();
        assert_eq!(created.owner_id, owner);

        let listed = todos.list_for_owner(owner).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Learn to code");
    }

    #[test]
    fn test_ownership_scoping() {
        let (users, todos, alice, _temp) = create_test_stores();
        let bob = second_user(&users);

        let todo = todos.create(&test_request("Alice's todo", 3, false), alice).unwrap();

        // Bob cannot see, update, delete, or toggle Alice's todo
        assert!(todos.get_for_owner(todo.id, bob).unwrap().is_none());
        assert!(!todos
            .update_for_owner(todo.id, bob, &test_request("Hijacked", 1, true))
            .unwrap());
        assert!(!todos.delete_for_owner(todo.id, bob).unwrap());
        assert!(todos.toggle_for_owner(todo.id, bob).unwrap().is_none());

        // Alice still sees her unchanged todo
        let mine = todos.get_for_owner(todo.id, alice).unwrap().unwrap();
        assert_eq!(mine.title, "Alice's todo");
        assert!(!mine.complete);
    }

    #[test]
    fn test_update_and_delete() {
        let (_users, todos, owner, _temp) = create_test_stores();
        let todo = todos.create(&test_request("Original", 2, false), owner).unwrap();

        assert!(todos
            .update_for_owner(todo.id, owner, &test_request("Updated", 4, true))
            .unwrap());

        let updated = todos.get_for_owner(todo.id, owner).unwrap().unwrap();
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.priority, 4);
        assert!(updated.complete);

        assert!(todos.delete_for_owner(todo.id, owner).unwrap());
        assert!(todos.get_for_owner(todo.id, owner).unwrap().is_none());

        // Second delete is a miss
        assert!(!todos.delete_for_owner(todo.id, owner).unwrap());
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (_users, todos, owner, _temp) = create_test_stores();
        let todo = todos.create(&test_request("Toggle me", 1, false), owner).unwrap();

        let once = todos.toggle_for_owner(todo.id, owner).unwrap().unwrap();
        assert!(once.complete);

        let twice = todos.toggle_for_owner(todo.id, owner).unwrap().unwrap();
        assert!(!twice.complete);
    }

    #[test]
    fn test_stats() {
        let (_users, todos, owner, _temp) = create_test_stores();

        // Empty store
        let empty = todos.stats_for_owner(owner).unwrap();
        assert_eq!(empty.total_todos, 0);
        assert_eq!(empty.completion_rate, 0.0);

        todos.create(&test_request("Todo 1", 1, true), owner).unwrap();
        todos.create(&test_request("Todo 2", 2, false), owner).unwrap();
        todos.create(&test_request("Todo 3", 3, true), owner).unwrap();

        let stats = todos.stats_for_owner(owner).unwrap();
        assert_eq!(stats.total_todos, 3);
        assert_eq!(stats.completed_todos, 2);
        assert_eq!(stats.pending_todos, 1);
        assert_eq!(stats.completion_rate, 66.67);
    }

    #[test]
    fn test_admin_operations() {
        let (users, todos, alice, _temp) = create_test_stores();
        let bob = second_user(&users);

        todos.create(&test_request("Alice's", 1, false), alice).unwrap();
        let bobs = todos.create(&test_request("Bob's", 2, false), bob).unwrap();

        // Admin sees everything
        assert_eq!(todos.list_all().unwrap().len(), 2);

        // Admin deletes across owners
        assert!(todos.delete_any(bobs.id).unwrap());
        assert!(!todos.delete_any(bobs.id).unwrap());
        assert_eq!(todos.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_deleting_user_cascades_todos() {
        let (users, todos, alice, _temp) = create_test_stores();
        let bob = second_user(&users);

        todos.create(&test_request("Alice's", 1, false), alice).unwrap();
        todos.create(&test_request("Bob's", 2, false), bob).unwrap();

        users.delete_user(alice).unwrap();

        let remaining = todos.list_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].owner_id, bob);
    }
}
