//! Todo Models
//! Mission: Define todo rows and request/response payloads

use serde::{Deserialize, Serialize};

/// Todo row, always owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
    pub owner_id: i64,
}

/// Create/update request body for a todo
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    pub priority: i64,
    #[serde(default)]
    pub complete: bool,
}

impl TodoRequest {
    /// Check field constraints: title >= 3 chars, description 3..=100 chars,
    /// priority 1..=5.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.chars().count() < 3 {
            return Err("Title must be at least 3 characters.".to_string());
        }
        let desc_len = self.description.chars().count();
        if !(3..=100).contains(&desc_len) {
            return Err("Description must be between 3 and 100 characters.".to_string());
        }
        if !(1..=5).contains(&self.priority) {
            return Err("Priority must be between 1 and 5.".to_string());
        }
        Ok(())
    }
}

/// Per-user todo statistics - GET /todos/stats
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TodoStats {
    pub total_todos: i64,
    pub completed_todos: i64,
    pub pending_todos: i64,
    pub completion_rate: f64, // percent, rounded to 2 decimals
}

/// Toggle response - PATCH /todos/todo/{id}/toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: i64,
    pub complete: bool,
    pub message: String,
}
