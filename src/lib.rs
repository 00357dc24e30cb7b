//! Todo API Backend Library
//!
//! Exposes core modules for use by the server binary and integration tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod middleware;
pub mod todos;
