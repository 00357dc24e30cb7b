//! Todos Module
//! Mission: Ownership-scoped todo records and their API surface

pub mod api;
pub mod models;
pub mod store;

pub use api::TodosState;
pub use store::TodoStore;
