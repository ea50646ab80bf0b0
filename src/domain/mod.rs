//! Domain entities and value types shared by every layer of the client.

pub mod category;
pub mod edit_session;
pub mod transaction;
pub mod types;
