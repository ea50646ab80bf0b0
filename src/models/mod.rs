//! Wire shapes exchanged with the remote authority.

pub mod category;
pub mod transaction;
