//! Client-side synchronization layer of the wallet app.
//!
//! Keeps a local collection of transactions and a category hierarchy in step
//! with a remote authority. Mutations are applied optimistically and rolled
//! back when the authority refuses them.
//!
//! The `data` feature exposes only the domain types, DTOs and wire models; the
//! `client` feature adds the store, services, forms and repository traits.

pub mod domain;
pub mod dto;
pub mod models;

#[cfg(feature = "client")]
pub mod error_conversions;
#[cfg(feature = "client")]
pub mod forms;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod services;
#[cfg(feature = "client")]
pub mod settings;
#[cfg(feature = "client")]
pub mod store;
