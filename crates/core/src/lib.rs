//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the repository traits declared here and
//! implemented by the db crate.
//!
//! # Modules
//!
//! - `accounts` - Account type taxonomy (normal side, root type, statement placement)
//! - `items` - Item validation and persistence rules
//! - `reports` - Transactions-by-contact aggregation and table row composition
//! - `actions` - Client state-store action contract

pub mod accounts;
pub mod actions;
pub mod items;
pub mod reports;
