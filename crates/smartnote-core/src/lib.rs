//! smartnote-core - Core library for SmartNote
//!
//! This crate contains the note model, the persistent note store, the pure
//! mutation and view-derivation functions, and the AI proxy client shared by
//! all SmartNote interfaces.

pub mod ai;
pub mod error;
pub mod export;
pub mod models;
pub mod mutations;
pub mod store;
pub mod view;

pub use error::{Error, Result};
pub use models::{Note, NoteId};
pub use store::NoteStore;
