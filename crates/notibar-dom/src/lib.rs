//! In-memory document model for transient UI regions.
//!
//! This crate provides the small slice of a page's document structure that a
//! status display needs:
//! - A [`Document`] registry that maps unique identifiers to elements.
//! - [`ElementHandle`]s with text content and a [`Display`] toggle.
//! - Mutation observation through [`Document::subscribe`].
//! - HTML rendering of elements, with text escaped so it shows literally.
//!
//! # Sharing
//! Handles are cheap clones over shared state. Locks are only held for a
//! single field update, never across an `.await`.

pub mod document;
pub mod element;

pub use document::Document;
pub use element::{Display, ElementHandle, ElementSnapshot, Mutation, MutationKind};

/// Capacity of the mutation broadcast channel. Observers that fall further
/// behind than this skip the oldest records.
pub const MUTATION_BUFFER: usize = 64;

/// Errors that can occur while addressing elements of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// No element with the requested identifier is registered in the
    /// document.
    #[error("element `{id}` not found")]
    ElementNotFound {
        /// The identifier that was looked up.
        id: String,
    },
    /// An element with this identifier already exists. Identifiers are unique
    /// within a document.
    #[error("element `{id}` already exists")]
    DuplicateId {
        /// The identifier that was registered twice.
        id: String,
    },
}
