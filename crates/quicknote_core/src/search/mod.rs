//! Note search pipeline entry points.
//!
//! # Responsibility
//! - Expose the pure query engine used to filter the note snapshot.
//! - Track search-surface state (`Inactive`/`Active`) for the feed.

pub mod query;
pub mod session;
