/// State-synchronization logic shared by every view.
///
/// This module handles:
/// - Favorites membership and toggle planning (favorites.rs)
/// - Optimistic like toggling, rollback, and reconciliation (likes.rs)
/// - Client-side comment pagination (comments.rs)
/// - Generation guards against stale fetches (fetch.rs)

pub mod comments;
pub mod favorites;
pub mod fetch;
pub mod likes;
