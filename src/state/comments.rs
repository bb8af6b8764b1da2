/// Client-side pagination over a fully-fetched comment list.
///
/// The server ignores pagination parameters, so the thread holds every
/// comment and reveals them in fixed-size pages. "Show more" only moves
/// the window over data already in memory; it never refetches. Deletion
/// is allowed client-side only for the comment's author — the caller
/// checks with [`CommentThread::can_delete`] before issuing any request,
/// and applies [`CommentThread::remove`] after the server confirms.
use thiserror::Error;

use crate::api::models::Comment;

pub const COMMENTS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("You can only delete your own comments.")]
    NotAuthor,
    #[error("That comment is gone already.")]
    NotFound,
}

#[derive(Debug, Clone)]
pub struct CommentThread {
    all: Vec<Comment>,
    visible: usize,
    page_size: usize,
}

impl Default for CommentThread {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentThread {
    pub fn new() -> Self {
        Self::with_page_size(COMMENTS_PER_PAGE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        CommentThread {
            all: Vec::new(),
            visible: 0,
            page_size: page_size.max(1),
        }
    }

    /// Replace the thread with a freshly fetched list, showing the first
    /// page.
    pub fn load(&mut self, comments: Vec<Comment>) {
        self.visible = comments.len().min(self.page_size);
        self.all = comments;
    }

    pub fn visible(&self) -> &[Comment] {
        &self.all[..self.visible]
    }

    pub fn total(&self) -> usize {
        self.all.len()
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.all.len()
    }

    /// Reveal the next page from the already-fetched set.
    pub fn show_more(&mut self) {
        self.visible = (self.visible + self.page_size).min(self.all.len());
    }

    /// Prepend a newly created comment to both the full and visible sets.
    pub fn prepend(&mut self, comment: Comment) {
        self.all.insert(0, comment);
        self.visible = (self.visible + 1).min(self.all.len());
    }

    /// Whether `acting_user` may delete the comment. Only the author may;
    /// the server re-checks regardless.
    pub fn can_delete(&self, comment_id: i64, acting_user: i64) -> Result<(), CommentError> {
        let comment = self
            .all
            .iter()
            .find(|comment| comment.id == comment_id)
            .ok_or(CommentError::NotFound)?;

        if comment.user_id == acting_user {
            Ok(())
        } else {
            Err(CommentError::NotAuthor)
        }
    }

    /// Drop a comment after the server confirmed the deletion.
    pub fn remove(&mut self, comment_id: i64) -> Option<Comment> {
        let index = self.all.iter().position(|comment| comment.id == comment_id)?;
        let removed = self.all.remove(index);
        if index < self.visible {
            self.visible -= 1;
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: i64, user_id: i64) -> Comment {
        Comment {
            id,
            sighting_id: 5,
            user_id,
            user_full_name: format!("User {user_id}"),
            content: format!("comment {id}"),
            created_at: None,
        }
    }

    fn thread_of(count: i64, page_size: usize) -> CommentThread {
        let mut thread = CommentThread::with_page_size(page_size);
        thread.load((0..count).map(|id| comment(id, 1)).collect());
        thread
    }

    #[test]
    fn load_shows_the_first_page() {
        let thread = thread_of(25, 10);
        assert_eq!(thread.visible().len(), 10);
        assert_eq!(thread.total(), 25);
        assert!(thread.has_more());
    }

    #[test]
    fn show_more_reveals_without_exceeding_the_total() {
        let mut thread = thread_of(25, 10);

        thread.show_more();
        assert_eq!(thread.visible().len(), 20);

        thread.show_more();
        assert_eq!(thread.visible().len(), 25);
        assert!(!thread.has_more());

        // Further requests stay pinned at the fetched total.
        thread.show_more();
        assert_eq!(thread.visible().len(), 25);
    }

    #[test]
    fn short_threads_have_no_more_pages() {
        let thread = thread_of(3, 10);
        assert_eq!(thread.visible().len(), 3);
        assert!(!thread.has_more());
    }

    #[test]
    fn prepend_grows_both_sets_by_one() {
        let mut thread = thread_of(25, 10);
        thread.prepend(comment(100, 9));

        assert_eq!(thread.total(), 26);
        assert_eq!(thread.visible().len(), 11);
        assert_eq!(thread.visible()[0].id, 100);
    }

    #[test]
    fn only_the_author_may_delete() {
        let mut thread = CommentThread::new();
        thread.load(vec![comment(1, 9), comment(2, 12)]);

        assert_eq!(thread.can_delete(1, 9), Ok(()));
        assert_eq!(thread.can_delete(2, 9), Err(CommentError::NotAuthor));
        assert_eq!(thread.can_delete(99, 9), Err(CommentError::NotFound));
    }

    #[test]
    fn remove_shrinks_the_visible_window() {
        let mut thread = thread_of(12, 10);

        assert!(thread.remove(3).is_some());
        assert_eq!(thread.total(), 11);
        assert_eq!(thread.visible().len(), 9);

        // Removing beyond the visible window leaves it alone.
        assert!(thread.remove(11).is_some());
        assert_eq!(thread.visible().len(), 9);
        assert_eq!(thread.total(), 10);
    }

    #[test]
    fn remove_unknown_comment_is_a_noop() {
        let mut thread = thread_of(2, 10);
        assert!(thread.remove(99).is_none());
        assert_eq!(thread.total(), 2);
    }
}
