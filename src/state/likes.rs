/// Per-sighting like state: optimistic toggling with rollback, and
/// reconciliation against the server's like list.
///
/// The board is one of the two process-wide contexts; it lives for the
/// whole application session so every view shows the same numbers, and
/// is reset only on logout or storage clear. A toggle flips the local
/// state immediately and returns an undo record; the caller rolls back
/// with it if the request fails, and otherwise reconciles with the
/// authoritative like list, which always wins over the optimistic guess.
use std::collections::HashMap;

use crate::api::models::Like;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeStatus {
    pub count: u32,
    pub liked: bool,
}

/// Undo record for one optimistic toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    sighting_id: i64,
    previous: LikeStatus,
    /// The state the toggle moved to; `liked` here decides whether the
    /// caller must hit the like or the unlike endpoint.
    pub applied: LikeStatus,
}

impl LikeToggle {
    pub fn sighting_id(&self) -> i64 {
        self.sighting_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct LikeBoard {
    statuses: HashMap<i64, LikeStatus>,
}

impl LikeBoard {
    pub fn new() -> Self {
        LikeBoard::default()
    }

    pub fn status(&self, sighting_id: i64) -> LikeStatus {
        self.statuses.get(&sighting_id).copied().unwrap_or_default()
    }

    /// Record server-reported numbers the first time a view sees a
    /// sighting. Existing entries are kept; they may already reflect a
    /// reconciliation newer than the list payload.
    pub fn seed(&mut self, sighting_id: i64, count: u32, liked: bool) {
        self.statuses
            .entry(sighting_id)
            .or_insert(LikeStatus { count, liked });
    }

    /// Flip the liked flag and adjust the count immediately; returns the
    /// undo record the caller needs for rollback on request failure.
    pub fn toggle_optimistic(&mut self, sighting_id: i64) -> LikeToggle {
        let previous = self.status(sighting_id);
        let applied = if previous.liked {
            LikeStatus {
                count: previous.count.saturating_sub(1),
                liked: false,
            }
        } else {
            LikeStatus {
                count: previous.count + 1,
                liked: true,
            }
        };

        self.statuses.insert(sighting_id, applied);
        LikeToggle {
            sighting_id,
            previous,
            applied,
        }
    }

    /// Compensate a failed request: restore the state captured before the
    /// optimistic flip.
    pub fn rollback(&mut self, undo: LikeToggle) {
        self.statuses.insert(undo.sighting_id, undo.previous);
    }

    /// Overwrite with server truth. The count is the length of the like
    /// list and the flag is whether the current user appears in it, no
    /// matter what the optimistic step computed.
    pub fn reconcile(
        &mut self,
        sighting_id: i64,
        likes: &[Like],
        current_user: Option<i64>,
    ) -> LikeStatus {
        let status = LikeStatus {
            count: likes.len() as u32,
            liked: current_user
                .map(|user_id| likes.iter().any(|like| like.user_id == user_id))
                .unwrap_or(false),
        };
        self.statuses.insert(sighting_id, status);
        status
    }

    /// Teardown on logout or storage clear.
    pub fn reset(&mut self) {
        self.statuses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn likes_of(user_ids: &[i64]) -> Vec<Like> {
        user_ids
            .iter()
            .map(|&user_id| Like { id: 0, user_id })
            .collect()
    }

    #[test]
    fn optimistic_toggle_flips_flag_and_count() {
        let mut board = LikeBoard::new();
        board.seed(5, 3, false);

        let undo = board.toggle_optimistic(5);
        assert_eq!(
            board.status(5),
            LikeStatus {
                count: 4,
                liked: true
            }
        );
        assert_eq!(undo.applied.liked, true);

        board.toggle_optimistic(5);
        assert_eq!(
            board.status(5),
            LikeStatus {
                count: 3,
                liked: false
            }
        );
    }

    #[test]
    fn rollback_restores_the_previous_state() {
        let mut board = LikeBoard::new();
        board.seed(5, 3, false);

        let undo = board.toggle_optimistic(5);
        board.rollback(undo);
        assert_eq!(
            board.status(5),
            LikeStatus {
                count: 3,
                liked: false
            }
        );
    }

    #[test]
    fn reconciliation_always_wins() {
        // Sighting 5: likesCount=3, not liked. The optimistic step guesses
        // (4, true); the server's list has only 3 entries, none of them
        // ours. Final state must be (3, false).
        let mut board = LikeBoard::new();
        board.seed(5, 3, false);

        board.toggle_optimistic(5);
        assert_eq!(
            board.status(5),
            LikeStatus {
                count: 4,
                liked: true
            }
        );

        let server_likes = likes_of(&[11, 12, 13]);
        let status = board.reconcile(5, &server_likes, Some(9));
        assert_eq!(
            status,
            LikeStatus {
                count: 3,
                liked: false
            }
        );
        assert_eq!(board.status(5), status);
    }

    #[test]
    fn reconciliation_counts_the_server_list() {
        let mut board = LikeBoard::new();
        let status = board.reconcile(5, &likes_of(&[9, 11]), Some(9));
        assert_eq!(
            status,
            LikeStatus {
                count: 2,
                liked: true
            }
        );
    }

    #[test]
    fn unliking_at_zero_does_not_underflow() {
        let mut board = LikeBoard::new();
        board.statuses.insert(
            5,
            LikeStatus {
                count: 0,
                liked: true,
            },
        );

        board.toggle_optimistic(5);
        assert_eq!(board.status(5).count, 0);
    }

    #[test]
    fn seed_does_not_clobber_existing_state() {
        let mut board = LikeBoard::new();
        board.reconcile(5, &likes_of(&[9]), Some(9));

        // A list payload arriving later must not undo the reconciliation.
        board.seed(5, 0, false);
        assert_eq!(
            board.status(5),
            LikeStatus {
                count: 1,
                liked: true
            }
        );
    }

    #[test]
    fn reset_clears_every_sighting() {
        let mut board = LikeBoard::new();
        board.seed(5, 3, true);
        board.reset();
        assert_eq!(board.status(5), LikeStatus::default());
    }
}
