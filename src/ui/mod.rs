/// View layer: one module per page, the auth modal, shared card
/// renderers, the map widget, and remote picture loading.
///
/// Pages follow the same shape: a struct holding the view's fetched
/// state, a local `Message` enum, `open` to mount and start fetches,
/// `update` to apply messages, and `view` to render. Cross-cutting
/// concerns (API handle, session, like board, notices, navigation) reach
/// pages through [`Ctx`].

pub mod auth;
pub mod cards;
pub mod favorites;
pub mod flower_detail;
pub mod flowers;
pub mod home;
pub mod latest_sightings;
pub mod map;
pub mod new_sighting;
pub mod pictures;
pub mod sighting_detail;

use iced::{Color, Task};

use crate::api::models::{FavoriteRecord, Like};
use crate::api::{self, ApiClient, ApiError};
use crate::session::Session;
use crate::state::favorites::{Favorites, ToggleAction};
use crate::state::likes::{LikeBoard, LikeToggle};

/// Brand accent, the pink of the original service.
pub const ACCENT: Color = Color::from_rgb(0.918, 0.655, 0.62);

/// Heart color for the like toggle.
pub fn like_color(liked: bool) -> Color {
    if liked {
        Color::from_rgb(0.87, 0.25, 0.25)
    } else {
        Color::from_rgb(0.55, 0.58, 0.6)
    }
}

/// Where the router can take the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Flowers,
    LatestSightings,
    Favorites,
    FlowerDetail(i64),
    SightingDetail(i64),
    NewSighting { flower_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient, user-visible notification; the desktop counterpart of
/// the original's toasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything a page may touch besides its own state. Built fresh for
/// each update pass; the shell drains `notice` and `goto` afterwards.
pub struct Ctx<'a> {
    pub api: &'a ApiClient,
    pub session: &'a mut Session,
    pub likes: &'a mut LikeBoard,
    pub notice: Option<Notice>,
    pub goto: Option<Route>,
}

impl<'a> Ctx<'a> {
    pub fn new(
        api: &'a ApiClient,
        session: &'a mut Session,
        likes: &'a mut LikeBoard,
    ) -> Self {
        Ctx {
            api,
            session,
            likes,
            notice: None,
            goto: None,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::info(text));
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::success(text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::error(text));
    }

    /// Convert an API failure into a notice. A 401 additionally tears the
    /// session down so the user is prompted to log in again.
    pub fn fail(&mut self, err: &ApiError) {
        if err.is_session_expired() {
            self.session.expire();
            self.likes.reset();
        }
        self.notice = Some(Notice::error(err.to_string()));
    }

    pub fn goto(&mut self, route: Route) {
        self.goto = Some(route);
    }

    /// Gate an action on a live session; raises a notice when there is
    /// none.
    pub fn require_login(&mut self) -> bool {
        if self.session.is_logged_in() {
            true
        } else {
            self.notice = Some(Notice::info("You have to be logged in for that."));
            false
        }
    }

    /// Token and user id together, available once the profile fetch after
    /// login has completed.
    pub fn bearer(&self) -> Option<(String, i64)> {
        match (self.session.token(), self.session.user_id()) {
            (Some(token), Some(user_id)) => Some((token.to_owned(), user_id)),
            _ => None,
        }
    }
}

/// Result of the server call planned by [`toggle_favorite`].
#[derive(Debug, Clone)]
pub enum FavoriteOutcome {
    Added(Result<FavoriteRecord, ApiError>),
    Removed(Result<(), ApiError>),
}

/// Plan and launch the server call for a favorite toggle. Membership
/// decides the direction: present means removal by favorite-record id,
/// absent means adding. Returns `None` (with a notice) when no session
/// is available. Local state is only touched in
/// [`apply_favorite_outcome`], after the server confirms.
pub fn toggle_favorite(
    ctx: &mut Ctx<'_>,
    favorites: &Favorites,
    flower_id: i64,
) -> Option<Task<(i64, FavoriteOutcome)>> {
    if !ctx.require_login() {
        return None;
    }
    let Some((token, user_id)) = ctx.bearer() else {
        ctx.info("Still loading your profile, try again in a moment.");
        return None;
    };

    let client = ctx.api.clone();
    let task = match favorites.toggle_action(flower_id) {
        ToggleAction::Add => Task::perform(
            async move { api::flowers::add_favorite(&client, &token, flower_id, user_id).await },
            move |result| (flower_id, FavoriteOutcome::Added(result)),
        ),
        ToggleAction::Remove { fav_flower_id } => Task::perform(
            async move {
                api::flowers::remove_favorite(&client, &token, flower_id, fav_flower_id).await
            },
            move |result| (flower_id, FavoriteOutcome::Removed(result)),
        ),
    };
    Some(task)
}

/// Apply a confirmed toggle to the collection. A failed request leaves
/// the collection exactly as it was and surfaces a notice.
pub fn apply_favorite_outcome(
    ctx: &mut Ctx<'_>,
    favorites: &mut Favorites,
    flower_id: i64,
    outcome: FavoriteOutcome,
) {
    match outcome {
        FavoriteOutcome::Added(Ok(record)) => {
            favorites.apply_added(flower_id, record.id);
            ctx.success(format!(
                "{} has been added to your favorites!",
                record.flower.name
            ));
        }
        FavoriteOutcome::Removed(Ok(())) => {
            favorites.apply_removed(flower_id);
            ctx.info("Removed from your favorites.");
        }
        FavoriteOutcome::Added(Err(err)) | FavoriteOutcome::Removed(Err(err)) => {
            ctx.fail(&err);
        }
    }
}

/// Result of one step of the like flow.
#[derive(Debug, Clone)]
pub enum LikeOutcome {
    Toggled {
        undo: LikeToggle,
        result: Result<(), ApiError>,
    },
    Reconciled(Result<Vec<Like>, ApiError>),
}

/// Flip the like state optimistically and launch the matching server
/// call. The undo record travels with the result so a failure can be
/// rolled back in [`apply_like_outcome`].
pub fn toggle_like(ctx: &mut Ctx<'_>, sighting_id: i64) -> Option<Task<(i64, LikeOutcome)>> {
    if !ctx.require_login() {
        return None;
    }
    let Some((token, user_id)) = ctx.bearer() else {
        ctx.info("Still loading your profile, try again in a moment.");
        return None;
    };

    let undo = ctx.likes.toggle_optimistic(sighting_id);
    let client = ctx.api.clone();
    Some(Task::perform(
        async move {
            if undo.applied.liked {
                api::sightings::like(&client, &token, sighting_id, user_id).await
            } else {
                api::sightings::unlike(&client, &token, sighting_id, user_id).await
            }
        },
        move |result| (sighting_id, LikeOutcome::Toggled { undo, result }),
    ))
}

/// Advance the like flow: roll back on failure, otherwise fetch the
/// authoritative like list and overwrite the optimistic guess with it.
pub fn apply_like_outcome(
    ctx: &mut Ctx<'_>,
    sighting_id: i64,
    outcome: LikeOutcome,
) -> Task<(i64, LikeOutcome)> {
    match outcome {
        LikeOutcome::Toggled {
            undo,
            result: Err(err),
        } => {
            ctx.likes.rollback(undo);
            ctx.fail(&err);
            Task::none()
        }
        LikeOutcome::Toggled {
            undo,
            result: Ok(()),
        } => {
            if undo.applied.liked {
                ctx.success("Added to likes.");
            } else {
                ctx.info("Removed from likes.");
            }

            let client = ctx.api.clone();
            let token = ctx.session.token().map(str::to_owned);
            Task::perform(
                async move {
                    api::sightings::likes(&client, token.as_deref(), sighting_id).await
                },
                move |result| (sighting_id, LikeOutcome::Reconciled(result)),
            )
        }
        LikeOutcome::Reconciled(Ok(likes)) => {
            ctx.likes
                .reconcile(sighting_id, &likes, ctx.session.user_id());
            Task::none()
        }
        LikeOutcome::Reconciled(Err(err)) => {
            // Keep the optimistic state until the next reconciliation.
            eprintln!("⚠️  Could not refresh likes for sighting {sighting_id}: {err}");
            Task::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Flower;
    use crate::session::store::SessionStore;
    use crate::state::likes::LikeStatus;

    struct Fixture {
        api: ApiClient,
        session: Session,
        likes: LikeBoard,
    }

    impl Fixture {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir()
                .join(format!("flowrspot-ui-{}-{name}", std::process::id()))
                .join("session.json");
            let store = SessionStore::at(path);
            store.clear();
            Fixture {
                api: ApiClient::with_base("https://example.test/api/v1"),
                session: Session::with_store(store),
                likes: LikeBoard::new(),
            }
        }

        fn logged_in(name: &str) -> Self {
            let mut fixture = Self::new(name);
            fixture.session.begin("token-123".into());
            fixture.session.attach_user(&crate::api::models::User {
                id: 9,
                first_name: "Mara".into(),
                last_name: "K".into(),
            });
            fixture
        }

        fn ctx(&mut self) -> Ctx<'_> {
            Ctx::new(&self.api, &mut self.session, &mut self.likes)
        }
    }

    fn record(id: i64, flower_id: i64) -> FavoriteRecord {
        FavoriteRecord {
            id,
            flower: Flower {
                id: flower_id,
                name: format!("Flower {flower_id}"),
                latin_name: String::new(),
                sightings: 0,
                profile_picture: String::new(),
                favorite: false,
                description: String::new(),
                features: Vec::new(),
            },
        }
    }

    #[test]
    fn favorite_toggle_needs_a_session() {
        let mut fixture = Fixture::new("fav-login");
        let favorites = Favorites::new();

        let mut ctx = fixture.ctx();
        let task = toggle_favorite(&mut ctx, &favorites, 42);

        // No request is planned; the user gets a notice instead.
        assert!(task.is_none());
        assert_eq!(ctx.notice.map(|notice| notice.level), Some(NoticeLevel::Info));
    }

    #[test]
    fn confirmed_add_prepends_the_server_record() {
        let mut fixture = Fixture::logged_in("fav-add");
        let mut favorites = Favorites::new();

        let mut ctx = fixture.ctx();
        apply_favorite_outcome(
            &mut ctx,
            &mut favorites,
            42,
            FavoriteOutcome::Added(Ok(record(7, 42))),
        );

        assert!(favorites.is_favorited(42));
        assert_eq!(favorites.record_for(42), Some(7));
        assert_eq!(
            ctx.notice.map(|notice| notice.level),
            Some(NoticeLevel::Success)
        );
    }

    #[test]
    fn failed_favorite_toggle_leaves_state_unchanged() {
        let mut fixture = Fixture::logged_in("fav-fail");
        let mut favorites = Favorites::from_records(&[record(7, 42)]);
        let before = favorites.clone();

        let mut ctx = fixture.ctx();
        apply_favorite_outcome(
            &mut ctx,
            &mut favorites,
            42,
            FavoriteOutcome::Removed(Err(ApiError::Network("timed out".into()))),
        );

        assert_eq!(favorites, before);
        assert_eq!(
            ctx.notice.map(|notice| notice.level),
            Some(NoticeLevel::Error)
        );
    }

    #[test]
    fn failed_like_request_rolls_back_the_optimistic_flip() {
        let mut fixture = Fixture::logged_in("like-fail");
        fixture.likes.seed(5, 3, false);
        let undo = fixture.likes.toggle_optimistic(5);
        assert_eq!(
            fixture.likes.status(5),
            LikeStatus {
                count: 4,
                liked: true
            }
        );

        let mut ctx = fixture.ctx();
        let _ = apply_like_outcome(
            &mut ctx,
            5,
            LikeOutcome::Toggled {
                undo,
                result: Err(ApiError::Network("timed out".into())),
            },
        );

        assert_eq!(
            fixture.likes.status(5),
            LikeStatus {
                count: 3,
                liked: false
            }
        );
    }

    #[test]
    fn reconciliation_overrides_the_optimistic_guess() {
        let mut fixture = Fixture::logged_in("like-reconcile");
        fixture.likes.seed(5, 3, false);
        fixture.likes.toggle_optimistic(5);

        // The server's list has three entries, none of them user 9.
        let server_likes = vec![
            Like { id: 0, user_id: 11 },
            Like { id: 0, user_id: 12 },
            Like { id: 0, user_id: 13 },
        ];
        let mut ctx = fixture.ctx();
        let _ = apply_like_outcome(&mut ctx, 5, LikeOutcome::Reconciled(Ok(server_likes)));

        assert_eq!(
            fixture.likes.status(5),
            LikeStatus {
                count: 3,
                liked: false
            }
        );
    }

    #[test]
    fn a_401_tears_the_session_down() {
        let mut fixture = Fixture::logged_in("expiry");
        let mut favorites = Favorites::new();

        let mut ctx = fixture.ctx();
        apply_favorite_outcome(
            &mut ctx,
            &mut favorites,
            42,
            FavoriteOutcome::Added(Err(ApiError::Unauthorized)),
        );

        assert!(!fixture.session.is_logged_in());
        assert_eq!(fixture.session.token(), None);
    }
}
