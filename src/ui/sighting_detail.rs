/// Sighting detail page: the photo and description, a read-only map of
/// where it was spotted, the like toggle, and the comment thread.
use iced::widget::image::Handle;
use iced::widget::{
    button, canvas, column, container, horizontal_space, image, row, scrollable, text,
    text_input,
};
use iced::{Alignment, ContentFit, Element, Length, Task};

use crate::api::models::{Comment, Like, Sighting};
use crate::api::{self, ApiError};
use crate::geo::{self, Coordinates};
use crate::state::comments::CommentThread;
use crate::state::fetch::{Generation, Lifetime};
use crate::state::likes::LikeBoard;
use crate::ui::{self, like_color, map, pictures, Ctx, LikeOutcome, Route, ACCENT};

pub struct SightingDetail {
    sighting_id: i64,
    sighting: Option<Sighting>,
    comments: CommentThread,
    comments_count: u32,
    new_comment: String,
    map: Option<map::MapView>,
    picture: Option<Handle>,
    place: Option<String>,
    posting_comment: bool,
    loading: bool,
    error: Option<String>,
    lifetime: Lifetime,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Generation, Result<Sighting, ApiError>),
    LikesLoaded(Generation, Result<Vec<Like>, ApiError>),
    CommentsLoaded(Generation, Result<Vec<Comment>, ApiError>),
    PictureLoaded(Generation, Result<Handle, String>),
    PlaceResolved(Generation, String),
    Map(map::Event),
    ToggleLike,
    Like((i64, LikeOutcome)),
    CommentChanged(String),
    SubmitComment,
    CommentCreated(Generation, Result<Comment, ApiError>),
    ShowMoreComments,
    DeleteComment(i64),
    CommentDeleted(Generation, i64, Result<(), ApiError>),
    DeleteSighting,
    SightingDeleted(Result<(), ApiError>),
}

impl SightingDetail {
    pub fn sighting_id(&self) -> i64 {
        self.sighting_id
    }

    pub fn open(ctx: &Ctx<'_>, sighting_id: i64) -> (Self, Task<Message>) {
        let mut page = SightingDetail {
            sighting_id,
            sighting: None,
            comments: CommentThread::new(),
            comments_count: 0,
            new_comment: String::new(),
            map: None,
            picture: None,
            place: None,
            posting_comment: false,
            loading: true,
            error: None,
            lifetime: Lifetime::new(),
        };
        let generation = page.lifetime.renew();

        let client = ctx.api.clone();
        let mut tasks = vec![Task::perform(
            async move { api::sightings::detail(&client, sighting_id).await },
            move |result| Message::Loaded(generation, result),
        )];

        let client = ctx.api.clone();
        let token = ctx.session.token().map(str::to_owned);
        tasks.push(Task::perform(
            async move { api::sightings::likes(&client, token.as_deref(), sighting_id).await },
            move |result| Message::LikesLoaded(generation, result),
        ));

        let client = ctx.api.clone();
        tasks.push(Task::perform(
            async move { api::comments::list(&client, sighting_id).await },
            move |result| Message::CommentsLoaded(generation, result),
        ));

        (page, Task::batch(tasks))
    }

    pub fn update(&mut self, message: Message, ctx: &mut Ctx<'_>) -> Task<Message> {
        match message {
            Message::Loaded(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                self.loading = false;
                match result {
                    Ok(sighting) => {
                        ctx.likes.seed(sighting.id, sighting.likes_count, false);
                        self.comments_count = sighting.comments_count;

                        let coords =
                            Coordinates::new(sighting.latitude, sighting.longitude);
                        self.map = Some(map::MapView::read_only(coords));

                        let mut tasks = Vec::new();
                        if !sighting.picture.is_empty() {
                            let http = ctx.api.http().clone();
                            let url = sighting.picture.clone();
                            tasks.push(Task::perform(
                                async move {
                                    pictures::load(http, url, pictures::DISPLAY_MAX_DIM).await
                                },
                                move |result| Message::PictureLoaded(generation, result),
                            ));
                        }

                        let http = ctx.api.http().clone();
                        tasks.push(Task::perform(
                            async move { geo::place_label(&http, coords).await },
                            move |place| Message::PlaceResolved(generation, place),
                        ));

                        self.sighting = Some(sighting);
                        Task::batch(tasks)
                    }
                    Err(err) => {
                        self.error = Some(err.to_string());
                        ctx.fail(&err);
                        Task::none()
                    }
                }
            }

            Message::LikesLoaded(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(likes) => {
                        ctx.likes
                            .reconcile(self.sighting_id, &likes, ctx.session.user_id());
                    }
                    Err(err) => eprintln!("⚠️  Could not fetch likes: {err}"),
                }
                Task::none()
            }

            Message::CommentsLoaded(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(comments) => self.comments.load(comments),
                    Err(err) => eprintln!("⚠️  Could not fetch comments: {err}"),
                }
                Task::none()
            }

            Message::PictureLoaded(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(handle) => self.picture = Some(handle),
                    Err(err) => eprintln!("⚠️  Sighting picture unavailable: {err}"),
                }
                Task::none()
            }

            Message::PlaceResolved(generation, place) => {
                if self.lifetime.is_current(generation) {
                    self.place = Some(place);
                }
                Task::none()
            }

            Message::Map(event) => {
                if let Some(map) = &mut self.map {
                    match event {
                        map::Event::Panned(delta) => map.pan(delta),
                        map::Event::Zoomed(delta) => map.zoom(delta),
                        // The detail map never captures coordinates.
                        map::Event::Picked(_) => {}
                    }
                }
                Task::none()
            }

            Message::ToggleLike => match ui::toggle_like(ctx, self.sighting_id) {
                Some(task) => task.map(Message::Like),
                None => Task::none(),
            },

            Message::Like((sighting_id, outcome)) => {
                ui::apply_like_outcome(ctx, sighting_id, outcome).map(Message::Like)
            }

            Message::CommentChanged(content) => {
                self.new_comment = content;
                Task::none()
            }

            Message::SubmitComment => {
                if !ctx.require_login() {
                    return Task::none();
                }
                if self.new_comment.trim().is_empty() {
                    ctx.error("Write something before submitting a comment.");
                    return Task::none();
                }
                let Some((token, user_id)) = ctx.bearer() else {
                    ctx.info("Still loading your profile, try again in a moment.");
                    return Task::none();
                };

                self.posting_comment = true;
                let generation = self.lifetime.current();
                let client = ctx.api.clone();
                let sighting_id = self.sighting_id;
                let content = self.new_comment.clone();
                Task::perform(
                    async move {
                        api::comments::create(&client, &token, sighting_id, user_id, &content)
                            .await
                    },
                    move |result| Message::CommentCreated(generation, result),
                )
            }

            Message::CommentCreated(generation, result) => {
                self.posting_comment = false;
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(comment) => {
                        self.comments.prepend(comment);
                        self.comments_count += 1;
                        self.new_comment.clear();
                        ctx.success("Comment created successfully!");
                    }
                    Err(err) => ctx.fail(&err),
                }
                Task::none()
            }

            Message::ShowMoreComments => {
                // Reveals from the already-fetched set; no request.
                self.comments.show_more();
                Task::none()
            }

            Message::DeleteComment(comment_id) => {
                let Some(user_id) = ctx.session.user_id() else {
                    ctx.info("You have to be logged in for that.");
                    return Task::none();
                };
                if let Err(rejection) = self.comments.can_delete(comment_id, user_id) {
                    ctx.error(rejection.to_string());
                    return Task::none();
                }
                let Some(token) = ctx.session.token().map(str::to_owned) else {
                    return Task::none();
                };

                let generation = self.lifetime.current();
                let client = ctx.api.clone();
                let sighting_id = self.sighting_id;
                Task::perform(
                    async move {
                        api::comments::delete(&client, &token, sighting_id, comment_id).await
                    },
                    move |result| Message::CommentDeleted(generation, comment_id, result),
                )
            }

            Message::CommentDeleted(generation, comment_id, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(()) => {
                        if self.comments.remove(comment_id).is_some() {
                            self.comments_count = self.comments_count.saturating_sub(1);
                        }
                        ctx.info("Comment deleted.");
                    }
                    Err(err) => ctx.fail(&err),
                }
                Task::none()
            }

            Message::DeleteSighting => {
                let Some(token) = ctx.session.token().map(str::to_owned) else {
                    ctx.info("You have to be logged in for that.");
                    return Task::none();
                };
                let client = ctx.api.clone();
                let sighting_id = self.sighting_id;
                Task::perform(
                    async move { api::sightings::delete(&client, &token, sighting_id).await },
                    Message::SightingDeleted,
                )
            }

            Message::SightingDeleted(result) => {
                match result {
                    Ok(()) => {
                        ctx.success("Sighting deleted successfully.");
                        ctx.goto(Route::LatestSightings);
                    }
                    Err(err) => ctx.fail(&err),
                }
                Task::none()
            }
        }
    }

    pub fn view<'a>(
        &'a self,
        likes: &LikeBoard,
        current_user: Option<i64>,
    ) -> Element<'a, Message> {
        if self.loading {
            return container(text("Loading sighting…")).padding(40).into();
        }
        if let Some(err) = &self.error {
            return container(text(format!("Error: {err}"))).padding(40).into();
        }
        let Some(sighting) = &self.sighting else {
            return container(text("This sighting does not exist."))
                .padding(40)
                .into();
        };

        let status = likes.status(sighting.id);

        let photo: Element<'a, Message> = match &self.picture {
            Some(handle) => image(handle.clone())
                .width(Length::Fixed(420.0))
                .height(Length::Fixed(300.0))
                .content_fit(ContentFit::Cover)
                .into(),
            None => container(text("🌿").size(56))
                .center_x(Length::Fixed(420.0))
                .center_y(Length::Fixed(300.0))
                .into(),
        };

        let flower_name = sighting
            .flower
            .as_ref()
            .map(|flower| flower.name.as_str())
            .unwrap_or("Unknown flower");
        let spotter = sighting
            .user
            .as_ref()
            .map(|user| user.full_name.as_str())
            .unwrap_or("Someone");

        let mut header = column![
            text(&sighting.name).size(30),
            text(format!("{flower_name}, spotted by {spotter}")).size(14).color(ACCENT),
        ]
        .spacing(6);

        if let Some(place) = &self.place {
            header = header.push(text(place).size(13));
        }

        let like = button(
            text(format!("♥ {} Likes", status.count))
                .size(15)
                .color(like_color(status.liked)),
        )
        .style(button::text)
        .on_press(Message::ToggleLike);

        let mut actions = row![
            like,
            text(format!("💬 {} Comments", self.comments_count)).size(15),
        ]
        .spacing(18)
        .align_y(Alignment::Center);

        if current_user.is_some_and(|user_id| sighting.created_by(user_id)) {
            actions = actions.push(horizontal_space());
            actions = actions.push(
                button(text("Delete sighting").size(13))
                    .style(button::danger)
                    .on_press(Message::DeleteSighting),
            );
        }

        let mut content = column![
            row![photo, header].spacing(24),
            text(&sighting.description).size(15),
            actions,
        ]
        .spacing(18);

        if let Some(map_view) = &self.map {
            let map_canvas: Element<'a, map::Event> = canvas(map_view)
                .width(Length::Fill)
                .height(Length::Fixed(320.0))
                .into();
            content = content.push(map_canvas.map(Message::Map));
        }

        content = content.push(self.comments_view(current_user));

        scrollable(content.spacing(18).padding(24).width(Length::Fill)).into()
    }

    fn comments_view<'a>(&'a self, current_user: Option<i64>) -> Element<'a, Message> {
        let mut thread = column![text(format!("{} Comments", self.comments_count)).size(22)]
            .spacing(12);

        if self.comments.visible().is_empty() {
            thread = thread.push(text("No comments yet.").size(14));
        }

        for comment in self.comments.visible() {
            let mut line = row![
                column![
                    text(&comment.user_full_name).size(14),
                    text(&comment.content).size(14),
                ]
                .spacing(3),
                horizontal_space(),
            ]
            .align_y(Alignment::Center);

            if current_user == Some(comment.user_id) {
                line = line.push(
                    button(text("Delete").size(12))
                        .style(button::danger)
                        .on_press(Message::DeleteComment(comment.id)),
                );
            }

            thread = thread.push(container(line).padding(10).style(container::rounded_box));
        }

        if self.comments.has_more() {
            thread = thread.push(
                button("Show More")
                    .style(button::secondary)
                    .on_press(Message::ShowMoreComments),
            );
        }

        let form = row![
            text_input("Write a comment…", &self.new_comment)
                .on_input(Message::CommentChanged)
                .on_submit(Message::SubmitComment)
                .padding(10),
            button(if self.posting_comment {
                "Posting…"
            } else {
                "Submit Comment"
            })
            .style(button::primary)
            .on_press(Message::SubmitComment),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        thread.push(form).into()
    }
}
