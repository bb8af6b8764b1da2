/// Latest sightings page: the newest sightings with like toggles.
use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{column, container, scrollable, text};
use iced::{Element, Length, Task};

use crate::api::models::{Like, Sighting};
use crate::api::{self, ApiError};
use crate::state::fetch::{Generation, Lifetime};
use crate::ui::{self, cards, pictures, Ctx, LikeOutcome, Route};

pub struct LatestSightings {
    sightings: Vec<Sighting>,
    pictures: HashMap<i64, Handle>,
    loading: bool,
    error: Option<String>,
    lifetime: Lifetime,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Generation, Result<Vec<Sighting>, ApiError>),
    LikesLoaded(Generation, i64, Result<Vec<Like>, ApiError>),
    PictureLoaded(Generation, i64, Result<Handle, String>),
    OpenSighting(i64),
    ToggleLike(i64),
    Like((i64, LikeOutcome)),
}

impl LatestSightings {
    pub fn open(ctx: &Ctx<'_>) -> (Self, Task<Message>) {
        let mut page = LatestSightings {
            sightings: Vec::new(),
            pictures: HashMap::new(),
            loading: true,
            error: None,
            lifetime: Lifetime::new(),
        };
        let generation = page.lifetime.renew();

        let client = ctx.api.clone();
        let task = Task::perform(
            async move { api::sightings::latest(&client).await },
            move |result| Message::Loaded(generation, result),
        );

        (page, task)
    }

    pub fn update(&mut self, message: Message, ctx: &mut Ctx<'_>) -> Task<Message> {
        match message {
            Message::Loaded(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                self.loading = false;
                match result {
                    Ok(sightings) => {
                        let tasks = sighting_tasks(ctx, &sightings, generation);
                        for sighting in &sightings {
                            ctx.likes
                                .seed(sighting.id, sighting.likes_count, false);
                        }
                        self.sightings = sightings;
                        tasks
                    }
                    Err(err) => {
                        self.error = Some(err.to_string());
                        ctx.fail(&err);
                        Task::none()
                    }
                }
            }

            Message::LikesLoaded(generation, sighting_id, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(likes) => {
                        ctx.likes
                            .reconcile(sighting_id, &likes, ctx.session.user_id());
                    }
                    Err(err) => {
                        eprintln!("⚠️  Likes for sighting {sighting_id} unavailable: {err}")
                    }
                }
                Task::none()
            }

            Message::PictureLoaded(generation, sighting_id, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(handle) => {
                        self.pictures.insert(sighting_id, handle);
                    }
                    Err(err) => {
                        eprintln!("⚠️  Picture for sighting {sighting_id} unavailable: {err}")
                    }
                }
                Task::none()
            }

            Message::OpenSighting(sighting_id) => {
                ctx.goto(Route::SightingDetail(sighting_id));
                Task::none()
            }

            Message::ToggleLike(sighting_id) => match ui::toggle_like(ctx, sighting_id) {
                Some(task) => task.map(Message::Like),
                None => Task::none(),
            },

            Message::Like((sighting_id, outcome)) => {
                ui::apply_like_outcome(ctx, sighting_id, outcome).map(Message::Like)
            }
        }
    }

    pub fn view<'a>(
        &'a self,
        likes: &crate::state::likes::LikeBoard,
    ) -> Element<'a, Message> {
        let body: Element<'a, Message> = if self.loading {
            container(text("Loading sightings…")).padding(40).into()
        } else if let Some(err) = &self.error {
            container(text(format!("Error: {err}"))).padding(40).into()
        } else if self.sightings.is_empty() {
            container(text("Nobody has spotted anything yet.")).padding(40).into()
        } else {
            let items = self.sightings.iter().fold(
                column![].spacing(14),
                |col, sighting| {
                    col.push(cards::sighting_card(
                        sighting,
                        self.pictures.get(&sighting.id),
                        likes.status(sighting.id),
                        None,
                        Message::OpenSighting(sighting.id),
                        Message::ToggleLike(sighting.id),
                    ))
                },
            );
            items.into()
        };

        scrollable(
            column![text("Latest Sightings").size(28), body]
                .spacing(20)
                .padding(24)
                .width(Length::Fill),
        )
        .into()
    }
}

/// Per-sighting background work after the list arrives: the authoritative
/// like list (to learn the liked-by-me flag) and the photo.
fn sighting_tasks(
    ctx: &Ctx<'_>,
    sightings: &[Sighting],
    generation: Generation,
) -> Task<Message> {
    let mut tasks = Vec::new();

    for sighting in sightings {
        let sighting_id = sighting.id;

        let client = ctx.api.clone();
        let token = ctx.session.token().map(str::to_owned);
        tasks.push(Task::perform(
            async move { api::sightings::likes(&client, token.as_deref(), sighting_id).await },
            move |result| Message::LikesLoaded(generation, sighting_id, result),
        ));

        if !sighting.picture.is_empty() {
            let http = ctx.api.http().clone();
            let url = sighting.picture.clone();
            tasks.push(Task::perform(
                async move { pictures::load(http, url, pictures::DISPLAY_MAX_DIM).await },
                move |result| Message::PictureLoaded(generation, sighting_id, result),
            ));
        }
    }

    Task::batch(tasks)
}
