/// Flowers page: the full flower catalog as a grid with favorite stars.
use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{column, container, scrollable, text};
use iced::{Element, Length, Task};
use iced_aw::Wrap;

use crate::api::models::{FavoriteRecord, Flower};
use crate::api::{self, ApiError};
use crate::state::favorites::Favorites;
use crate::state::fetch::{Generation, Lifetime};
use crate::ui::{self, cards, pictures, Ctx, FavoriteOutcome, Route};

pub struct Flowers {
    flowers: Vec<Flower>,
    favorites: Favorites,
    pictures: HashMap<i64, Handle>,
    loading: bool,
    error: Option<String>,
    lifetime: Lifetime,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Generation, Result<Vec<Flower>, ApiError>),
    FavoritesLoaded(Generation, Result<Vec<FavoriteRecord>, ApiError>),
    PictureLoaded(Generation, i64, Result<Handle, String>),
    OpenFlower(i64),
    ToggleFavorite(i64),
    Favorite((i64, FavoriteOutcome)),
}

impl Flowers {
    pub fn open(ctx: &Ctx<'_>) -> (Self, Task<Message>) {
        let mut page = Flowers {
            flowers: Vec::new(),
            favorites: Favorites::new(),
            pictures: HashMap::new(),
            loading: true,
            error: None,
            lifetime: Lifetime::new(),
        };
        let generation = page.lifetime.renew();

        let client = ctx.api.clone();
        let mut tasks = vec![Task::perform(
            async move { api::flowers::list(&client).await },
            move |result| Message::Loaded(generation, result),
        )];

        if let Some(token) = ctx.session.token().map(str::to_owned) {
            let client = ctx.api.clone();
            tasks.push(Task::perform(
                async move { api::flowers::favorites(&client, &token).await },
                move |result| Message::FavoritesLoaded(generation, result),
            ));
        }

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
                    Ok(flowers) => {
                        let tasks: Vec<_> = flowers
                            .iter()
                            .filter(|flower| !flower.profile_picture.is_empty())
                            .map(|flower| {
                                let http = ctx.api.http().clone();
                                let url = flower.profile_picture.clone();
                                let flower_id = flower.id;
                                Task::perform(
                                    async move {
                                        pictures::load(http, url, pictures::DISPLAY_MAX_DIM).await
                                    },
                                    move |result| {
                                        Message::PictureLoaded(generation, flower_id, result)
                                    },
                                )
                            })
                            .collect();
                        self.flowers = flowers;
                        Task::batch(tasks)
                    }
                    Err(err) => {
                        self.error = Some(err.to_string());
                        ctx.fail(&err);
                        Task::none()
                    }
                }
            }

            Message::FavoritesLoaded(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(records) => self.favorites = Favorites::from_records(&records),
                    Err(err) => eprintln!("⚠️  Could not load favorites: {err}"),
                }
                Task::none()
            }

            Message::PictureLoaded(generation, flower_id, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(handle) => {
                        self.pictures.insert(flower_id, handle);
                    }
                    Err(err) => {
                        eprintln!("⚠️  Picture for flower {flower_id} unavailable: {err}")
                    }
                }
                Task::none()
            }

            Message::OpenFlower(flower_id) => {
                ctx.goto(Route::FlowerDetail(flower_id));
                Task::none()
            }

            Message::ToggleFavorite(flower_id) => {
                match ui::toggle_favorite(ctx, &self.favorites, flower_id) {
                    Some(task) => task.map(Message::Favorite),
                    None => Task::none(),
                }
            }

            Message::Favorite((flower_id, outcome)) => {
                ui::apply_favorite_outcome(ctx, &mut self.favorites, flower_id, outcome);
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let body: Element<'_, Message> = if self.loading {
            container(text("Loading flowers…")).padding(40).into()
        } else if let Some(err) = &self.error {
            container(text(format!("Error: {err}"))).padding(40).into()
        } else if self.flowers.is_empty() {
            container(text("No flowers available right now.")).padding(40).into()
        } else {
            let items = self
                .flowers
                .iter()
                .map(|flower| {
                    cards::flower_card(
                        flower,
                        self.pictures.get(&flower.id),
                        self.favorites.is_favorited(flower.id),
                        Message::OpenFlower(flower.id),
                        Message::ToggleFavorite(flower.id),
                    )
                })
                .collect();
            Wrap::with_elements(items)
                .spacing(16.0)
                .line_spacing(16.0)
                .into()
        };

        scrollable(
            column![text("Flowers").size(28), body]
                .spacing(20)
                .padding(24)
                .width(Length::Fill),
        )
        .into()
    }
}
