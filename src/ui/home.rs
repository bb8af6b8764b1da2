/// Home page: a random-flower showcase and a debounced search box.
use std::collections::HashMap;
use std::time::Duration;

use iced::widget::image::Handle;
use iced::widget::{column, container, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Task};
use iced_aw::Wrap;

use crate::api::models::{FavoriteRecord, Flower};
use crate::api::{self, ApiError};
use crate::state::favorites::Favorites;
use crate::state::fetch::{Generation, Lifetime};
use crate::ui::{self, cards, pictures, Ctx, FavoriteOutcome, Route};

/// How long the search box stays quiet before a query fires.
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

pub struct Home {
    showcase: Vec<Flower>,
    results: Option<Vec<Flower>>,
    favorites: Favorites,
    pictures: HashMap<i64, Handle>,
    query: String,
    loading: bool,
    error: Option<String>,
    lifetime: Lifetime,
    search: Lifetime,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Generation, Result<Vec<Flower>, ApiError>),
    FavoritesLoaded(Generation, Result<Vec<FavoriteRecord>, ApiError>),
    PictureLoaded(Generation, i64, Result<Handle, String>),
    QueryChanged(String),
    SearchTick(Generation),
    SearchResults(Generation, Result<Vec<Flower>, ApiError>),
    OpenFlower(i64),
    ToggleFavorite(i64),
    Favorite((i64, FavoriteOutcome)),
}

impl Home {
    pub fn open(ctx: &Ctx<'_>) -> (Self, Task<Message>) {
        let mut page = Home {
            showcase: Vec::new(),
            results: None,
            favorites: Favorites::new(),
            pictures: HashMap::new(),
            query: String::new(),
            loading: true,
            error: None,
            lifetime: Lifetime::new(),
            search: Lifetime::new(),
        };
        let generation = page.lifetime.renew();

        let client = ctx.api.clone();
        let mut tasks = vec![Task::perform(
            async move { api::flowers::random(&client).await },
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
                        let pictures = self.picture_tasks(ctx, &flowers, generation);
                        self.showcase = flowers;
                        pictures
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

            Message::QueryChanged(query) => {
                self.query = query;
                let generation = self.search.renew();

                if self.query.trim().is_empty() {
                    self.results = None;
                    return Task::none();
                }

                Task::perform(tokio::time::sleep(SEARCH_DEBOUNCE), move |_| {
                    Message::SearchTick(generation)
                })
            }

            Message::SearchTick(generation) => {
                if !self.search.is_current(generation) {
                    return Task::none();
                }
                let client = ctx.api.clone();
                let query = self.query.trim().to_owned();
                Task::perform(
                    async move { api::flowers::search(&client, &query).await },
                    move |result| Message::SearchResults(generation, result),
                )
            }

            Message::SearchResults(generation, result) => {
                if !self.search.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(flowers) => {
                        let pictures =
                            self.picture_tasks(ctx, &flowers, self.lifetime.current());
                        self.results = Some(flowers);
                        pictures
                    }
                    Err(err) => {
                        ctx.fail(&err);
                        Task::none()
                    }
                }
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

    /// Start fetches for pictures this page has not decoded yet.
    fn picture_tasks(
        &self,
        ctx: &Ctx<'_>,
        flowers: &[Flower],
        generation: Generation,
    ) -> Task<Message> {
        let tasks: Vec<_> = flowers
            .iter()
            .filter(|flower| {
                !flower.profile_picture.is_empty() && !self.pictures.contains_key(&flower.id)
            })
            .map(|flower| {
                let http = ctx.api.http().clone();
                let url = flower.profile_picture.clone();
                let flower_id = flower.id;
                Task::perform(
                    async move { pictures::load(http, url, pictures::DISPLAY_MAX_DIM).await },
                    move |result| Message::PictureLoaded(generation, flower_id, result),
                )
            })
            .collect();
        Task::batch(tasks)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let heading = column![
            text("Discover flowers around you").size(34),
            text("Explore sightings reported by the community").size(14),
            text_input("Looking for something specific?", &self.query)
                .on_input(Message::QueryChanged)
                .padding(12)
                .width(Length::Fixed(420.0)),
        ]
        .spacing(14)
        .align_x(Alignment::Center)
        .width(Length::Fill);

        let flowers = self.results.as_deref().unwrap_or(&self.showcase);

        let body: Element<'_, Message> = if self.loading {
            container(text("Loading flowers…")).padding(40).into()
        } else if let Some(err) = &self.error {
            container(text(format!("Error: {err}"))).padding(40).into()
        } else if flowers.is_empty() {
            container(text("No flowers found.")).padding(40).into()
        } else {
            let items = flowers
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
            column![heading, body]
                .spacing(28)
                .padding(24)
                .width(Length::Fill),
        )
        .into()
    }
}
