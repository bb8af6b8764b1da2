/// Favorites page: every flower the user has favorited, with the star
/// acting as a remove/re-add toggle.
///
/// The fetched records stay listed for the whole visit; removing a
/// flower only drops it from the membership collection, so the card
/// flips to un-starred and can be re-added without a refetch.
use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{column, container, scrollable, text};
use iced::{Element, Length, Task};
use iced_aw::Wrap;

use crate::api::models::FavoriteRecord;
use crate::api::{self, ApiError};
use crate::state::favorites::Favorites;
use crate::state::fetch::{Generation, Lifetime};
use crate::ui::{self, cards, pictures, Ctx, FavoriteOutcome, Route};

pub struct FavoritesPage {
    records: Vec<FavoriteRecord>,
    favorites: Favorites,
    pictures: HashMap<i64, Handle>,
    loading: bool,
    error: Option<String>,
    lifetime: Lifetime,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Generation, Result<Vec<FavoriteRecord>, ApiError>),
    PictureLoaded(Generation, i64, Result<Handle, String>),
    OpenFlower(i64),
    Toggle(i64),
    Favorite((i64, FavoriteOutcome)),
}

impl FavoritesPage {
    pub fn open(ctx: &Ctx<'_>) -> (Self, Task<Message>) {
        let mut page = FavoritesPage {
            records: Vec::new(),
            favorites: Favorites::new(),
            pictures: HashMap::new(),
            loading: true,
            error: None,
            lifetime: Lifetime::new(),
        };

        let Some(token) = ctx.session.token().map(str::to_owned) else {
            page.loading = false;
            page.error = Some("You have to be logged in to see your favorites.".into());
            return (page, Task::none());
        };

        let generation = page.lifetime.renew();
        let client = ctx.api.clone();
        let task = Task::perform(
            async move { api::flowers::favorites(&client, &token).await },
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
                    Ok(records) => {
                        self.favorites = Favorites::from_records(&records);

                        let tasks: Vec<_> = records
                            .iter()
                            .filter(|record| !record.flower.profile_picture.is_empty())
                            .map(|record| {
                                let http = ctx.api.http().clone();
                                let url = record.flower.profile_picture.clone();
                                let flower_id = record.flower.id;
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

                        self.records = records;
                        Task::batch(tasks)
                    }
                    Err(err) => {
                        self.error = Some(err.to_string());
                        ctx.fail(&err);
                        Task::none()
                    }
                }
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

            Message::Toggle(flower_id) => {
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
            container(text("Loading favorites…")).padding(40).into()
        } else if let Some(err) = &self.error {
            container(text(err.as_str())).padding(40).into()
        } else if self.records.is_empty() {
            container(text("No favorite flowers found.")).padding(40).into()
        } else {
            let items = self
                .records
                .iter()
                .map(|record| {
                    cards::flower_card(
                        &record.flower,
                        self.pictures.get(&record.flower.id),
                        self.favorites.is_favorited(record.flower.id),
                        Message::OpenFlower(record.flower.id),
                        Message::Toggle(record.flower.id),
                    )
                })
                .collect();
            Wrap::with_elements(items)
                .spacing(16.0)
                .line_spacing(16.0)
                .into()
        };

        scrollable(
            column![text("Favorites").size(28), body]
                .spacing(20)
                .padding(24)
                .width(Length::Fill),
        )
        .into()
    }
}
