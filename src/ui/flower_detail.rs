/// Flower detail page: the hero block with the favorite star, plus every
/// sighting reported for this flower.
use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length, Task};

use crate::api::models::{FavoriteRecord, Flower, Like, Sighting};
use crate::api::{self, ApiError};
use crate::geo::{self, Coordinates};
use crate::state::favorites::Favorites;
use crate::state::fetch::{Generation, Lifetime};
use crate::state::likes::LikeBoard;
use crate::ui::{self, cards, pictures, Ctx, FavoriteOutcome, LikeOutcome, Route, ACCENT};

pub struct FlowerDetail {
    flower_id: i64,
    flower: Option<Flower>,
    favorites: Favorites,
    sightings: Vec<Sighting>,
    flower_picture: Option<Handle>,
    sighting_pictures: HashMap<i64, Handle>,
    places: HashMap<i64, String>,
    loading: bool,
    error: Option<String>,
    lifetime: Lifetime,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Generation, Result<Flower, ApiError>),
    FavoritesLoaded(Generation, Result<Vec<FavoriteRecord>, ApiError>),
    SightingsLoaded(Generation, Result<Vec<Sighting>, ApiError>),
    FlowerPicture(Generation, Result<Handle, String>),
    SightingPicture(Generation, i64, Result<Handle, String>),
    LikesLoaded(Generation, i64, Result<Vec<Like>, ApiError>),
    PlaceResolved(Generation, i64, String),
    ToggleFavorite,
    Favorite((i64, FavoriteOutcome)),
    ToggleLike(i64),
    Like((i64, LikeOutcome)),
    OpenSighting(i64),
    AddSighting,
}

impl FlowerDetail {
    pub fn flower_id(&self) -> i64 {
        self.flower_id
    }

    pub fn open(ctx: &Ctx<'_>, flower_id: i64) -> (Self, Task<Message>) {
        let mut page = FlowerDetail {
            flower_id,
            flower: None,
            favorites: Favorites::new(),
            sightings: Vec::new(),
            flower_picture: None,
            sighting_pictures: HashMap::new(),
            places: HashMap::new(),
            loading: true,
            error: None,
            lifetime: Lifetime::new(),
        };
        let generation = page.lifetime.renew();

        let client = ctx.api.clone();
        let mut tasks = vec![Task::perform(
            async move { api::flowers::detail(&client, flower_id).await },
            move |result| Message::Loaded(generation, result),
        )];

        let client = ctx.api.clone();
        tasks.push(Task::perform(
            async move { api::flowers::sightings_of(&client, flower_id).await },
            move |result| Message::SightingsLoaded(generation, result),
        ));

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
                    Ok(flower) => {
                        let task = if flower.profile_picture.is_empty() {
                            Task::none()
                        } else {
                            let http = ctx.api.http().clone();
                            let url = flower.profile_picture.clone();
                            Task::perform(
                                async move {
                                    pictures::load(http, url, pictures::DISPLAY_MAX_DIM).await
                                },
                                move |result| Message::FlowerPicture(generation, result),
                            )
                        };
                        self.flower = Some(flower);
                        task
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

            Message::SightingsLoaded(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(sightings) => {
                        let tasks = self.sighting_tasks(ctx, &sightings, generation);
                        for sighting in &sightings {
                            ctx.likes.seed(sighting.id, sighting.likes_count, false);
                        }
                        self.sightings = sightings;
                        tasks
                    }
                    Err(err) => {
                        eprintln!("⚠️  Could not load sightings: {err}");
                        Task::none()
                    }
                }
            }

            Message::FlowerPicture(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(handle) => self.flower_picture = Some(handle),
                    Err(err) => eprintln!("⚠️  Flower picture unavailable: {err}"),
                }
                Task::none()
            }

            Message::SightingPicture(generation, sighting_id, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(handle) => {
                        self.sighting_pictures.insert(sighting_id, handle);
                    }
                    Err(err) => {
                        eprintln!("⚠️  Picture for sighting {sighting_id} unavailable: {err}")
                    }
                }
                Task::none()
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

            Message::PlaceResolved(generation, sighting_id, place) => {
                if self.lifetime.is_current(generation) {
                    self.places.insert(sighting_id, place);
                }
                Task::none()
            }

            Message::ToggleFavorite => {
                match ui::toggle_favorite(ctx, &self.favorites, self.flower_id) {
                    Some(task) => task.map(Message::Favorite),
                    None => Task::none(),
                }
            }

            Message::Favorite((flower_id, outcome)) => {
                ui::apply_favorite_outcome(ctx, &mut self.favorites, flower_id, outcome);
                Task::none()
            }

            Message::ToggleLike(sighting_id) => match ui::toggle_like(ctx, sighting_id) {
                Some(task) => task.map(Message::Like),
                None => Task::none(),
            },

            Message::Like((sighting_id, outcome)) => {
                ui::apply_like_outcome(ctx, sighting_id, outcome).map(Message::Like)
            }

            Message::OpenSighting(sighting_id) => {
                ctx.goto(Route::SightingDetail(sighting_id));
                Task::none()
            }

            Message::AddSighting => {
                if ctx.require_login() {
                    ctx.goto(Route::NewSighting {
                        flower_id: self.flower_id,
                    });
                }
                Task::none()
            }
        }
    }

    fn sighting_tasks(
        &self,
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
                async move {
                    api::sightings::likes(&client, token.as_deref(), sighting_id).await
                },
                move |result| Message::LikesLoaded(generation, sighting_id, result),
            ));

            if !sighting.picture.is_empty() {
                let http = ctx.api.http().clone();
                let url = sighting.picture.clone();
                tasks.push(Task::perform(
                    async move { pictures::load(http, url, pictures::DISPLAY_MAX_DIM).await },
                    move |result| Message::SightingPicture(generation, sighting_id, result),
                ));
            }

            let http = ctx.api.http().clone();
            let coords = Coordinates::new(sighting.latitude, sighting.longitude);
            tasks.push(Task::perform(
                async move { geo::place_label(&http, coords).await },
                move |place| Message::PlaceResolved(generation, sighting_id, place),
            ));
        }

        Task::batch(tasks)
    }

    pub fn view<'a>(&'a self, likes: &LikeBoard) -> Element<'a, Message> {
        if self.loading {
            return container(text("Loading flower…")).padding(40).into();
        }
        if let Some(err) = &self.error {
            return container(text(format!("Error: {err}"))).padding(40).into();
        }
        let Some(flower) = &self.flower else {
            return container(text("This flower does not exist.")).padding(40).into();
        };

        let favorited = self.favorites.is_favorited(flower.id);

        let photo: Element<'a, Message> = match &self.flower_picture {
            Some(handle) => image(handle.clone())
                .width(Length::Fixed(280.0))
                .height(Length::Fixed(340.0))
                .content_fit(ContentFit::Cover)
                .into(),
            None => container(text("🌸").size(64))
                .center_x(Length::Fixed(280.0))
                .center_y(Length::Fixed(340.0))
                .into(),
        };

        let star_label = if favorited {
            "★ Favorited"
        } else {
            "☆ Add to favorites"
        };

        let hero = row![
            photo,
            column![
                text(&flower.latin_name).size(15),
                text(&flower.name).size(36),
                row![
                    text(format!("{} sightings", flower.sightings)).size(14),
                    button(text(star_label).size(14).color(if favorited {
                        ACCENT
                    } else {
                        iced::Color::from_rgb(0.4, 0.44, 0.45)
                    }))
                    .style(button::text)
                    .on_press(Message::ToggleFavorite),
                ]
                .spacing(14)
                .align_y(Alignment::Center),
                button("+ Add New Sighting")
                    .padding(14)
                    .style(button::primary)
                    .on_press(Message::AddSighting),
            ]
            .spacing(12),
        ]
        .spacing(24);

        let features = if flower.features.is_empty() {
            "No features available.".to_string()
        } else {
            flower.features.join(", ")
        };

        let about = row![
            container(text(features).size(14)).width(Length::Fixed(220.0)),
            text(&flower.description).size(15),
        ]
        .spacing(24);

        let mut listing = column![text("Sightings of this flower").size(22)].spacing(14);
        if self.sightings.is_empty() {
            listing = listing.push(text("No sightings reported yet.").size(14));
        } else {
            for sighting in &self.sightings {
                listing = listing.push(cards::sighting_card(
                    sighting,
                    self.sighting_pictures.get(&sighting.id),
                    likes.status(sighting.id),
                    self.places.get(&sighting.id).map(String::as_str),
                    Message::OpenSighting(sighting.id),
                    Message::ToggleLike(sighting.id),
                ));
            }
        }

        scrollable(
            column![hero, about, listing]
                .spacing(28)
                .padding(24)
                .width(Length::Fill),
        )
        .into()
    }
}
