/// New sighting page: capture a position on the map, title and describe
/// the sighting, attach a photo, submit.
///
/// Coordinates start unset. Geolocation tries to fill them on mount, but
/// its failure is console-only and the form stays usable; the submit
/// handler is what rejects an unset position.
use std::path::PathBuf;

use iced::widget::image::Handle;
use iced::widget::{
    button, canvas, column, container, image, row, scrollable, text, text_input,
};
use iced::{Alignment, ContentFit, Element, Length, Task};

use crate::api::models::Sighting;
use crate::api::sightings::{NewSighting, PhotoUpload};
use crate::api::{self, ApiError};
use crate::geo::{self, Coordinates};
use crate::state::fetch::{Generation, Lifetime};
use crate::ui::{map, pictures, Ctx, Route};

pub struct NewSightingPage {
    flower_id: i64,
    map: map::MapView,
    coords: Option<Coordinates>,
    title: String,
    description: String,
    photo: Option<PickedPhoto>,
    submitting: bool,
    lifetime: Lifetime,
}

struct PickedPhoto {
    upload: PhotoUpload,
    preview: Handle,
}

#[derive(Debug, Clone)]
pub enum Message {
    Located(Generation, Result<Coordinates, String>),
    Map(map::Event),
    TitleChanged(String),
    DescriptionChanged(String),
    PickPhoto,
    PhotoPrepared(Generation, Result<(PhotoUpload, Handle), String>),
    Submit,
    Created(Result<Sighting, ApiError>),
}

impl NewSightingPage {
    pub fn flower_id(&self) -> i64 {
        self.flower_id
    }

    pub fn open(ctx: &Ctx<'_>, flower_id: i64) -> (Self, Task<Message>) {
        let mut page = NewSightingPage {
            flower_id,
            map: map::MapView::new(),
            coords: None,
            title: String::new(),
            description: String::new(),
            photo: None,
            submitting: false,
            lifetime: Lifetime::new(),
        };
        let generation = page.lifetime.renew();

        let http = ctx.api.http().clone();
        let task = Task::perform(
            async move { geo::current_position(&http).await },
            move |result| Message::Located(generation, result),
        );

        (page, task)
    }

    pub fn update(&mut self, message: Message, ctx: &mut Ctx<'_>) -> Task<Message> {
        match message {
            Message::Located(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(position) => {
                        // A click may already have captured a position
                        // while the lookup was in flight; the user's
                        // choice wins.
                        if self.coords.is_none() {
                            let position = position.rounded();
                            self.coords = Some(position);
                            self.map.place_marker(position);
                        }
                    }
                    Err(err) => {
                        // Non-fatal by contract: console only, form stays
                        // usable with coordinates unset.
                        eprintln!("⚠️  Geolocation failed: {err}");
                    }
                }
                Task::none()
            }

            Message::Map(event) => {
                match event {
                    map::Event::Picked(coords) => {
                        self.coords = Some(coords);
                        self.map.place_marker(coords);
                    }
                    map::Event::Panned(delta) => self.map.pan(delta),
                    map::Event::Zoomed(delta) => self.map.zoom(delta),
                }
                Task::none()
            }

            Message::TitleChanged(title) => {
                self.title = capitalize_first(&title);
                Task::none()
            }

            Message::DescriptionChanged(description) => {
                self.description = capitalize_first(&description);
                Task::none()
            }

            Message::PickPhoto => {
                let picked = rfd::FileDialog::new()
                    .set_title("Choose a Photo of the Sighting")
                    .add_filter("Images", &["jpg", "jpeg", "png", "webp", "bmp"])
                    .pick_file();

                match picked {
                    Some(path) => self.prepare_photo(path),
                    None => Task::none(),
                }
            }

            Message::PhotoPrepared(generation, result) => {
                if !self.lifetime.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok((upload, preview)) => {
                        self.photo = Some(PickedPhoto { upload, preview });
                    }
                    Err(err) => ctx.error(format!("Could not use that photo: {err}")),
                }
                Task::none()
            }

            Message::Submit => {
                if self.submitting {
                    return Task::none();
                }
                if !ctx.require_login() {
                    return Task::none();
                }
                let Some(token) = ctx.session.token().map(str::to_owned) else {
                    return Task::none();
                };

                // Client-side validation; the server checks again.
                let Some(coords) = self.coords else {
                    ctx.error("Pick a location on the map first.");
                    return Task::none();
                };
                if self.title.trim().is_empty() {
                    ctx.error("Give the sighting a title.");
                    return Task::none();
                }
                if self.description.trim().is_empty() {
                    ctx.error("Write a description of the sighting.");
                    return Task::none();
                }

                self.submitting = true;
                let client = ctx.api.clone();
                let new = NewSighting {
                    flower_id: self.flower_id,
                    name: self.title.trim().to_owned(),
                    description: self.description.trim().to_owned(),
                    latitude: coords.latitude,
                    longitude: coords.longitude,
                    picture: self.photo.as_ref().map(|photo| photo.upload.clone()),
                };
                Task::perform(
                    async move { api::sightings::create(&client, &token, new).await },
                    Message::Created,
                )
            }

            Message::Created(result) => {
                self.submitting = false;
                match result {
                    Ok(sighting) => {
                        ctx.success("Sighting created successfully!");
                        ctx.goto(Route::SightingDetail(sighting.id));
                    }
                    Err(err) => ctx.fail(&err),
                }
                Task::none()
            }
        }
    }

    fn prepare_photo(&self, path: PathBuf) -> Task<Message> {
        let generation = self.lifetime.current();
        Task::perform(
            async move { pictures::prepare_upload(path).await },
            move |result| Message::PhotoPrepared(generation, result),
        )
    }

    pub fn view(&self) -> Element<'_, Message> {
        let map_canvas: Element<'_, map::Event> = canvas(&self.map)
            .width(Length::Fill)
            .height(Length::Fixed(360.0))
            .into();

        let coords_text = self
            .coords
            .map(|coords| coords.label())
            .unwrap_or_else(|| "Click the map to set coordinates".to_string());

        let photo_button: Element<'_, Message> = match &self.photo {
            Some(photo) => row![
                image(photo.preview.clone())
                    .width(Length::Fixed(56.0))
                    .height(Length::Fixed(56.0))
                    .content_fit(ContentFit::Cover),
                button(text("Change Photo").size(13))
                    .style(button::secondary)
                    .on_press(Message::PickPhoto),
            ]
            .spacing(10)
            .align_y(Alignment::Center)
            .into(),
            None => button("📷 Add a Photo")
                .style(button::secondary)
                .on_press(Message::PickPhoto)
                .into(),
        };

        let form = column![
            row![
                text_input("Title of the sighting", &self.title)
                    .on_input(Message::TitleChanged)
                    .padding(12),
                container(text(coords_text).size(13))
                    .padding(12)
                    .style(container::rounded_box),
                photo_button,
            ]
            .spacing(14)
            .align_y(Alignment::Center),
            text_input("Write a description…", &self.description)
                .on_input(Message::DescriptionChanged)
                .padding(12),
            button(if self.submitting {
                "Creating…"
            } else {
                "Create New Sighting"
            })
            .padding(14)
            .style(button::primary)
            .on_press(Message::Submit),
        ]
        .spacing(16);

        scrollable(
            column![
                text("Add New Sighting").size(28),
                map_canvas.map(Message::Map),
                form,
            ]
            .spacing(20)
            .padding(24)
            .width(Length::Fill),
        )
        .into()
    }
}

/// The original capitalizes the first letter of the title and description
/// as the user types.
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::User;
    use crate::api::ApiClient;
    use crate::session::store::SessionStore;
    use crate::session::Session;
    use crate::state::likes::LikeBoard;
    use crate::ui::NoticeLevel;

    #[test]
    fn capitalizes_only_the_first_letter() {
        assert_eq!(capitalize_first("spotted by the road"), "Spotted by the road");
        assert_eq!(capitalize_first("Already fine"), "Already fine");
        assert_eq!(capitalize_first(""), "");
    }

    fn logged_in_session(name: &str) -> Session {
        let path = std::env::temp_dir()
            .join(format!("flowrspot-sighting-{}-{name}", std::process::id()))
            .join("session.json");
        let store = SessionStore::at(path);
        store.clear();
        let mut session = Session::with_store(store);
        session.begin("token-123".into());
        session.attach_user(&User {
            id: 9,
            first_name: "Mara".into(),
            last_name: "K".into(),
        });
        session
    }

    #[test]
    fn submit_with_unset_coordinates_is_rejected() {
        let api = ApiClient::with_base("https://example.test/api/v1");
        let mut session = logged_in_session("unset-coords");
        let mut likes = LikeBoard::new();
        let mut ctx = Ctx::new(&api, &mut session, &mut likes);

        let (mut page, _task) = NewSightingPage::open(&ctx, 42);
        page.title = "By the creek".into();
        page.description = "Half hidden in the reeds.".into();
        assert!(page.coords.is_none());

        let _ = page.update(Message::Submit, &mut ctx);

        // No request was started; the user gets a validation notice.
        assert!(!page.submitting);
        assert_eq!(
            ctx.notice.as_ref().map(|notice| notice.level),
            Some(NoticeLevel::Error)
        );
    }

    #[test]
    fn geolocation_failure_is_console_only() {
        let api = ApiClient::with_base("https://example.test/api/v1");
        let mut session = logged_in_session("geo-fail");
        let mut likes = LikeBoard::new();
        let mut ctx = Ctx::new(&api, &mut session, &mut likes);

        let (mut page, _task) = NewSightingPage::open(&ctx, 42);
        let generation = page.lifetime.current();

        let _ = page.update(
            Message::Located(generation, Err("lookup refused".into())),
            &mut ctx,
        );

        // Coordinates stay at the unset sentinel and no notice is raised.
        assert!(page.coords.is_none());
        assert!(ctx.notice.is_none());
        assert!(page.map.marker().is_none());
    }

    #[test]
    fn map_click_captures_the_coordinates() {
        let api = ApiClient::with_base("https://example.test/api/v1");
        let mut session = logged_in_session("map-click");
        let mut likes = LikeBoard::new();
        let mut ctx = Ctx::new(&api, &mut session, &mut likes);

        let (mut page, _task) = NewSightingPage::open(&ctx, 42);
        let picked = Coordinates::new(43.3438, 17.8078);

        let _ = page.update(Message::Map(map::Event::Picked(picked)), &mut ctx);

        assert_eq!(page.coords, Some(picked));
        assert_eq!(page.map.marker(), Some(picked));
    }

    #[test]
    fn late_geolocation_does_not_override_a_click() {
        let api = ApiClient::with_base("https://example.test/api/v1");
        let mut session = logged_in_session("late-geo");
        let mut likes = LikeBoard::new();
        let mut ctx = Ctx::new(&api, &mut session, &mut likes);

        let (mut page, _task) = NewSightingPage::open(&ctx, 42);
        let generation = page.lifetime.current();
        let picked = Coordinates::new(43.3438, 17.8078);

        let _ = page.update(Message::Map(map::Event::Picked(picked)), &mut ctx);
        let _ = page.update(
            Message::Located(generation, Ok(Coordinates::new(48.2082, 16.3738))),
            &mut ctx,
        );

        assert_eq!(page.coords, Some(picked));
    }
}
