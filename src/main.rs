use iced::widget::{
    button, center, column, container, horizontal_space, mouse_area, opaque, row, stack, text,
};
use iced::{Alignment, Color, Element, Length, Task, Theme};

mod api;
mod geo;
mod session;
mod state;
mod ui;

use api::ApiClient;
use session::Session;
use state::likes::LikeBoard;
use ui::{
    auth, favorites, flower_detail, flowers, home, latest_sightings, new_sighting,
    sighting_detail, Ctx, Notice, NoticeLevel, Route,
};

/// Main application state
struct Flowrspot {
    api: ApiClient,
    /// Who is logged in; persisted across runs.
    session: Session,
    /// Process-wide per-sighting like map, reset on logout.
    likes: LikeBoard,
    /// The currently mounted page; replaced wholesale on navigation.
    page: Page,
    /// Transient notification banner.
    notice: Option<Notice>,
    /// Login / registration modal, when open.
    auth: Option<auth::AuthModal>,
}

enum Page {
    Home(home::Home),
    Flowers(flowers::Flowers),
    LatestSightings(latest_sightings::LatestSightings),
    FlowerDetail(flower_detail::FlowerDetail),
    SightingDetail(sighting_detail::SightingDetail),
    Favorites(favorites::FavoritesPage),
    NewSighting(new_sighting::NewSightingPage),
}

#[derive(Debug, Clone)]
enum Message {
    Go(Route),
    Home(home::Message),
    Flowers(flowers::Message),
    LatestSightings(latest_sightings::Message),
    FlowerDetail(flower_detail::Message),
    SightingDetail(sighting_detail::Message),
    Favorites(favorites::Message),
    NewSighting(new_sighting::Message),
    OpenLogin,
    OpenSignup,
    CloseAuth,
    Auth(auth::Message),
    Logout,
    DismissNotice,
}

impl Flowrspot {
    fn new() -> (Self, Task<Message>) {
        let api = ApiClient::new();
        let mut session = Session::load();
        let mut likes = LikeBoard::new();

        println!("🌸 FlowrSpot client starting");

        let (home_page, task) = {
            let ctx = Ctx::new(&api, &mut session, &mut likes);
            home::Home::open(&ctx)
        };

        let app = Flowrspot {
            api,
            session,
            likes,
            page: Page::Home(home_page),
            notice: None,
            auth: None,
        };

        (app, task.map(Message::Home))
    }

    /// Replace the mounted page. The old page's outstanding fetches die
    /// with it; their generation tokens no longer match anything.
    fn navigate(&mut self, route: Route) -> Task<Message> {
        let ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);

        let (page, task) = match route {
            Route::Home => {
                let (page, task) = home::Home::open(&ctx);
                (Page::Home(page), task.map(Message::Home))
            }
            Route::Flowers => {
                let (page, task) = flowers::Flowers::open(&ctx);
                (Page::Flowers(page), task.map(Message::Flowers))
            }
            Route::LatestSightings => {
                let (page, task) = latest_sightings::LatestSightings::open(&ctx);
                (
                    Page::LatestSightings(page),
                    task.map(Message::LatestSightings),
                )
            }
            Route::Favorites => {
                let (page, task) = favorites::FavoritesPage::open(&ctx);
                (Page::Favorites(page), task.map(Message::Favorites))
            }
            Route::FlowerDetail(flower_id) => {
                let (page, task) = flower_detail::FlowerDetail::open(&ctx, flower_id);
                (Page::FlowerDetail(page), task.map(Message::FlowerDetail))
            }
            Route::SightingDetail(sighting_id) => {
                let (page, task) = sighting_detail::SightingDetail::open(&ctx, sighting_id);
                (
                    Page::SightingDetail(page),
                    task.map(Message::SightingDetail),
                )
            }
            Route::NewSighting { flower_id } => {
                let (page, task) = new_sighting::NewSightingPage::open(&ctx, flower_id);
                (Page::NewSighting(page), task.map(Message::NewSighting))
            }
        };

        self.page = page;
        task
    }

    /// Re-open the current route, e.g. after login changes what views
    /// should fetch.
    fn renavigate(&mut self) -> Task<Message> {
        let route = self.current_route();
        self.navigate(route)
    }

    fn current_route(&self) -> Route {
        match &self.page {
            Page::Home(_) => Route::Home,
            Page::Flowers(_) => Route::Flowers,
            Page::LatestSightings(_) => Route::LatestSightings,
            Page::FlowerDetail(page) => Route::FlowerDetail(page.flower_id()),
            Page::SightingDetail(page) => Route::SightingDetail(page.sighting_id()),
            Page::Favorites(_) => Route::Favorites,
            Page::NewSighting(page) => Route::NewSighting {
                flower_id: page.flower_id(),
            },
        }
    }

    /// Fold a page's side effects back into the shell: surface its
    /// notice, follow its navigation request.
    fn after(
        &mut self,
        task: Task<Message>,
        effects: (Option<Notice>, Option<Route>),
    ) -> Task<Message> {
        let (notice, goto) = effects;
        if let Some(notice) = notice {
            self.notice = Some(notice);
        }
        match goto {
            Some(route) => Task::batch([task, self.navigate(route)]),
            None => task,
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Go(route) => self.navigate(route),

            Message::OpenLogin => {
                self.auth = Some(auth::AuthModal::new(auth::Mode::Login));
                Task::none()
            }

            Message::OpenSignup => {
                self.auth = Some(auth::AuthModal::new(auth::Mode::Signup));
                Task::none()
            }

            Message::CloseAuth => {
                self.auth = None;
                Task::none()
            }

            Message::Auth(message) => {
                let Some(modal) = self.auth.as_mut() else {
                    return Task::none();
                };
                let (task, effects, finished) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = modal.update(message, &mut ctx).map(Message::Auth);
                    (task, (ctx.notice, ctx.goto), modal.is_finished())
                };

                let task = self.after(task, effects);
                if finished {
                    self.auth = None;
                    // Remount so the page fetches what the session now
                    // allows (favorites, liked flags).
                    Task::batch([task, self.renavigate()])
                } else {
                    task
                }
            }

            Message::Logout => {
                self.session.logout();
                self.likes.reset();
                self.notice = Some(Notice::info("Logged out. See you soon!"));
                self.navigate(Route::Home)
            }

            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }

            Message::Home(message) => {
                let (task, effects) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = match &mut self.page {
                        Page::Home(page) => page.update(message, &mut ctx).map(Message::Home),
                        _ => Task::none(),
                    };
                    (task, (ctx.notice, ctx.goto))
                };
                self.after(task, effects)
            }

            Message::Flowers(message) => {
                let (task, effects) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = match &mut self.page {
                        Page::Flowers(page) => {
                            page.update(message, &mut ctx).map(Message::Flowers)
                        }
                        _ => Task::none(),
                    };
                    (task, (ctx.notice, ctx.goto))
                };
                self.after(task, effects)
            }

            Message::LatestSightings(message) => {
                let (task, effects) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = match &mut self.page {
                        Page::LatestSightings(page) => {
                            page.update(message, &mut ctx).map(Message::LatestSightings)
                        }
                        _ => Task::none(),
                    };
                    (task, (ctx.notice, ctx.goto))
                };
                self.after(task, effects)
            }

            Message::FlowerDetail(message) => {
                let (task, effects) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = match &mut self.page {
                        Page::FlowerDetail(page) => {
                            page.update(message, &mut ctx).map(Message::FlowerDetail)
                        }
                        _ => Task::none(),
                    };
                    (task, (ctx.notice, ctx.goto))
                };
                self.after(task, effects)
            }

            Message::SightingDetail(message) => {
                let (task, effects) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = match &mut self.page {
                        Page::SightingDetail(page) => {
                            page.update(message, &mut ctx).map(Message::SightingDetail)
                        }
                        _ => Task::none(),
                    };
                    (task, (ctx.notice, ctx.goto))
                };
                self.after(task, effects)
            }

            Message::Favorites(message) => {
                let (task, effects) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = match &mut self.page {
                        Page::Favorites(page) => {
                            page.update(message, &mut ctx).map(Message::Favorites)
                        }
                        _ => Task::none(),
                    };
                    (task, (ctx.notice, ctx.goto))
                };
                self.after(task, effects)
            }

            Message::NewSighting(message) => {
                let (task, effects) = {
                    let mut ctx = Ctx::new(&self.api, &mut self.session, &mut self.likes);
                    let task = match &mut self.page {
                        Page::NewSighting(page) => {
                            page.update(message, &mut ctx).map(Message::NewSighting)
                        }
                        _ => Task::none(),
                    };
                    (task, (ctx.notice, ctx.goto))
                };
                self.after(task, effects)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let page: Element<'_, Message> = match &self.page {
            Page::Home(page) => page.view().map(Message::Home),
            Page::Flowers(page) => page.view().map(Message::Flowers),
            Page::LatestSightings(page) => {
                page.view(&self.likes).map(Message::LatestSightings)
            }
            Page::FlowerDetail(page) => page.view(&self.likes).map(Message::FlowerDetail),
            Page::SightingDetail(page) => page
                .view(&self.likes, self.session.user_id())
                .map(Message::SightingDetail),
            Page::Favorites(page) => page.view().map(Message::Favorites),
            Page::NewSighting(page) => page.view().map(Message::NewSighting),
        };

        let mut layout = column![self.header()];
        if let Some(notice) = &self.notice {
            layout = layout.push(notice_banner(notice));
        }
        layout = layout.push(page);

        let base: Element<'_, Message> = layout.into();

        match &self.auth {
            Some(modal) => {
                let overlay = opaque(
                    mouse_area(center(opaque(modal.view().map(Message::Auth))))
                        .on_press(Message::CloseAuth),
                );
                stack(vec![base, overlay]).into()
            }
            None => base,
        }
    }

    fn header(&self) -> Element<'_, Message> {
        let mut bar = row![
            button(text("FlowrSpot").size(22).color(ui::ACCENT))
                .style(button::text)
                .on_press(Message::Go(Route::Home)),
            horizontal_space(),
            nav_link("Flowers", Route::Flowers),
            nav_link("Latest Sightings", Route::LatestSightings),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        if self.session.is_logged_in() {
            bar = bar.push(nav_link("Favorites", Route::Favorites));
            bar = bar.push(text(format!("Hi, {}", self.session.display_name())).size(14));
            bar = bar.push(
                button(text("Logout").size(14))
                    .style(button::text)
                    .on_press(Message::Logout),
            );
        } else {
            bar = bar.push(
                button(text("Login").size(14))
                    .style(button::text)
                    .on_press(Message::OpenLogin),
            );
            bar = bar.push(
                button(text("New Account").size(14))
                    .style(button::primary)
                    .on_press(Message::OpenSignup),
            );
        }

        container(bar).padding(14).width(Length::Fill).into()
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn nav_link(label: &str, route: Route) -> Element<'_, Message> {
    button(text(label).size(14))
        .style(button::text)
        .on_press(Message::Go(route))
        .into()
}

fn notice_banner(notice: &Notice) -> Element<'_, Message> {
    let background = match notice.level {
        NoticeLevel::Info => Color::from_rgb8(0x5B, 0x73, 0x83),
        NoticeLevel::Success => Color::from_rgb8(0x4C, 0x8A, 0x62),
        NoticeLevel::Error => Color::from_rgb8(0xB8, 0x4A, 0x4A),
    };

    container(
        row![
            text(&notice.text).size(14).color(Color::WHITE),
            horizontal_space(),
            button(text("✕").size(12).color(Color::WHITE))
                .style(button::text)
                .on_press(Message::DismissNotice),
        ]
        .align_y(Alignment::Center),
    )
    .padding(10)
    .width(Length::Fill)
    .style(move |_theme: &Theme| container::Style {
        background: Some(background.into()),
        ..container::Style::default()
    })
    .into()
}

fn main() -> iced::Result {
    iced::application("FlowrSpot", Flowrspot::update, Flowrspot::view)
        .theme(Flowrspot::theme)
        .centered()
        .run_with(Flowrspot::new)
}
