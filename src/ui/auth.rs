/// Login / registration modal.
///
/// Both modes end the same way: the server answers with a bearer token,
/// the session begins, and the profile fetch fills in the user id and
/// name cache. The modal reports itself finished once that handshake is
/// done (or as soon as the token is stored, if the profile fetch fails).
use chrono::NaiveDate;
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Element, Length, Task};

use crate::api::models::{AuthResponse, Credentials, Registration, User};
use crate::api::{self, ApiError};
use crate::ui::Ctx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Login,
    Signup,
}

pub struct AuthModal {
    mode: Mode,
    first_name: String,
    last_name: String,
    date_of_birth: String,
    email: String,
    password: String,
    problem: Option<String>,
    busy: bool,
    finished: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    FirstNameChanged(String),
    LastNameChanged(String),
    DateOfBirthChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    Answered(Result<AuthResponse, ApiError>),
    ProfileLoaded(Result<User, ApiError>),
}

impl AuthModal {
    pub fn new(mode: Mode) -> Self {
        AuthModal {
            mode,
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: String::new(),
            email: String::new(),
            password: String::new(),
            problem: None,
            busy: false,
            finished: false,
        }
    }

    /// The shell closes the modal once this turns true.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn update(&mut self, message: Message, ctx: &mut Ctx<'_>) -> Task<Message> {
        match message {
            Message::FirstNameChanged(value) => {
                self.first_name = value;
                Task::none()
            }
            Message::LastNameChanged(value) => {
                self.last_name = value;
                Task::none()
            }
            Message::DateOfBirthChanged(value) => {
                self.date_of_birth = value;
                Task::none()
            }
            Message::EmailChanged(value) => {
                self.email = value;
                Task::none()
            }
            Message::PasswordChanged(value) => {
                self.password = value;
                Task::none()
            }

            Message::Submit => {
                if self.busy {
                    return Task::none();
                }
                if let Err(problem) = self.validate() {
                    self.problem = Some(problem);
                    return Task::none();
                }
                self.problem = None;
                self.busy = true;

                let client = ctx.api.clone();
                match self.mode {
                    Mode::Login => {
                        let credentials = Credentials {
                            email: self.email.trim().to_owned(),
                            password: self.password.clone(),
                        };
                        Task::perform(
                            async move { api::auth::login(&client, &credentials).await },
                            Message::Answered,
                        )
                    }
                    Mode::Signup => {
                        let form = Registration {
                            first_name: self.first_name.trim().to_owned(),
                            last_name: self.last_name.trim().to_owned(),
                            date_of_birth: self.date_of_birth.trim().to_owned(),
                            email: self.email.trim().to_owned(),
                            password: self.password.clone(),
                        };
                        Task::perform(
                            async move { api::auth::register(&client, &form).await },
                            Message::Answered,
                        )
                    }
                }
            }

            Message::Answered(result) => {
                self.busy = false;
                match result {
                    Ok(answer) => {
                        ctx.session.begin(answer.auth_token);
                        match self.mode {
                            Mode::Login => ctx.success("Login successful!"),
                            Mode::Signup => ctx.success("Registration successful! Welcome!"),
                        }

                        let client = ctx.api.clone();
                        let token = ctx.session.token().map(str::to_owned);
                        Task::perform(
                            async move {
                                match token {
                                    Some(token) => api::auth::me(&client, &token).await,
                                    None => Err(ApiError::NotAuthenticated),
                                }
                            },
                            Message::ProfileLoaded,
                        )
                    }
                    Err(err) => {
                        self.problem = Some(err.to_string());
                        Task::none()
                    }
                }
            }

            Message::ProfileLoaded(result) => {
                match result {
                    Ok(user) => ctx.session.attach_user(&user),
                    // The session is live either way; the header just
                    // misses the cached name until the next login.
                    Err(err) => eprintln!("⚠️  Could not fetch the user profile: {err}"),
                }
                self.finished = true;
                Task::none()
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.mode == Mode::Signup {
            if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
                return Err("First and last name are required.".into());
            }
            if NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d").is_err() {
                return Err("Date of birth must look like 1990-04-21.".into());
            }
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err("A valid email is required.".into());
        }
        if self.password.is_empty() {
            return Err("Password is required.".into());
        }
        Ok(())
    }

    pub fn view(&self) -> Element<'_, Message> {
        let title = match self.mode {
            Mode::Login => "Welcome Back",
            Mode::Signup => "Create an Account",
        };

        let mut form = column![text(title).size(24)]
            .spacing(14)
            .align_x(Alignment::Center);

        if self.mode == Mode::Signup {
            form = form.push(
                row![
                    text_input("First Name", &self.first_name)
                        .on_input(Message::FirstNameChanged)
                        .padding(10),
                    text_input("Last Name", &self.last_name)
                        .on_input(Message::LastNameChanged)
                        .padding(10),
                ]
                .spacing(10),
            );
            form = form.push(
                text_input("Date of Birth (1990-04-21)", &self.date_of_birth)
                    .on_input(Message::DateOfBirthChanged)
                    .padding(10),
            );
        }

        form = form.push(
            text_input("Email Address", &self.email)
                .on_input(Message::EmailChanged)
                .padding(10),
        );
        form = form.push(
            text_input("Password", &self.password)
                .secure(true)
                .on_input(Message::PasswordChanged)
                .on_submit(Message::Submit)
                .padding(10),
        );

        if let Some(problem) = &self.problem {
            form = form.push(text(problem).size(13).color(iced::Color::from_rgb(
                0.8, 0.2, 0.2,
            )));
        }

        let submit_label = match (self.mode, self.busy) {
            (_, true) => "Please wait…",
            (Mode::Login, false) => "Login to your Account",
            (Mode::Signup, false) => "Create Account",
        };
        form = form.push(
            button(submit_label)
                .padding(12)
                .style(button::primary)
                .on_press(Message::Submit),
        );

        container(form)
            .padding(28)
            .width(Length::Fixed(400.0))
            .style(container::rounded_box)
            .into()
    }
}
