use iced::Task;
use tracing::{info, warn};
use crate::api::resources;
use crate::app::state::{Screen, ToastKind};
use crate::error::ApiError;
use crate::models::{Credentials, LoginResponse};
use crate::validation::is_valid_email;
use super::super::{App, Message};

impl App {
    pub(crate) fn sign_in(&mut self) -> Task<Message> {
        if self.is_signing_in {
            return Task::none();
        }
        let email = self.login_email.trim().to_string();
        if email.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Please fill in both email and password.".to_string());
            return Task::none();
        }
        if !is_valid_email(&email) {
            self.login_error = Some("Please enter a valid email address.".to_string());
            return Task::none();
        }
        self.login_error = None;
        self.is_signing_in = true;
        let credentials = Credentials { email, password: self.login_password.clone() };
        Task::perform(resources::login(self.api.clone(), credentials), Message::LoggedIn)
    }

    pub(crate) fn signed_in(&mut self, result: Result<LoginResponse, ApiError>) -> Task<Message> {
        self.is_signing_in = false;
        match result {
            Ok(response) => {
                self.login_password.clear();
                self.api.set_token(Some(response.token));
                let role = response.user.role;
                self.toast(ToastKind::Success, format!("Welcome, {}!", response.user.name));
                self.session = Some(response.user);
                self.enter_screen(Screen::home(role))
            }
            Err(err) => {
                warn!("Sign in failed: {}", err);
                self.login_error = Some(err.user_message());
                Task::none()
            }
        }
    }

    pub(crate) fn sign_out(&mut self) -> Task<Message> {
        if let Some(user) = &self.session {
            info!("{} signed out", user.email);
        }
        self.reset_session_state();
        self.current_screen = Screen::Login;
        self.toast(ToastKind::Info, "You have been signed out.");
        Task::none()
    }
}
