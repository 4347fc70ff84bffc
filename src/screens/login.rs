use iced::{widget::{column, text, text_input, button, vertical_space, Container}, Length, Center};
use crate::app::{App, Message};
use super::widgets::error_text;

pub fn login_screen(app: &App) -> Container<Message> {
    let submit = (!app.is_signing_in).then_some(Message::LoginPressed);
    let content = column![
        text("School Admin").size(30),
        text("Sign in to manage organizations and schools").size(16),
        vertical_space().height(20),
        text_input("Email", &app.login_email)
            .on_input(Message::LoginEmailChanged)
            .on_submit(Message::LoginPressed)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        text_input("Password", &app.login_password)
            .on_input(Message::LoginPasswordChanged)
            .on_submit(Message::LoginPressed)
            .secure(true)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        button(if app.is_signing_in { "Signing in..." } else { "Sign in" })
            .on_press_maybe(submit)
            .padding(10),
    ]
    .push_maybe(error_text(app.login_error.as_deref()))
    .spacing(15)
    .width(Length::Fill)
    .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_y(Length::Fill)
        .padding(40)
}
