use iced::{widget::{column, text, Container, vertical_space}, Length, Theme};
use iced::widget::{button, pick_list, text_input, Row};
use crate::app::{App, Message};
use crate::config::{theme_to_str, PAGE_LIMITS};
use super::widgets::{error_text, muted};

pub fn settings_screen(app: &App) -> Container<Message> {
    let current_name = theme_to_str(&app.theme);
    let theme_names: Vec<&'static str> = Theme::ALL.iter().map(theme_to_str).collect();
    let content = column![
        text("Settings").size(30),
        vertical_space().height(10),
        text("Theme").size(16),
        pick_list(theme_names, Some(current_name), Message::ThemeSelected)
            .placeholder("Choose a theme"),
        text("API base URL").size(16),
        text_input("http://localhost:5000/api", &app.settings.api_base_url)
            .on_input(Message::SettingsApiUrlChanged)
            .padding(8)
            .width(Length::Fixed(420.0)),
        muted("Overridden at start-up by SCHOOL_ADMIN_API_URL when set."),
        text("Rows per page").size(16),
        pick_list(PAGE_LIMITS, Some(app.settings.page_limit), Message::SettingsPageLimitSelected),
    ]
    .push_maybe(error_text(app.settings.error.as_deref()))
    .push(Row::new().push(button("Save settings").on_press(Message::SaveSettings)))
    .spacing(12);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
}
