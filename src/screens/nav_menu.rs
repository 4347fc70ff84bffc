use iced::{widget::{button, column}, Length};
use iced::widget::{text, vertical_space, Column, Container};
use crate::app::{App, Message};
use crate::app::state::Screen;
use crate::models::Role;
use super::widgets::{icon, icon_button_content, muted};

fn nav_button<'a>(app: &'a App, icon_name: &'a str, label: &'a str, screen: Screen) -> iced::widget::Button<'a, Message> {
    let style = if app.current_screen == screen { button::primary } else { button::text };
    button(icon_button_content(icon(app, icon_name), label))
        .style(style)
        .on_press(Message::Navigate(screen))
        .width(Length::Fill)
}

pub fn nav_menu(app: &App) -> Container<Message> {
    let Some(user) = &app.session else {
        return Container::new(Column::new());
    };
    let links = match user.role {
        Role::MasterAdmin => column![
            nav_button(app, "gauge", "Dashboard", Screen::Dashboard),
            nav_button(app, "building", "Organizations", Screen::Organizations),
            nav_button(app, "sitemap", "Organization setup", Screen::OrganizationSetup),
            nav_button(app, "user-plus", "Create logins", Screen::Logins),
            nav_button(app, "user-tie", "Account managers", Screen::AccountManagers),
        ],
        Role::OrgAdmin => column![
            nav_button(app, "user-graduate", "Students", Screen::Students),
            nav_button(app, "chalkboard-user", "Teachers", Screen::Teachers),
            nav_button(app, "list-check", "Assignments", Screen::Assignments),
        ],
    }
    .spacing(10);

    let header = column![text(&user.name).size(18), muted(&user.email)]
        .push_maybe(user.organization_name.as_deref().map(muted))
        .spacing(2);

    let content = column![
        header,
        links,
        vertical_space(),
        nav_button(app, "gear", "Settings", Screen::Settings),
        button(icon_button_content(icon(app, "arrow-right-from-bracket"), "Logout"))
            .style(button::text)
            .on_press(Message::Logout)
            .width(Length::Fill),
    ]
    .spacing(20);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
}
