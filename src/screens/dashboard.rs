use iced::{Alignment, Length};
use iced::widget::{button, column, horizontal_space, text, Column, Container, Row};
use crate::app::{App, Message};
use crate::style::{accent_card, Accent};
use super::widgets::{icon, icon_button_content, muted};

fn stat_card<'a>(app: &'a App, icon_name: &'a str, label: &'a str, value: u32, accent: Accent) -> Container<'a, Message> {
    let content = Row::new()
        .spacing(15)
        .align_y(Alignment::Center)
        .push(icon(app, icon_name))
        .push(column![muted(label), text(value.to_string()).size(28).color(accent.color())].spacing(4));
    Container::new(content)
        .padding(20)
        .width(Length::Fill)
        .style(accent_card(accent))
}

pub fn dashboard_screen(app: &App) -> Container<Message> {
    let stats = app.dashboard.stats.clone().unwrap_or_default();
    let header = Row::new()
        .align_y(Alignment::Center)
        .push(text("Dashboard").size(26))
        .push(horizontal_space())
        .push(
            button(icon_button_content(icon(app, "rotate"), "Refresh"))
                .on_press_maybe((!app.dashboard.is_loading).then_some(Message::RefreshDashboard)),
        );

    let cards = Row::new()
        .spacing(20)
        .push(stat_card(app, "building", "Organizations", stats.total_organizations, Accent::Blue))
        .push(stat_card(app, "circle-check", "Active organizations", stats.active_organizations, Accent::Green))
        .push(stat_card(app, "users", "Logins", stats.total_logins, Accent::Purple))
        .push(stat_card(app, "user-tie", "Account managers", stats.total_account_managers, Accent::Orange));

    let mut content = Column::new().spacing(25).padding(20).push(header).push(cards);
    if app.dashboard.is_loading {
        content = content.push(muted("Loading statistics..."));
    }
    Container::new(content).width(Length::Fill).height(Length::Fill)
}
