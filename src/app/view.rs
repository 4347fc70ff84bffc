use iced::{Element, Length};
use iced::widget::{Container, Row, Stack};
use crate::app::state::Screen;
use crate::screens::widgets::{delete_dialog, toast_stack};
use crate::screens::{
    account_managers_screen, assignments_screen, dashboard_screen, login_screen, logins_screen, nav_menu,
    organizations_screen, settings_screen, setup_screen, students_screen, teachers_screen,
};
use super::{App, Message};

impl App {
    pub fn view(&self) -> Element<Message> {
        let screen = match self.current_screen {
            Screen::Login => login_screen(self),
            Screen::Dashboard => dashboard_screen(self),
            Screen::Organizations => organizations_screen(self),
            Screen::OrganizationSetup => setup_screen(self),
            Screen::Logins => logins_screen(self),
            Screen::AccountManagers => account_managers_screen(self),
            Screen::Students => students_screen(self),
            Screen::Teachers => teachers_screen(self),
            Screen::Assignments => assignments_screen(self),
            Screen::Settings => settings_screen(self),
        }
        .width(Length::Fill);

        // Sidebar only once signed in
        let mut layout = Row::new().spacing(20);
        if self.session.is_some() && self.current_screen != Screen::Login {
            layout = layout.push(
                Container::new(nav_menu(self))
                    .width(Length::Fixed(200.0))
                    .height(Length::Fill)
                    .padding(10),
            );
        }
        let layout = layout.push(screen);

        let mut stack = Stack::new().push(layout);
        if let Some(toasts) = toast_stack(self) {
            stack = stack.push(toasts);
        }
        if let Some(dialog) = delete_dialog(self) {
            stack = stack.push(dialog);
        }
        stack.into()
    }
}
