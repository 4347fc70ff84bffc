use iced::{Alignment, Element, Length};
use iced::widget::{button, column, horizontal_space, text, text_input, Column, Container, Row, Scrollable};
use crate::app::{App, Message};
use crate::app::state::{AccountManagerForm, DeleteTarget, ManagerField};
use super::widgets::{empty_state, icon, icon_button, labeled_input, modal, muted, pagination_bar, row_card};

fn manager_form<'a>(form: &'a AccountManagerForm) -> Element<'a, Message> {
    let errors = &form.errors;
    column![
        text("Add account manager").size(22),
        labeled_input("Name", &form.name, |v| Message::ManagerFieldChanged(ManagerField::Name, v), errors, "name"),
        labeled_input("Email", &form.email, |v| Message::ManagerFieldChanged(ManagerField::Email, v), errors, "email"),
        labeled_input("Phone", &form.phone, |v| Message::ManagerFieldChanged(ManagerField::Phone, v), errors, "phone"),
        Row::new()
            .spacing(10)
            .push(horizontal_space())
            .push(button("Cancel").style(button::secondary).on_press(Message::ToggleManagerForm(false)))
            .push(
                button(if form.is_saving { "Saving..." } else { "Save" })
                    .on_press_maybe((!form.is_saving).then_some(Message::SubmitManager)),
            ),
    ]
    .spacing(12)
    .into()
}

pub fn account_managers_screen(app: &App) -> Container<Message> {
    let page = &app.account_managers;
    let header = Row::new()
        .align_y(Alignment::Center)
        .spacing(10)
        .push(text("Account managers").size(26))
        .push(horizontal_space())
        .push(
            text_input("Search by name or email", &page.search)
                .on_input(Message::ManagerSearchChanged)
                .on_submit(Message::ManagerApplySearch)
                .padding(8)
                .width(Length::Fixed(280.0)),
        )
        .push(button(icon(app, "magnifying-glass")).on_press(Message::ManagerApplySearch))
        .push(icon_button(app, "plus", "Add manager").on_press(Message::ToggleManagerForm(true)));

    let mut list = Column::new().spacing(10);
    if page.is_loading {
        list = list.push(muted("Loading account managers..."));
    } else if page.rows.is_empty() {
        list = list.push(empty_state("No account managers found."));
    }
    for manager in page.rows.iter().filter(|_| !page.is_loading) {
        let row = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(
                column![text(&manager.name).size(18), muted(format!("{} · {}", manager.email, manager.phone))]
                    .spacing(4)
                    .width(Length::Fill),
            )
            .push(muted(format!("{} organizations", manager.organization_count)))
            .push(button(icon(app, "trash")).style(button::danger).on_press(Message::RequestDelete(
                DeleteTarget::AccountManager(manager.id.clone()),
                format!("Delete account manager \"{}\"?", manager.name),
            )));
        list = list.push(row_card(app, row));
    }

    let base = Column::new()
        .spacing(15)
        .padding(20)
        .push(header)
        .push(Scrollable::new(list).height(Length::Fill))
        .push(pagination_bar(page.pagination, Message::ManagerPageRequested));

    let content: Element<Message> = match &page.form {
        Some(form) => modal(app, base, manager_form(form), 460.0).into(),
        None => base.into(),
    };
    Container::new(content).width(Length::Fill).height(Length::Fill)
}
