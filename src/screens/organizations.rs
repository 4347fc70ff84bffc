use iced::{Alignment, Element, Length};
use iced::widget::{button, column, horizontal_space, row, text, text_input, Column, Container, PickList, Row, Scrollable};
use crate::app::{App, Message};
use crate::app::state::{CascadeId, DeleteTarget, OrgField, OrganizationForm};
use crate::models::Organization;
use crate::style::{accent_card, Accent};
use super::widgets::{
    cascade_fields, empty_state, icon, icon_button, labeled_input, modal, muted, pagination_bar, row_card,
};

fn status_badge<'a>(active: bool) -> Container<'a, Message> {
    let (label, accent) = if active { ("Active", Accent::Green) } else { ("Inactive", Accent::Red) };
    Container::new(text(label).size(13).color(accent.color()))
        .padding([2, 8])
        .style(accent_card(accent))
}

fn organization_row<'a>(app: &'a App, org: &'a Organization) -> Container<'a, Message> {
    let location = [org.district.as_str(), org.state.as_str(), org.country.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let details = column![
        Row::new().spacing(10).align_y(Alignment::Center).push(text(&org.name).size(18)).push(status_badge(org.is_active)),
        muted(format!("{} · {}", org.email, org.phone)),
        muted(location),
    ]
    .push_maybe(org.account_manager_name.as_deref().map(|name| muted(format!("Account manager: {}", name))))
    .spacing(4)
    .width(Length::Fill);

    let toggle_icon = if org.is_active { "toggle-on" } else { "toggle-off" };
    let actions = row![
        button(icon(app, "pen")).style(button::secondary).on_press(Message::OpenOrganizationForm(Some(org.clone()))),
        button(icon(app, toggle_icon)).style(button::secondary).on_press(Message::ToggleOrganizationStatus(org.id.clone())),
        button(icon(app, "trash")).style(button::danger).on_press(Message::RequestDelete(
            DeleteTarget::Organization(org.id.clone()),
            format!("Delete organization \"{}\"?", org.name),
        )),
    ]
    .spacing(6);

    row_card(app, Row::new().spacing(10).align_y(Alignment::Center).push(details).push(actions))
}

fn organization_form<'a>(app: &'a App, form: &'a OrganizationForm) -> Element<'a, Message> {
    let title = if form.editing_id.is_some() { "Edit organization" } else { "Add organization" };
    let manager_picker = PickList::new(
        app.organizations.account_managers.as_slice(),
        form.account_manager.clone(),
        Message::OrgFormManagerSelected,
    )
    .placeholder("Select account manager (optional)")
    .width(Length::Fill);
    let save_label = if form.is_saving { "Saving..." } else { "Save" };

    column![
        text(title).size(22),
        Row::new()
            .spacing(12)
            .push(labeled_input("Name", &form.name, |v| Message::OrgFormFieldChanged(OrgField::Name, v), &form.errors, "name"))
            .push(labeled_input("Email", &form.email, |v| Message::OrgFormFieldChanged(OrgField::Email, v), &form.errors, "email")),
        Row::new()
            .spacing(12)
            .push(labeled_input("Phone", &form.phone, |v| Message::OrgFormFieldChanged(OrgField::Phone, v), &form.errors, "phone"))
            .push(labeled_input("Address", &form.address, |v| Message::OrgFormFieldChanged(OrgField::Address, v), &form.errors, "address")),
        cascade_fields(app, CascadeId::OrganizationForm, 0..3, Some(&form.errors)),
        column![text("Account manager").size(14), manager_picker].spacing(4),
        Row::new()
            .spacing(10)
            .push(horizontal_space())
            .push(button("Cancel").style(button::secondary).on_press(Message::CloseOrganizationForm))
            .push(button(save_label).on_press_maybe((!form.is_saving).then_some(Message::SubmitOrganization))),
    ]
    .spacing(14)
    .into()
}

pub fn organizations_screen(app: &App) -> Container<Message> {
    let page = &app.organizations;
    let header = Row::new()
        .align_y(Alignment::Center)
        .push(text("Organizations").size(26))
        .push(horizontal_space())
        .push(icon_button(app, "plus", "Add organization").on_press(Message::OpenOrganizationForm(None)));

    let filters = row_card(
        app,
        column![
            cascade_fields(app, CascadeId::OrganizationFilter, 0..3, None),
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(
                    text_input("Search by name", &page.search)
                        .on_input(Message::OrgSearchChanged)
                        .on_submit(Message::OrgApplyFilter)
                        .padding(8),
                )
                .push(icon_button(app, "filter", "Apply").on_press(Message::OrgApplyFilter))
                .push(button("Reset").style(button::secondary).on_press(Message::OrgResetFilter)),
        ]
        .spacing(10),
    );

    let mut list = Column::new().spacing(10);
    if page.is_loading {
        list = list.push(muted("Loading organizations..."));
    } else if page.rows.is_empty() {
        list = list.push(empty_state("No organizations found."));
    } else {
        for org in &page.rows {
            list = list.push(organization_row(app, org));
        }
    }

    let base = Column::new()
        .spacing(15)
        .padding(20)
        .push(header)
        .push(filters)
        .push(Scrollable::new(list).height(Length::Fill))
        .push(pagination_bar(page.pagination, Message::OrgPageRequested));

    let content: Element<Message> = match &page.form {
        Some(form) => modal(app, base, organization_form(app, form), 640.0).into(),
        None => base.into(),
    };
    Container::new(content).width(Length::Fill).height(Length::Fill)
}
