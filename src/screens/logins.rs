use iced::{Alignment, Length};
use iced::widget::{button, column, horizontal_space, pick_list, text, Column, Container, Row, Scrollable};
use crate::app::{App, Message};
use crate::app::state::{CascadeId, LoginField, ORG_LEVEL};
use crate::csv_template::CsvTemplate;
use crate::models::LoginType;
use super::widgets::{cascade_fields, icon_button, labeled_input, muted, row_card, secret_input};

pub fn logins_screen(app: &App) -> Container<Message> {
    let page = &app.logins;
    let depth = page.login_type.required_depth();
    let errors = &page.errors;

    let header = Row::new()
        .align_y(Alignment::Center)
        .push(text("Create logins").size(26))
        .push(horizontal_space())
        .push(icon_button(app, "file-csv", "Download CSV template").on_press(Message::DownloadTemplate(CsvTemplate::Logins)));

    let type_picker = column![
        text("Login type").size(14),
        pick_list(LoginType::ALL, Some(page.login_type), Message::LoginTypeSelected).width(Length::Fixed(220.0)),
    ]
    .spacing(4);

    let mut placement = Column::new()
        .spacing(10)
        .push(cascade_fields(app, CascadeId::LoginForm, 0..3, Some(errors)))
        .push(cascade_fields(app, CascadeId::LoginForm, ORG_LEVEL..depth.min(ORG_LEVEL + 2), Some(errors)));
    if depth > ORG_LEVEL + 2 {
        placement = placement.push(cascade_fields(app, CascadeId::LoginForm, ORG_LEVEL + 2..depth, Some(errors)));
    }

    let mut personal = Column::new()
        .spacing(10)
        .push(
            Row::new()
                .spacing(12)
                .push(labeled_input("Full name", &page.name, |v| Message::LoginFieldChanged(LoginField::Name, v), errors, "name"))
                .push(labeled_input("Email", &page.email, |v| Message::LoginFieldChanged(LoginField::Email, v), errors, "email")),
        )
        .push(
            Row::new()
                .spacing(12)
                .push(labeled_input("Phone", &page.phone, |v| Message::LoginFieldChanged(LoginField::Phone, v), errors, "phone"))
                .push(secret_input("Password", &page.password, |v| Message::LoginFieldChanged(LoginField::Password, v), errors, "password")),
        );
    match page.login_type {
        LoginType::Hod | LoginType::Teacher => {
            personal = personal.push(
                Row::new()
                    .spacing(12)
                    .push(labeled_input(
                        "Qualification",
                        &page.qualification,
                        |v| Message::LoginFieldChanged(LoginField::Qualification, v),
                        errors,
                        "qualification",
                    ))
                    .push(labeled_input(
                        "Experience (years)",
                        &page.experience,
                        |v| Message::LoginFieldChanged(LoginField::Experience, v),
                        errors,
                        "experience",
                    )),
            );
        }
        LoginType::Student => {
            personal = personal.push(labeled_input(
                "Roll number",
                &page.roll_number,
                |v| Message::LoginFieldChanged(LoginField::RollNumber, v),
                errors,
                "rollNumber",
            ));
        }
        LoginType::Principal => {}
    }

    let submit_label = if page.is_saving { "Creating..." } else { "Create login" };
    let content = Column::new()
        .spacing(15)
        .padding(20)
        .push(header)
        .push(row_card(
            app,
            column![type_picker, muted(format!("A {} login needs the first {} levels below.", page.login_type, depth)), placement]
                .spacing(10),
        ))
        .push(row_card(app, personal))
        .push(
            Row::new()
                .push(horizontal_space())
                .push(button(submit_label).on_press_maybe((!page.is_saving).then_some(Message::SubmitLogin))),
        );

    Container::new(Scrollable::new(content)).width(Length::Fill).height(Length::Fill)
}
