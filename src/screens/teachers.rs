use iced::{Alignment, Element, Length};
use iced::widget::{button, column, horizontal_space, text, text_input, Column, Container, Row, Scrollable};
use crate::app::{App, Message};
use crate::app::state::{CascadeId, DeleteTarget, TeacherField, TeacherForm};
use crate::csv_template::CsvTemplate;
use super::widgets::{cascade_fields, empty_state, icon, icon_button, labeled_input, modal, muted, pagination_bar, row_card};

fn teacher_form<'a>(app: &'a App, form: &'a TeacherForm) -> Element<'a, Message> {
    let errors = &form.errors;
    column![
        text("Add teacher").size(22),
        Row::new()
            .spacing(12)
            .push(labeled_input("Full name", &form.name, |v| Message::TeacherFieldChanged(TeacherField::Name, v), errors, "name"))
            .push(labeled_input("Email", &form.email, |v| Message::TeacherFieldChanged(TeacherField::Email, v), errors, "email")),
        Row::new()
            .spacing(12)
            .push(labeled_input("Phone", &form.phone, |v| Message::TeacherFieldChanged(TeacherField::Phone, v), errors, "phone"))
            .push(labeled_input(
                "Qualification",
                &form.qualification,
                |v| Message::TeacherFieldChanged(TeacherField::Qualification, v),
                errors,
                "qualification",
            )),
        Row::new()
            .spacing(12)
            .push(labeled_input(
                "Experience (years)",
                &form.experience,
                |v| Message::TeacherFieldChanged(TeacherField::Experience, v),
                errors,
                "experience",
            ))
            .push(cascade_fields(app, CascadeId::TeacherForm, 0..1, Some(errors))),
        Row::new()
            .spacing(10)
            .push(horizontal_space())
            .push(button("Cancel").style(button::secondary).on_press(Message::ToggleTeacherForm(false)))
            .push(
                button(if form.is_saving { "Saving..." } else { "Save" })
                    .on_press_maybe((!form.is_saving).then_some(Message::SubmitTeacher)),
            ),
    ]
    .spacing(12)
    .into()
}

pub fn teachers_screen(app: &App) -> Container<Message> {
    let page = &app.teachers;
    let header = Row::new()
        .align_y(Alignment::Center)
        .spacing(10)
        .push(text("Teachers").size(26))
        .push(horizontal_space())
        .push(
            text_input("Search teachers", &page.search)
                .on_input(Message::TeacherSearchChanged)
                .on_submit(Message::TeacherApplySearch)
                .padding(8)
                .width(Length::Fixed(260.0)),
        )
        .push(button(icon(app, "magnifying-glass")).on_press(Message::TeacherApplySearch))
        .push(
            icon_button(app, "file-csv", "CSV template")
                .style(button::secondary)
                .on_press(Message::DownloadTemplate(CsvTemplate::Teachers)),
        )
        .push(icon_button(app, "plus", "Add teacher").on_press(Message::ToggleTeacherForm(true)));

    let mut list = Column::new().spacing(10);
    if page.is_loading {
        list = list.push(muted("Loading teachers..."));
    } else if page.rows.is_empty() {
        list = list.push(empty_state("No teachers found."));
    } else {
        for teacher in &page.rows {
            let experience = teacher
                .experience
                .map(|years| format!("{} yrs", years))
                .unwrap_or_default();
            let row = Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(
                    column![text(&teacher.name).size(18), muted(format!("{} · {}", teacher.email, teacher.phone))]
                        .spacing(4)
                        .width(Length::Fill),
                )
                .push(muted(format!(
                    "{} {} {}",
                    teacher.qualification,
                    experience,
                    teacher.department_name.as_deref().unwrap_or("")
                )))
                .push(button(icon(app, "trash")).style(button::danger).on_press(Message::RequestDelete(
                    DeleteTarget::Teacher(teacher.id.clone()),
                    format!("Delete teacher \"{}\"?", teacher.name),
                )));
            list = list.push(row_card(app, row));
        }
    }

    let base = Column::new()
        .spacing(15)
        .padding(20)
        .push(header)
        .push(Scrollable::new(list).height(Length::Fill))
        .push(pagination_bar(page.pagination, Message::TeacherPageRequested));

    let content: Element<Message> = match &page.form {
        Some(form) => modal(app, base, teacher_form(app, form), 640.0).into(),
        None => base.into(),
    };
    Container::new(content).width(Length::Fill).height(Length::Fill)
}
