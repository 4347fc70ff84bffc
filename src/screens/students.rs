use iced::{Alignment, Element, Length};
use iced::widget::{button, column, horizontal_space, text, text_input, Column, Container, Row, Scrollable};
use iced_aw::date_picker;
use iced_aw::date_picker::Date;
use crate::app::{App, Message};
use crate::app::state::{CascadeId, DeleteTarget, StudentField, StudentForm};
use crate::csv_template::CsvTemplate;
use super::widgets::{
    cascade_fields, empty_state, error_text, icon, icon_button, icon_button_content, labeled_input, modal, muted,
    pagination_bar, row_card,
};

fn student_form<'a>(app: &'a App, form: &'a StudentForm) -> Element<'a, Message> {
    let errors = &form.errors;
    let date_label = match form.date_of_birth {
        Some(date) => format!("{:02}.{:02}.{}", date.day, date.month, date.year),
        None => "Not chosen".to_string(),
    };
    let date_button = button(icon_button_content(icon(app, "calendar-days"), "Date of birth"))
        .style(button::secondary)
        .on_press(Message::ChooseBirthDate);
    let birth_date = date_picker(
        form.show_date_picker,
        form.date_of_birth.unwrap_or_else(Date::today),
        date_button,
        Message::CancelBirthDate,
        Message::SubmitBirthDate,
    );

    column![
        text("Add student").size(22),
        Row::new()
            .spacing(12)
            .push(labeled_input("Full name", &form.name, |v| Message::StudentFieldChanged(StudentField::Name, v), errors, "name"))
            .push(labeled_input("Email", &form.email, |v| Message::StudentFieldChanged(StudentField::Email, v), errors, "email")),
        Row::new()
            .spacing(12)
            .push(labeled_input("Phone", &form.phone, |v| Message::StudentFieldChanged(StudentField::Phone, v), errors, "phone"))
            .push(labeled_input("Aadhar number", &form.aadhar, |v| Message::StudentFieldChanged(StudentField::Aadhar, v), errors, "aadhar")),
        labeled_input("Roll number", &form.roll_number, |v| Message::StudentFieldChanged(StudentField::RollNumber, v), errors, "rollNumber"),
        cascade_fields(app, CascadeId::StudentForm, 0..3, Some(errors)),
        Row::new().spacing(10).align_y(Alignment::Center).push(birth_date).push(text(date_label)),
    ]
    .push_maybe(error_text(errors.get("dateOfBirth")))
    .push(
        Row::new()
            .spacing(10)
            .push(horizontal_space())
            .push(button("Cancel").style(button::secondary).on_press(Message::ToggleStudentForm(false)))
            .push(
                button(if form.is_saving { "Saving..." } else { "Save" })
                    .on_press_maybe((!form.is_saving).then_some(Message::SubmitStudent)),
            ),
    )
    .spacing(12)
    .into()
}

pub fn students_screen(app: &App) -> Container<Message> {
    let page = &app.students;
    let header = Row::new()
        .align_y(Alignment::Center)
        .spacing(10)
        .push(text("Students").size(26))
        .push(horizontal_space())
        .push(
            icon_button(app, "file-csv", "CSV template")
                .style(button::secondary)
                .on_press(Message::DownloadTemplate(CsvTemplate::Students)),
        )
        .push(icon_button(app, "plus", "Add student").on_press(Message::ToggleStudentForm(true)));

    let filters = row_card(
        app,
        column![
            cascade_fields(app, CascadeId::StudentFilter, 0..3, None),
            Row::new()
                .spacing(10)
                .push(
                    text_input("Search by name, email or roll number", &page.search)
                        .on_input(Message::StudentSearchChanged)
                        .on_submit(Message::StudentApplyFilter)
                        .padding(8),
                )
                .push(icon_button(app, "filter", "Apply").on_press(Message::StudentApplyFilter))
                .push(button("Reset").style(button::secondary).on_press(Message::StudentResetFilter)),
        ]
        .spacing(10),
    );

    let mut list = Column::new().spacing(10);
    if page.is_loading {
        list = list.push(muted("Loading students..."));
    } else if page.rows.is_empty() {
        list = list.push(empty_state("No students found."));
    } else {
        for student in &page.rows {
            let placement = [&student.department_name, &student.class_name, &student.section_name]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" / ");
            let row = Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(
                    column![
                        text(&student.name).size(18),
                        muted(format!("Roll {} · {} · {}", student.roll_number, student.email, student.phone)),
                    ]
                    .spacing(4)
                    .width(Length::Fill),
                )
                .push(muted(placement))
                .push(button(icon(app, "trash")).style(button::danger).on_press(Message::RequestDelete(
                    DeleteTarget::Student(student.id.clone()),
                    format!("Delete student \"{}\"?", student.name),
                )));
            list = list.push(row_card(app, row));
        }
    }

    let base = Column::new()
        .spacing(15)
        .padding(20)
        .push(header)
        .push(filters)
        .push(Scrollable::new(list).height(Length::Fill))
        .push(pagination_bar(page.pagination, Message::StudentPageRequested));

    let content: Element<Message> = match &page.form {
        Some(form) => modal(app, base, student_form(app, form), 680.0).into(),
        None => base.into(),
    };
    Container::new(content).width(Length::Fill).height(Length::Fill)
}
