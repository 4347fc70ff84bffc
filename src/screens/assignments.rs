use iced::{Alignment, Element, Length};
use iced::widget::{button, checkbox, column, horizontal_space, text, Column, Container, PickList, Row, Scrollable};
use crate::app::{App, Message};
use crate::app::state::{AssignmentForm, CascadeId, DeleteTarget};
use crate::grouping::{group, section_key, DepartmentGroup};
use crate::models::AssignmentRecord;
use crate::style::{accent_card, Accent};
use super::widgets::{cascade_fields, empty_state, error_text, icon, icon_button, icon_button_content, modal, muted, row_card};

fn chevron(open: bool) -> &'static str {
    if open { "chevron-down" } else { "chevron-right" }
}

fn assignment_row<'a>(app: &'a App, record: &'a AssignmentRecord) -> Element<'a, Message> {
    let teacher = record.teacher_name.clone().unwrap_or_else(|| record.teacher_id.clone());
    let subjects = if record.subject_names.is_empty() {
        format!("{} subjects", record.subject_ids.len())
    } else {
        record.subject_names.join(", ")
    };
    let mut row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(column![text(teacher).size(16), muted(subjects)].spacing(2).width(Length::Fill));
    if record.is_class_teacher {
        row = row.push(
            Container::new(text("Class teacher").size(12).color(Accent::Purple.color()))
                .padding([2, 8])
                .style(accent_card(Accent::Purple)),
        );
    }
    row.push(button(icon(app, "trash")).style(button::danger).on_press(Message::RequestDelete(
        DeleteTarget::Assignment(record.id.clone()),
        "Remove this teacher assignment?".to_string(),
    )))
    .into()
}

fn department_tree<'a>(app: &'a App, department: DepartmentGroup<'a>) -> Element<'a, Message> {
    let expansion = &app.assignments.expansion;
    let open = expansion.is_department_open(department.department_id);
    let header = button(
        Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(icon(app, chevron(open)))
            .push(text(department.label.clone()).size(18))
            .push(horizontal_space())
            .push(muted(format!("{} assignments", department.assignment_count()))),
    )
    .style(button::text)
    .width(Length::Fill)
    .on_press(Message::ToggleDepartment(department.department_id.to_string()));

    let mut body = Column::new().spacing(8).push(header);
    if open {
        for class in department.classes {
            body = body.push(Container::new(text(format!("Class {}", class.label)).size(16)).padding([0, 24]));
            for section in class.sections {
                let key = section_key(department.department_id, class.class_id, section.section_id);
                let section_open = expansion.is_section_open(&key);
                let mut section_column = Column::new().spacing(6).push(
                    button(
                        Row::new()
                            .spacing(8)
                            .align_y(Alignment::Center)
                            .push(icon(app, chevron(section_open)))
                            .push(text(format!("Section {}", section.label)))
                            .push(muted(format!("({})", section.records.len()))),
                    )
                    .style(button::text)
                    .on_press(Message::ToggleSection(key)),
                );
                if section_open {
                    for record in section.records {
                        section_column = section_column.push(row_card(app, assignment_row(app, record)));
                    }
                }
                body = body.push(Container::new(section_column).padding([0, 48]));
            }
        }
    }
    row_card(app, body).into()
}

fn assignment_form<'a>(app: &'a App, form: &'a AssignmentForm) -> Element<'a, Message> {
    let errors = &form.errors;
    let teacher_placeholder = if form.options_for.is_none() {
        "Select a department first"
    } else if form.options_loading {
        "Loading..."
    } else {
        "Select teacher"
    };
    let teacher_picker = PickList::new(form.teachers.as_slice(), form.teacher.clone(), Message::AssignmentTeacherSelected)
        .placeholder(teacher_placeholder)
        .width(Length::Fill);

    let mut subjects = Column::new().spacing(6);
    if form.options_for.is_some() && !form.options_loading && form.subjects.is_empty() {
        subjects = subjects.push(muted("This department has no subjects yet."));
    }
    for subject in &form.subjects {
        let id = subject.id.clone();
        subjects = subjects.push(
            checkbox(subject.to_string(), form.selected_subjects.contains(&subject.id))
                .on_toggle(move |checked| Message::AssignmentSubjectToggled(id.clone(), checked)),
        );
    }

    column![
        text("Assign teacher").size(22),
        cascade_fields(app, CascadeId::AssignmentForm, 0..3, Some(errors)),
        column![text("Teacher").size(14), teacher_picker].push_maybe(error_text(errors.get("teacher"))).spacing(4),
        column![text("Subjects").size(14), Scrollable::new(subjects).height(Length::Fixed(160.0))]
            .push_maybe(error_text(errors.get("subjects")))
            .spacing(4),
        checkbox("Class teacher for this section", form.is_class_teacher).on_toggle(Message::AssignmentClassTeacherToggled),
        Row::new()
            .spacing(10)
            .push(horizontal_space())
            .push(button("Cancel").style(button::secondary).on_press(Message::ToggleAssignmentForm(false)))
            .push(
                button(if form.is_saving { "Saving..." } else { "Assign" })
                    .on_press_maybe((!form.is_saving).then_some(Message::SubmitAssignment)),
            ),
    ]
    .spacing(12)
    .into()
}

pub fn assignments_screen(app: &App) -> Container<Message> {
    let page = &app.assignments;
    let header = Row::new()
        .align_y(Alignment::Center)
        .spacing(10)
        .push(text("Teacher assignments").size(26))
        .push(horizontal_space())
        .push(button(icon_button_content(icon(app, "rotate"), "Reload")).style(button::secondary).on_press(Message::LoadAssignments))
        .push(icon_button(app, "plus", "Assign teacher").on_press(Message::ToggleAssignmentForm(true)));

    let mut tree = Column::new().spacing(10);
    if page.is_loading {
        tree = tree.push(muted("Loading assignments..."));
    } else if page.records.is_empty() {
        tree = tree.push(empty_state("No teachers have been assigned yet."));
    } else {
        for department in group(&page.records) {
            tree = tree.push(department_tree(app, department));
        }
    }

    let base = Column::new()
        .spacing(15)
        .padding(20)
        .push(header)
        .push(Scrollable::new(tree).height(Length::Fill));

    let content: Element<Message> = match &page.form {
        Some(form) => modal(app, base, assignment_form(app, form), 620.0).into(),
        None => base.into(),
    };
    Container::new(content).width(Length::Fill).height(Length::Fill)
}
