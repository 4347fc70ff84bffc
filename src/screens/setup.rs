use iced::{Alignment, Element, Length};
use iced::widget::{button, column, horizontal_space, text, text_input, Column, Container, Row, Scrollable};
use iced::widget::container::bordered_box;
use crate::api::resources::StructureKind;
use crate::app::{App, Message};
use crate::app::state::{CascadeId, DeleteTarget, SetupField, CLASS_LEVEL, DEPARTMENT_LEVEL, ORG_LEVEL, SECTION_LEVEL};
use super::widgets::{cascade_fields, error_text, icon, muted};

/// A list of the records at one cascade level with an inline "add" form underneath.
fn level_panel<'a>(
    app: &'a App,
    kind: StructureKind,
    level: usize,
    input: &'a str,
    field: SetupField,
) -> Element<'a, Message> {
    let setup = &app.setup;
    let chain = &setup.chain;
    let parent_ready = chain.selected(level - 1).is_some();
    let mut list = Column::new().spacing(6);

    if !parent_ready {
        let parent = chain.levels()[level - 1].key.label().to_lowercase();
        list = list.push(muted(format!("Select a {} to see its {}s.", parent, kind.label().to_lowercase())));
    } else if chain.is_loading(level) {
        list = list.push(muted("Loading..."));
    } else if chain.options(level).is_empty() {
        list = list.push(muted(format!("No {}s yet.", kind.label().to_lowercase())));
    } else {
        for option in chain.options(level) {
            let is_selected = chain.selected(level) == Some(option.value.as_str());
            let style = if is_selected { button::primary } else { button::secondary };
            list = list.push(
                Row::new()
                    .spacing(6)
                    .align_y(Alignment::Center)
                    .push(
                        button(text(&option.label))
                            .style(style)
                            .width(Length::Fill)
                            .on_press(Message::CascadeSelected(CascadeId::Setup, level, option.value.clone())),
                    )
                    .push(button(icon(app, "trash")).style(button::danger).on_press(Message::RequestDelete(
                        DeleteTarget::Structure(kind, option.value.clone()),
                        format!("Delete {} \"{}\" and everything under it?", kind.label().to_lowercase(), option.label),
                    ))),
            );
        }
    }

    let saving = setup.saving == Some(kind);
    let add = Row::new()
        .spacing(6)
        .push(
            text_input(&format!("New {} name", kind.label().to_lowercase()), input)
                .on_input(move |v| Message::SetupFieldChanged(field, v))
                .on_submit(Message::CreateStructure(kind))
                .padding(6),
        )
        .push(button(icon(app, "plus")).on_press_maybe((parent_ready && !saving).then_some(Message::CreateStructure(kind))));

    let error_field = match kind {
        StructureKind::Department => "department",
        StructureKind::Class => "class",
        StructureKind::Section => "section",
        StructureKind::Subject => "subject",
    };
    let panel = column![text(format!("{}s", kind.label())).size(18), Scrollable::new(list).height(Length::Fixed(260.0)), add]
        .push_maybe(error_text(setup.errors.get(error_field)))
        .spacing(10);

    Container::new(panel)
        .padding(12)
        .width(Length::FillPortion(1))
        .style(move |_| bordered_box(&app.theme))
        .into()
}

fn subjects_panel(app: &App) -> Element<'_, Message> {
    let setup = &app.setup;
    let department_ready = setup.chain.selected(DEPARTMENT_LEVEL).is_some();
    let mut list = Column::new().spacing(6);
    if !department_ready {
        list = list.push(muted("Select a department to see its subjects."));
    } else if setup.subjects_loading {
        list = list.push(muted("Loading..."));
    } else if setup.subjects.is_empty() {
        list = list.push(muted("No subjects yet."));
    } else {
        for subject in &setup.subjects {
            list = list.push(
                Row::new()
                    .spacing(6)
                    .align_y(Alignment::Center)
                    .push(text(subject.to_string()).width(Length::Fill))
                    .push(button(icon(app, "trash")).style(button::danger).on_press(Message::RequestDelete(
                        DeleteTarget::Structure(StructureKind::Subject, subject.id.clone()),
                        format!("Delete subject \"{}\"?", subject.name),
                    ))),
            );
        }
    }
    let can_add = department_ready && setup.saving != Some(StructureKind::Subject);
    let add = Row::new()
        .spacing(6)
        .push(
            text_input("Subject name", &setup.new_subject_name)
                .on_input(|v| Message::SetupFieldChanged(SetupField::SubjectName, v))
                .padding(6),
        )
        .push(
            text_input("Code", &setup.new_subject_code)
                .on_input(|v| Message::SetupFieldChanged(SetupField::SubjectCode, v))
                .on_submit(Message::CreateStructure(StructureKind::Subject))
                .padding(6)
                .width(Length::Fixed(90.0)),
        )
        .push(button(icon(app, "plus")).on_press_maybe(can_add.then_some(Message::CreateStructure(StructureKind::Subject))));

    Container::new(
        column![text("Subjects").size(18), Scrollable::new(list).height(Length::Fixed(260.0)), add]
            .push_maybe(error_text(setup.errors.get("subject")))
            .spacing(10),
    )
    .padding(12)
    .width(Length::FillPortion(1))
    .style(move |_| bordered_box(&app.theme))
    .into()
}

pub fn setup_screen(app: &App) -> Container<Message> {
    let setup = &app.setup;
    let content = Column::new()
        .spacing(15)
        .padding(20)
        .push(Row::new().push(text("Organization setup").size(26)).push(horizontal_space()))
        .push(cascade_fields(app, CascadeId::Setup, 0..3, Some(&setup.errors)))
        .push(cascade_fields(app, CascadeId::Setup, ORG_LEVEL..ORG_LEVEL + 1, Some(&setup.errors)))
        .push(
            Row::new()
                .spacing(12)
                .push(level_panel(app, StructureKind::Department, DEPARTMENT_LEVEL, &setup.new_department, SetupField::Department))
                .push(level_panel(app, StructureKind::Class, CLASS_LEVEL, &setup.new_class, SetupField::Class))
                .push(level_panel(app, StructureKind::Section, SECTION_LEVEL, &setup.new_section, SetupField::Section))
                .push(subjects_panel(app)),
        );

    Container::new(Scrollable::new(content)).width(Length::Fill).height(Length::Fill)
}
