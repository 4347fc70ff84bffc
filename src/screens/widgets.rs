//! Pieces shared by several screens: cascading pick lists, the pagination bar,
//! modal overlays, toasts and the delete confirmation dialog.

use std::ops::Range;
use iced::{Alignment, Color, Element, Length, Renderer, Theme};
use iced::widget::{button, column, horizontal_space, mouse_area, text, text_input, Button, Column, Container, PickList, Row, Stack, Text};
use iced::widget::container::{background, bordered_box};
use iced_font_awesome::fa_icon_solid;
use crate::app::{App, Message};
use crate::app::state::{CascadeId, ToastKind};
use crate::pagination::Pagination;
use crate::style::{accent_card, Accent, ERROR_TEXT, MUTED_TEXT, OVERLAY};
use crate::validation::FieldErrors;

pub fn icon_button_content<'a>(
    icon_element: impl Into<Element<'a, Message, Theme, Renderer>>,
    label: &'a str,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(icon_element)
        .push(text(label))
}

pub fn icon<'a>(app: &'a App, name: &'a str) -> Element<'a, Message> {
    fa_icon_solid(name).style(move |_| text::base(&app.theme)).into()
}

pub fn icon_button<'a>(app: &'a App, name: &'a str, label: &'a str) -> Button<'a, Message> {
    button(icon_button_content(icon(app, name), label)).padding([6, 12])
}

pub fn error_text<'a>(message: Option<&'a str>) -> Option<Element<'a, Message>> {
    message.map(|m| Text::new(m).size(13).color(ERROR_TEXT).into())
}

pub fn muted<'a>(content: impl text::IntoFragment<'a>) -> Text<'a> {
    Text::new(content).size(14).color(MUTED_TEXT)
}

/// Label, input and the field's error message stacked vertically.
pub fn labeled_input<'a>(
    label: &'a str,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
    errors: &'a FieldErrors,
    field: &'a str,
) -> Column<'a, Message> {
    column![
        text(label).size(14),
        text_input(label, value).on_input(on_input).padding(8),
    ]
    .push_maybe(error_text(errors.get(field)))
    .spacing(4)
    .width(Length::Fill)
}

pub fn secret_input<'a>(
    label: &'a str,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
    errors: &'a FieldErrors,
    field: &'a str,
) -> Column<'a, Message> {
    column![
        text(label).size(14),
        text_input(label, value).on_input(on_input).secure(true).padding(8),
    ]
    .push_maybe(error_text(errors.get(field)))
    .spacing(4)
    .width(Length::Fill)
}

/// One pick list per level in `levels`. A level without options (parent not chosen
/// yet, or still loading) shows a placeholder saying so.
pub fn cascade_fields<'a>(
    app: &'a App,
    id: CascadeId,
    levels: Range<usize>,
    errors: Option<&'a FieldErrors>,
) -> Row<'a, Message> {
    let mut row = Row::new().spacing(12).width(Length::Fill);
    let Some(cascade) = app.cascade(id) else {
        return row;
    };
    for index in levels.filter(|i| *i < cascade.len()) {
        let Some(level) = cascade.level(index) else {
            continue;
        };
        let kind = level.key;
        let placeholder = if level.is_loading() {
            "Loading...".to_string()
        } else if index > 0 && cascade.selected(index - 1).is_none() {
            format!("Select {} first", cascade.levels()[index - 1].key.label().to_lowercase())
        } else {
            kind.placeholder()
        };
        let picker = PickList::new(
            level.options(),
            cascade.selected_option(index),
            move |option| Message::CascadeSelected(id, index, option.value),
        )
        .placeholder(placeholder)
        .width(Length::Fill);
        let clear = button(icon(app, "xmark"))
            .style(button::text)
            .on_press_maybe(level.selected().map(|_| Message::CascadeSelected(id, index, String::new())));

        let field = column![
            text(kind.label()).size(14),
            Row::new().spacing(4).align_y(Alignment::Center).push(picker).push(clear),
        ]
        .push_maybe(error_text(errors.and_then(|e| e.get(kind.field()))))
        .spacing(4)
        .width(Length::Fill);
        row = row.push(field);
    }
    row
}

/// "Showing X to Y of Z results" with Previous / page numbers / Next.
pub fn pagination_bar<'a>(pagination: Pagination, on_page: fn(u32) -> Message) -> Row<'a, Message> {
    let current = pagination.current_page;
    let last = pagination.total_pages();
    let mut pages = Row::new().spacing(4).align_y(Alignment::Center);
    let mut previous_shown = 0;
    for page in pagination.pages().filter(|p| *p == 1 || *p == last || p.abs_diff(current) <= 2) {
        if page > previous_shown + 1 {
            pages = pages.push(muted("…"));
        }
        previous_shown = page;
        let style = if page == current { button::primary } else { button::secondary };
        pages = pages.push(
            button(text(page.to_string()))
                .style(style)
                .on_press_maybe((page != current).then(|| on_page(page))),
        );
    }

    Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .width(Length::Fill)
        .push(muted(pagination.summary()))
        .push(horizontal_space())
        .push(button("Previous").on_press_maybe(pagination.has_previous().then(|| on_page(current - 1))))
        .push(pages)
        .push(button("Next").on_press_maybe(pagination.has_next().then(|| on_page(current + 1))))
}

/// Card used for a table-like row.
pub fn row_card<'a>(app: &'a App, content: impl Into<Element<'a, Message>>) -> Container<'a, Message> {
    Container::new(content)
        .padding(10)
        .width(Length::Fill)
        .style(move |_| bordered_box(&app.theme))
}

/// Puts `content` in a centred box over a dimmed `base`.
pub fn modal<'a>(
    app: &'a App,
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    width: f32,
) -> Stack<'a, Message> {
    let dialog = Container::new(content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(width));
    let overlay = Container::new(mouse_area(Container::new(dialog).center(Length::Fill)).on_press(Message::NoOp))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| background(OVERLAY));
    Stack::new().push(base).push(overlay)
}

pub fn delete_dialog(app: &App) -> Option<Element<'_, Message>> {
    let challenge = app.delete_challenge.as_ref()?;
    let answer = text_input("Your answer", &challenge.input)
        .on_input(Message::DeleteAnswerChanged)
        .on_submit(Message::ConfirmDelete)
        .padding(8);
    let content = column![
        Row::new()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(icon(app, "triangle-exclamation"))
            .push(text("Confirm delete").size(22)),
        text(&challenge.description),
        muted("This cannot be undone. Solve the question to continue."),
        text(challenge.question()).size(18),
        answer,
    ]
    .push_maybe(error_text(challenge.error.as_deref()))
    .push(
        Row::new()
            .spacing(10)
            .push(horizontal_space())
            .push(button("Cancel").style(button::secondary).on_press(Message::CancelDelete))
            .push(
                button(icon_button_content(icon(app, "trash"), "Delete"))
                    .style(button::danger)
                    .on_press_maybe((!challenge.input.trim().is_empty()).then_some(Message::ConfirmDelete)),
            ),
    )
    .spacing(12);
    let dialog = Container::new(content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(420.0));
    Some(
        Container::new(mouse_area(Container::new(dialog).center(Length::Fill)).on_press(Message::NoOp))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_| background(OVERLAY))
            .into(),
    )
}

fn toast_accent(kind: ToastKind) -> Accent {
    match kind {
        ToastKind::Success => Accent::Green,
        ToastKind::Error => Accent::Red,
        ToastKind::Info => Accent::Blue,
    }
}

/// Notifications stacked in the top-right corner.
pub fn toast_stack(app: &App) -> Option<Element<'_, Message>> {
    if app.toasts.is_empty() {
        return None;
    }
    let mut list = Column::new().spacing(8).width(Length::Fixed(340.0));
    for toast in &app.toasts {
        let accent = toast_accent(toast.kind);
        let body = Row::new()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(Text::new(&toast.message).color(accent.color()).width(Length::Fill))
            .push(button(icon(app, "xmark")).style(button::text).on_press(Message::DismissToast(toast.id)));
        list = list.push(
            Container::new(body)
                .padding(10)
                .width(Length::Fill)
                .style(move |theme: &Theme| {
                    let mut style = accent_card(accent)(theme);
                    style.background = Some(theme.palette().background.into());
                    style
                }),
        );
    }
    Some(
        Container::new(list)
            .width(Length::Fill)
            .align_right(Length::Fill)
            .padding(16)
            .into(),
    )
}

pub fn empty_state<'a>(message: &'a str) -> Container<'a, Message> {
    Container::new(Text::new(message).size(16).color(Color::from_rgb8(150, 150, 150)))
        .padding(30)
        .center_x(Length::Fill)
}
