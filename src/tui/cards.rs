use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::{UiState, CARD_HEIGHT};
use crate::datetime;
use crate::form::FormMode;
use crate::model::{Field, FieldKind, FormBuffer, ScheduleRequest};

fn label(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::Gray))
}

/// Lines for one request card. The header is highlighted when selected.
pub fn card_lines(r: &ScheduleRequest, selected: bool) -> Vec<Line<'static>> {
    let header_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };

    let mut header = vec![
        Span::styled(format!(" #{} ", r.serial_number), header_style),
        Span::raw(" "),
        Span::styled(
            r.planner.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(r.sales_order.clone(), Style::default().fg(Color::Gray)),
    ];
    if r.is_combo {
        header.push(Span::raw("  "));
        header.push(Span::styled("COMBO", Style::default().fg(Color::Green)));
    }

    let mut footer = vec![
        Span::raw("    "),
        label("Location: "),
        Span::raw(r.location.clone()),
        Span::raw("   "),
        label("Project: "),
        Span::raw(r.project.clone()),
    ];
    if let Some(a) = r.attachment.as_ref() {
        footer.push(Span::raw("   "));
        footer.push(label("File: "));
        footer.push(Span::raw(a.name.clone()));
    }

    vec![
        Line::from(header),
        Line::from(vec![
            Span::raw("    "),
            label("Date & Time: "),
            Span::raw(datetime::format_display(r.requested_at)),
        ]),
        Line::from(vec![
            Span::raw("    "),
            label("Unit: "),
            Span::styled(
                r.unit.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            label("Quantity: "),
            Span::styled(
                r.quantity.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("    "),
            label("Language: "),
            Span::raw(r.language.clone()),
            Span::raw("   "),
            label("LPO Ref: "),
            Span::raw(r.lpo_reference.clone()),
        ]),
        Line::from(footer),
        Line::from(""),
    ]
}

/// Whole cards that fit in a bordered list of `height` rows.
pub fn card_capacity(height: u16) -> usize {
    (height as usize).saturating_sub(2) / CARD_HEIGHT
}

pub fn draw_requests(
    area: Rect,
    f: &mut Frame,
    state: &UiState,
    records: &[ScheduleRequest],
    form_open: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Requests ({})", records.len()));

    if records.is_empty() {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No Schedule Requests",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if !form_open {
            lines.push(Line::from(
                "Get started by creating your first schedule request",
            ));
            lines.push(Line::from(vec![
                Span::raw("Press "),
                Span::styled("n", Style::default().fg(Color::Magenta)),
                Span::raw(" to create a request"),
            ]));
        }
        let p = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let visible = card_capacity(area.height);
    let offset = state.visible_offset(visible);
    let lines: Vec<Line> = records
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible.max(1))
        .flat_map(|(idx, r)| card_lines(r, !form_open && idx == state.selected))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_value(buffer: &FormBuffer, field: Field, focused: bool) -> Span<'static> {
    let text = match field.kind() {
        FieldKind::Choice => format!("< {} >", buffer.text_of(field)),
        FieldKind::Checkbox => {
            if buffer.is_combo {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            }
        }
        FieldKind::File => match buffer.attachment.as_ref() {
            Some(_) => buffer.text_of(field),
            None if focused => String::new(),
            None => "(none)".to_string(),
        },
        FieldKind::Text | FieldKind::Number => buffer.text_of(field),
    };
    let with_cursor = if focused && matches!(
        field.kind(),
        FieldKind::Text | FieldKind::Number | FieldKind::File
    ) {
        format!("{text}_")
    } else {
        text
    };
    if focused {
        Span::styled(
            with_cursor,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(with_cursor)
    }
}

pub fn draw_form(area: Rect, f: &mut Frame, state: &UiState, mode: FormMode, buffer: &FormBuffer) {
    let title = match mode {
        FormMode::Editing(_) => "Edit Schedule Request",
        _ => "Create New Request",
    };
    let focused = state.focused_field();

    let mut lines = vec![Line::from(vec![
        label(&format!("{:<26}", "SI No")),
        Span::styled(
            buffer.serial_number.as_text(),
            Style::default().fg(Color::DarkGray),
        ),
    ])];
    for field in Field::ALL {
        let is_focused = field == focused;
        let marker = if is_focused { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            label(&format!("{:<24}", field.label())),
            field_value(buffer, field, is_focused),
        ]));
    }
    if focused == Field::RequestedAt {
        lines.push(Line::from(""));
        lines.push(Line::from(label("  Format: YYYY-MM-DDTHH:MM")));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("enter", Style::default().fg(Color::Magenta)),
        Span::raw(": save request, "),
        Span::styled("esc", Style::default().fg(Color::Magenta)),
        Span::raw(": cancel, "),
        Span::styled("tab", Style::default().fg(Color::Magenta)),
        Span::raw(": next field"),
    ]));

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}
