use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &str, pad: usize, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key.to_string(), Style::default().fg(Color::Magenta)),
        Span::raw(format!("{:pad$}{desc}", "")),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        key_line("tab", 9, "Switch tabs"),
        key_line("?", 11, "Show this help"),
        Line::from(""),
        Line::from("Requests list:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("↑/↓", Style::default().fg(Color::Magenta)),
            Span::raw(" or "),
            Span::styled("j/k", Style::default().fg(Color::Magenta)),
            Span::raw("  Navigate"),
        ]),
        key_line("n", 11, "New request"),
        key_line("e", 11, "Edit selected (or Enter)"),
        key_line("d", 11, "Delete selected"),
        key_line("x", 11, "Export list as JSON"),
        key_line("c", 11, "Export list as CSV"),
        key_line("y", 11, "Copy exported path to clipboard"),
        Line::from(""),
        Line::from("Request form:"),
        key_line("tab/↓", 7, "Next field"),
        key_line("S-tab/↑", 5, "Previous field"),
        key_line("←/→", 9, "Change option / toggle combo"),
        key_line("space", 7, "Toggle combo"),
        key_line("enter", 7, "Save request (or Ctrl-S)"),
        key_line("esc", 9, "Cancel"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
