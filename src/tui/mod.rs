mod cards;
mod export;
mod help;
mod state;

use crate::model::{Field, FieldInput, FieldKind};
use crate::session::{Action, Session};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Terminal,
};
use std::io;

use export::ExportKind;
use state::{UiState, TAB_HELP, TAB_REQUESTS};

/// What the loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive UI until the user quits.
///
/// Everything happens on this thread: draw, wait for one key, apply it, repeat.
pub fn run(mut session: Session) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState::default();

    let res = loop {
        let mut capacity = state.visible_cards;
        let drawn = terminal.draw(|f| {
            capacity = cards::card_capacity(main_chunks(f.area())[1].height);
            draw(f.area(), f, &state, &session)
        });
        if let Err(e) = drawn {
            break Err(anyhow::Error::from(e).context("draw frame"));
        }
        state.visible_cards = capacity.max(1);
        match event::read() {
            Ok(Event::Key(k)) => {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(&mut state, &mut session, k) == Flow::Quit {
                    break Ok(());
                }
            }
            Ok(_) => {}
            Err(e) => break Err(anyhow::Error::from(e).context("read terminal event")),
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn apply(state: &mut UiState, session: &mut Session, action: Action) {
    let outcome = session.apply(action);
    state.record_outcome(&outcome, session.records());
}

fn handle_key(state: &mut UiState, session: &mut Session, k: KeyEvent) -> Flow {
    if let (KeyModifiers::CONTROL, KeyCode::Char('c')) = (k.modifiers, k.code) {
        return Flow::Quit;
    }
    if state.tab == TAB_HELP {
        return match k.code {
            KeyCode::Char('q') => Flow::Quit,
            KeyCode::Tab | KeyCode::Esc | KeyCode::Char('?') => {
                state.tab = TAB_REQUESTS;
                Flow::Continue
            }
            _ => Flow::Continue,
        };
    }
    if session.mode().is_form() {
        handle_form_key(state, session, k);
        return Flow::Continue;
    }
    handle_list_key(state, session, k)
}

fn handle_list_key(state: &mut UiState, session: &mut Session, k: KeyEvent) -> Flow {
    let selected_id = session.records().get(state.selected).map(|r| r.id);
    match k.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('n') => apply(state, session, Action::NewRequest),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = selected_id {
                apply(state, session, Action::EditRequest(id));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = selected_id {
                apply(state, session, Action::DeleteRequest(id));
            }
        }
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(session.records().len()),
        KeyCode::Char('x') => {
            export::export_and_show_path(ExportKind::Json, session.records(), state)
        }
        KeyCode::Char('c') => {
            export::export_and_show_path(ExportKind::Csv, session.records(), state)
        }
        KeyCode::Char('y') => export::copy_exported_path(state),
        KeyCode::Tab | KeyCode::Char('?') => state.tab = TAB_HELP,
        _ => {}
    }
    Flow::Continue
}

fn handle_form_key(state: &mut UiState, session: &mut Session, k: KeyEvent) {
    let field = state.focused_field();
    match (k.modifiers, k.code) {
        (_, KeyCode::Esc) => apply(state, session, Action::Cancel),
        (_, KeyCode::Enter) | (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            apply(state, session, Action::Save)
        }
        (_, KeyCode::Tab) | (_, KeyCode::Down) => state.focus_next(),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => state.focus_prev(),
        (_, KeyCode::Left) => step_field(state, session, field, false),
        (_, KeyCode::Right) => step_field(state, session, field, true),
        (_, KeyCode::Backspace) => edit_text(state, session, field, None),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            if field.kind() == FieldKind::Checkbox {
                if c == ' ' {
                    step_field(state, session, field, true);
                }
            } else {
                edit_text(state, session, field, Some(c));
            }
        }
        _ => {}
    }
}

/// Append a character to (or, with `None`, delete the last one from) a typed field.
fn edit_text(state: &mut UiState, session: &mut Session, field: Field, ch: Option<char>) {
    let Some(buffer) = session.buffer() else {
        return;
    };
    if !matches!(
        field.kind(),
        FieldKind::Text | FieldKind::Number | FieldKind::File
    ) {
        return;
    }
    let mut text = buffer.text_of(field);
    match ch {
        Some(c) => text.push(c),
        None => {
            text.pop();
        }
    }
    let input = if field.kind() == FieldKind::File {
        FieldInput::File((!text.is_empty()).then(|| text.into()))
    } else {
        FieldInput::Text(text)
    };
    apply(state, session, Action::FieldChanged(field, input));
}

/// Cycle a choice field through its options, or flip the combo checkbox.
fn step_field(state: &mut UiState, session: &mut Session, field: Field, forward: bool) {
    let Some(buffer) = session.buffer() else {
        return;
    };
    let input = match field.kind() {
        FieldKind::Checkbox => FieldInput::Checked(!buffer.is_combo),
        FieldKind::Choice => {
            let Some(options) = session.options().for_field(field) else {
                return;
            };
            if options.is_empty() {
                return;
            }
            let current = buffer.text_of(field);
            let len = options.len();
            let next = match options.iter().position(|o| *o == current) {
                Some(i) if forward => (i + 1) % len,
                Some(i) => (i + len - 1) % len,
                None => 0,
            };
            FieldInput::Text(options[next].clone())
        }
        _ => return,
    };
    apply(state, session, Action::FieldChanged(field, input));
}

/// Tabs, body and status rows.
fn main_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area)
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &Session) {
    let chunks = main_chunks(area);

    let tabs = Tabs::new(vec![Line::from("Requests"), Line::from("Help")])
        .select(state.tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Schedule Requests"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_REQUESTS => draw_requests_tab(chunks[1], f, state, session),
        _ => help::draw_help(chunks[1], f),
    }

    draw_status(chunks[2], f, state, session);
}

fn draw_requests_tab(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &Session) {
    let Some(buffer) = session.buffer() else {
        cards::draw_requests(area, f, state, session.records(), false);
        return;
    };
    // Narrow terminals stack the form above the list.
    let direction = if area.width >= 110 {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let split = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(area);
    cards::draw_form(split[0], f, state, session.mode(), buffer);
    cards::draw_requests(split[1], f, state, session.records(), true);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &Session) {
    let hint = if session.mode().is_form() {
        "enter: save  esc: cancel  tab: next field"
    } else {
        "n: new  e: edit  d: delete  x/c: export  ?: help  q: quit"
    };
    let mut spans = vec![Span::styled(hint, Style::default().fg(Color::Magenta))];
    if !state.info.is_empty() {
        let color = if state.info.starts_with("Error") || state.info.contains("failed") {
            Color::Red
        } else {
            Color::Gray
        };
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(state.info.clone(), Style::default().fg(color)));
    }
    let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::form::FormMode;
    use crate::model::RequestId;
    use ratatui::backend::TestBackend;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(state: &mut UiState, session: &mut Session, s: &str) {
        for c in s.chars() {
            handle_key(state, session, press(KeyCode::Char(c)));
        }
    }

    fn screen(state: &UiState, session: &Session, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal
            .draw(|f| draw(f.area(), f, state, session))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn create_request_from_keys() {
        let mut session = Session::from_config(&AppConfig::default());
        let mut state = UiState::default();

        handle_key(&mut state, &mut session, press(KeyCode::Char('n')));
        assert_eq!(session.mode(), FormMode::Creating);

        type_str(&mut state, &mut session, "Ann Lee");
        handle_key(&mut state, &mut session, press(KeyCode::Tab));
        type_str(&mut state, &mut session, "SO-9");
        handle_key(&mut state, &mut session, press(KeyCode::Tab));
        type_str(&mut state, &mut session, "2024-12-01T09:15");
        handle_key(&mut state, &mut session, press(KeyCode::Tab));
        type_str(&mut state, &mut session, "42");
        handle_key(&mut state, &mut session, press(KeyCode::Backspace));
        handle_key(&mut state, &mut session, press(KeyCode::Tab));
        type_str(&mut state, &mut session, "8");
        handle_key(&mut state, &mut session, press(KeyCode::Tab));
        handle_key(&mut state, &mut session, press(KeyCode::Right));
        for _ in 0..4 {
            handle_key(&mut state, &mut session, press(KeyCode::Tab));
        }
        assert_eq!(state.focused_field(), Field::IsCombo);
        handle_key(&mut state, &mut session, press(KeyCode::Char(' ')));
        handle_key(&mut state, &mut session, press(KeyCode::Enter));

        assert_eq!(session.mode(), FormMode::Idle);
        assert_eq!(session.records().len(), 3);
        let r = &session.records()[2];
        assert_eq!(r.planner, "Ann Lee");
        assert_eq!(r.sales_order, "SO-9");
        assert_eq!(r.unit, 4);
        assert_eq!(r.quantity, 8);
        assert_eq!(r.language, "Arabic");
        assert!(r.is_combo);
        assert_eq!(r.serial_number, 3);
        assert_eq!(state.selected, 2);
        assert_eq!(state.info, "Created request #3");
    }

    #[test]
    fn q_types_into_form_instead_of_quitting() {
        let mut session = Session::from_config(&AppConfig::default());
        let mut state = UiState::default();
        handle_key(&mut state, &mut session, press(KeyCode::Char('n')));
        let flow = handle_key(&mut state, &mut session, press(KeyCode::Char('q')));
        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.buffer().unwrap().planner, "q");
        handle_key(&mut state, &mut session, press(KeyCode::Esc));
        assert_eq!(
            handle_key(&mut state, &mut session, press(KeyCode::Char('q'))),
            Flow::Quit
        );
    }

    #[test]
    fn choice_cycles_backwards_with_wrap() {
        let mut session = Session::from_config(&AppConfig::default());
        let mut state = UiState::default();
        handle_key(&mut state, &mut session, press(KeyCode::Char('n')));
        state.focus = Field::ALL
            .iter()
            .position(|f| *f == Field::LpoReference)
            .unwrap();
        handle_key(&mut state, &mut session, press(KeyCode::Left));
        assert_eq!(session.buffer().unwrap().lpo_reference, "LPO-004");
    }

    #[test]
    fn edit_and_delete_selected() {
        let mut session = Session::from_config(&AppConfig::default());
        let mut state = UiState::default();
        handle_key(&mut state, &mut session, press(KeyCode::Down));
        handle_key(&mut state, &mut session, press(KeyCode::Enter));
        assert_eq!(session.mode(), FormMode::Editing(RequestId(2)));
        handle_key(&mut state, &mut session, press(KeyCode::Esc));

        handle_key(&mut state, &mut session, press(KeyCode::Char('d')));
        assert_eq!(session.records().len(), 1);
        assert_eq!(state.selected, 0);
        assert_eq!(state.info, "Deleted request #2");
    }

    #[test]
    fn invalid_number_shows_error_and_keeps_form() {
        let mut session = Session::from_config(&AppConfig::default());
        let mut state = UiState::default();
        handle_key(&mut state, &mut session, press(KeyCode::Char('n')));
        state.focus = 3;
        type_str(&mut state, &mut session, "4x");
        handle_key(&mut state, &mut session, press(KeyCode::Enter));
        assert!(session.mode().is_form());
        assert!(state.info.starts_with("Error: Unit"));
    }

    #[test]
    fn renders_cards_and_form() {
        let mut session = Session::from_config(&AppConfig::default());
        let mut state = UiState::default();
        let text = screen(&state, &session, 120, 40);
        assert!(text.contains("John Doe"));
        assert!(text.contains("Nov 10, 2024 at 10:00 AM"));
        assert!(text.contains("COMBO"));

        handle_key(&mut state, &mut session, press(KeyCode::Enter));
        let text = screen(&state, &session, 120, 40);
        assert!(text.contains("Edit Schedule Request"));
        assert!(text.contains("SO-2024-001"));
    }

    #[test]
    fn renders_empty_state() {
        let session = Session::from_config(&AppConfig {
            seed_demo: false,
            ..Default::default()
        });
        let text = screen(&UiState::default(), &session, 80, 20);
        assert!(text.contains("No Schedule Requests"));
    }
}
