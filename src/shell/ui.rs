use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::widgets::{Block, Borders, Clear, TableState};
use ratatui::Frame;

use super::app::{LoginField, RecordForm, Screen, ShellApp, STATUS_FIELD};
use super::widgets;
use crate::models::REQUIRED_FIELDS;

const LOG_PANEL_HEIGHT: u16 = 8;
const RECORDS_HINTS: &str =
    "n novo · e editar · d deletar · r recarregar · m menu · q sair";
const LOGIN_HINTS: &str = "Tab alterna campo · Enter entra · Esc sai";

pub fn render(frame: &mut Frame, app: &ShellApp) {
    match app.screen {
        Screen::Login => render_login(frame, app),
        Screen::Records => render_records(frame, app),
    }
}

fn render_login(frame: &mut Frame, app: &ShellApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(LOG_PANEL_HEIGHT),
        ])
        .split(frame.area());

    frame.render_widget(widgets::render_header("Login"), chunks[0]);

    let area = centered_rect(50, 8, chunks[1]);
    frame.render_widget(
        Block::default().borders(Borders::ALL).title("Área administrativa"),
        area,
    );

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(area);

    let masked = "*".repeat(app.login.password.value().chars().count());
    let email_focused = app.login.focus == LoginField::Email;

    frame.render_widget(
        widgets::render_input_line("Email", app.login.email.value(), email_focused, false),
        fields[0],
    );
    frame.render_widget(
        widgets::render_input_line("Senha", &masked, !email_focused, false),
        fields[1],
    );

    let (input, field_area) = if email_focused {
        (&app.login.email, fields[0])
    } else {
        (&app.login.password, fields[1])
    };
    place_cursor(frame, field_area, input.visual_cursor());

    frame.render_widget(
        widgets::render_status_line(app.status.as_ref(), app.pending, LOGIN_HINTS),
        chunks[2],
    );
    render_log_panel(frame, app, chunks[3]);
}

fn render_records(frame: &mut Frame, app: &ShellApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(LOG_PANEL_HEIGHT),
        ])
        .split(frame.area());

    frame.render_widget(widgets::render_header("Tabelas"), chunks[0]);

    let mut state = TableState::default();
    if !app.records.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(widgets::render_records_table(&app.records), chunks[1], &mut state);

    frame.render_widget(
        widgets::render_status_line(app.status.as_ref(), app.pending, RECORDS_HINTS),
        chunks[2],
    );
    render_log_panel(frame, app, chunks[3]);

    if app.drawer_open {
        let area = Rect {
            x: chunks[1].x,
            y: chunks[1].y,
            width: 20.min(chunks[1].width),
            height: 4.min(chunks[1].height),
        };
        frame.render_widget(Clear, area);
        frame.render_widget(widgets::render_drawer(app.drawer_index), area);
    }

    if let Some(form) = &app.form {
        render_form(frame, form);
    }
}

fn render_form(frame: &mut Frame, form: &RecordForm) {
    let height = (STATUS_FIELD as u16 + 1) * 3 + 2;
    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().borders(Borders::ALL).title(form.title()),
        area,
    );

    let constraints = vec![Constraint::Length(3); STATUS_FIELD + 1];
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area);

    for (index, ((name, label), input)) in REQUIRED_FIELDS.iter().zip(&form.inputs).enumerate() {
        let focused = form.focus == index;
        let missing = form.missing.contains(name);
        frame.render_widget(
            widgets::render_input_line(label, input.value(), focused, missing),
            rows[index],
        );
        if focused {
            place_cursor(frame, rows[index], input.visual_cursor());
        }
    }

    frame.render_widget(
        widgets::render_status_toggle(form.status, form.focus == STATUS_FIELD),
        rows[STATUS_FIELD],
    );
}

fn render_log_panel(frame: &mut Frame, app: &ShellApp, area: Rect) {
    let log_entries: Vec<_> = match app.log_buffer.lock() {
        Ok(logs) => logs.iter().rev().cloned().collect(),
        Err(_) => Vec::new(),
    };

    let log_panel = widgets::render_log_panel(&log_entries, app.log_scroll);
    frame.render_widget(log_panel, area);
}

/// Put the terminal cursor inside a bordered input
fn place_cursor(frame: &mut Frame, area: Rect, cursor: usize) {
    let max = area.width.saturating_sub(2);
    let x = area.x + 1 + (cursor as u16).min(max);
    frame.set_cursor_position(Position::new(x, area.y + 1));
}

/// Fixed-height rectangle, `percent_x` wide, centered in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
