use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;

use super::app::{Command, Screen, ShellApp, DRAWER_ITEMS, STATUS_FIELD};
use crate::http_client::CancelToken;

const POLL_TIMEOUT: Duration = Duration::from_millis(250);
const ABORT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const LOG_PAGE: usize = 10;

/// Poll the terminal once and translate a key press into a command
pub fn handle_events(app: &mut ShellApp) -> io::Result<Option<Command>> {
    if event::poll(POLL_TIMEOUT)? {
        if let Event::Key(key_event) = event::read()? {
            return Ok(handle_key_event(app, key_event));
        }
    }
    Ok(None)
}

/// Esc or Ctrl-C while a request is in flight
pub fn is_abort_key(key: &KeyEvent) -> bool {
    key.kind == event::KeyEventKind::Press
        && (key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}

/// Read keys while a call is pending and fire `cancel` on an abort key
///
/// Other keys are discarded. Only returns on a terminal I/O error.
pub async fn watch_for_abort(cancel: &CancelToken) -> io::Result<()> {
    loop {
        tokio::time::sleep(ABORT_POLL_INTERVAL).await;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_abort_key(&key) && !cancel.is_cancelled() {
                    tracing::info!("Cancelling pending request");
                    cancel.cancel();
                }
            }
        }
    }
}

pub fn handle_key_event(app: &mut ShellApp, key: KeyEvent) -> Option<Command> {
    if key.kind != event::KeyEventKind::Press {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Some(Command::Quit);
    }

    match app.screen {
        Screen::Login => handle_login(app, key),
        Screen::Records if app.form.is_some() => handle_form(app, key),
        Screen::Records if app.drawer_open => handle_drawer(app, key),
        Screen::Records => handle_records(app, key),
    }
}

fn handle_login(app: &mut ShellApp, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
            Some(Command::Quit)
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.toggle_focus();
            None
        }
        KeyCode::Enter => {
            let email = app.login.email.value().trim().to_string();
            let password = app.login.password.value().to_string();
            if email.is_empty() || password.is_empty() {
                app.set_error("Informe email e senha");
                return None;
            }
            Some(Command::Login { email, password })
        }
        _ => {
            app.login.focused_mut().handle_event(&Event::Key(key));
            None
        }
    }
}

fn handle_records(app: &mut ShellApp, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            Some(Command::Quit)
        }
        KeyCode::Char('n') => Some(Command::OpenNew),
        KeyCode::Char('e') | KeyCode::Enter => app.selected_record().map(|r| Command::OpenEdit(r.id)),
        KeyCode::Char('d') | KeyCode::Delete => app.selected_record().map(|r| Command::Delete(r.id)),
        KeyCode::Char('r') => Some(Command::Reload),
        KeyCode::Char('m') => {
            app.drawer_open = true;
            app.drawer_index = 0;
            None
        }
        KeyCode::Up => {
            app.select_prev();
            None
        }
        KeyCode::Down => {
            app.select_next();
            None
        }
        KeyCode::PageUp => {
            app.scroll_logs_up(LOG_PAGE);
            None
        }
        KeyCode::PageDown => {
            app.scroll_logs_down(LOG_PAGE);
            None
        }
        KeyCode::Home => {
            app.log_scroll = 0;
            None
        }
        _ => None,
    }
}

fn handle_drawer(app: &mut ShellApp, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => {
            app.drawer_open = false;
            None
        }
        KeyCode::Up => {
            app.drawer_index = app.drawer_index.saturating_sub(1);
            None
        }
        KeyCode::Down => {
            app.drawer_index = (app.drawer_index + 1).min(DRAWER_ITEMS.len() - 1);
            None
        }
        KeyCode::Enter => {
            app.drawer_open = false;
            match DRAWER_ITEMS[app.drawer_index] {
                "Sair" => Some(Command::Logout),
                _ => None,
            }
        }
        _ => None,
    }
}

fn handle_form(app: &mut ShellApp, key: KeyEvent) -> Option<Command> {
    let form = app.form.as_mut()?;

    match key.code {
        KeyCode::Esc => {
            app.form = None;
            Some(Command::CancelEdit)
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            None
        }
        KeyCode::Char(' ') if form.focus == STATUS_FIELD => {
            form.status = !form.status;
            None
        }
        KeyCode::Enter => {
            let draft = form.draft();
            form.missing = draft.missing_fields();
            if form.missing.is_empty() {
                Some(Command::Submit(draft))
            } else {
                let count = form.missing.len();
                app.set_error(format!("Preencha os campos obrigatórios ({})", count));
                None
            }
        }
        _ => {
            if let Some(input) = form.inputs.get_mut(form.focus) {
                input.handle_event(&Event::Key(key));
            }
            None
        }
    }
}
