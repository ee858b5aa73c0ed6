// Terminal presentation shell
// Login form, records table, drawer menu and create/edit modal

pub mod app;
pub mod event_handler;
pub mod log_layer;
pub mod ui;
pub mod widgets;

pub use app::{Command, LogEntry, ShellApp};
pub use log_layer::ShellLogLayer;

use std::collections::VecDeque;
use std::future::Future;
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::console::AdminConsole;
use crate::error::AdminError;
use crate::http_client::{CancelToken, RequestOptions};

type ShellTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Run the shell until the user quits
///
/// Validates any stored credential first, then processes one command at a
/// time. While a call is pending only Esc is honoured, and it cancels the call.
pub async fn run(
    console: &mut AdminConsole,
    log_buffer: Arc<Mutex<VecDeque<LogEntry>>>,
) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = ShellApp::new(log_buffer);

    let result = event_loop(&mut terminal, &mut app, console).await;

    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut ShellTerminal,
    app: &mut ShellApp,
    console: &mut AdminConsole,
) -> Result<()> {
    app.pending = Some("Verificando sessão");
    terminal.draw(|frame| ui::render(frame, app))?;
    let cancel = CancelToken::new();
    let options = RequestOptions::with_cancel(cancel.clone());
    run_abortable(&cancel, start_session(app, console, &options)).await?;
    app.pending = None;
    app.sync_from(console);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        let Some(command) = event_handler::handle_events(app)? else {
            continue;
        };
        if command == Command::Quit {
            break;
        }

        app.pending = pending_label(&command);
        if app.pending.is_some() {
            terminal.draw(|frame| ui::render(frame, app))?;
        }

        let cancel = CancelToken::new();
        let options = RequestOptions::with_cancel(cancel.clone());
        run_abortable(&cancel, apply_command(command, app, console, &options)).await?;
        app.pending = None;
        app.sync_from(console);
    }

    Ok(())
}

/// Drive `operation` to completion while Esc cancels it through `cancel`
async fn run_abortable(
    cancel: &CancelToken,
    operation: impl Future<Output = ()>,
) -> Result<()> {
    tokio::select! {
        _ = operation => Ok(()),
        Err(e) = event_handler::watch_for_abort(cancel) => {
            Err(e).context("Failed to read terminal events")
        }
    }
}

fn pending_label(command: &Command) -> Option<&'static str> {
    match command {
        Command::Login { .. } => Some("Entrando · Esc cancela"),
        Command::Reload => Some("Carregando · Esc cancela"),
        Command::Delete(_) => Some("Removendo · Esc cancela"),
        Command::Submit(_) => Some("Salvando · Esc cancela"),
        _ => None,
    }
}

/// Validate the stored session and report how it went
pub async fn start_session(
    app: &mut ShellApp,
    console: &mut AdminConsole,
    options: &RequestOptions,
) {
    match console.start(options).await {
        Ok(_) => {}
        Err(e) if console.is_authenticated() => {
            app.set_error(describe("Falha ao carregar pontos", &e));
        }
        Err(e) => app.set_error(describe("Sessão expirada ou inválida", &e)),
    }
}

/// Apply one command to the console and record the outcome in the status line
pub async fn apply_command(
    command: Command,
    app: &mut ShellApp,
    console: &mut AdminConsole,
    options: &RequestOptions,
) {
    match command {
        Command::Quit => app.should_quit = true,
        Command::Login { email, password } => {
            match console.login(&email, &password, options).await {
                Ok(()) => {
                    app.login = Default::default();
                    app.set_info("Login realizado");
                }
                Err(e) if console.is_authenticated() => {
                    app.login = Default::default();
                    app.set_error(describe("Falha ao carregar pontos", &e));
                }
                Err(e) => app.set_error(describe("Falha no login", &e)),
            }
        }
        Command::Logout => {
            console.logout().await;
            app.reset();
        }
        Command::Reload => match console.synchronizer_mut().reload(options).await {
            Ok(records) => {
                let count = records.len();
                app.set_info(format!("{} pontos carregados", count));
            }
            Err(e) => app.set_error(describe("Falha ao carregar pontos", &e)),
        },
        Command::OpenNew => {
            console.synchronizer_mut().open_new();
            app.open_form(console.editor());
        }
        Command::OpenEdit(id) => {
            let record = console.records().iter().find(|r| r.id == id).cloned();
            match record {
                Some(record) => {
                    console.synchronizer_mut().open_edit(&record);
                    app.open_form(console.editor());
                }
                None => app.set_error(format!("Ponto {} não encontrado", id)),
            }
        }
        Command::Delete(id) => match console.synchronizer_mut().delete(id, options).await {
            Ok(()) => app.set_info(format!("Ponto {} removido", id)),
            Err(e) => app.set_error(describe("Falha ao remover", &e)),
        },
        Command::Submit(draft) => {
            let sync = console.synchronizer_mut();
            sync.editor_mut().draft = draft;
            match sync.submit(options).await {
                Ok(()) => app.set_info("Ponto salvo"),
                Err(e) => app.set_error(describe("Falha ao salvar", &e)),
            }
        }
        Command::CancelEdit => console.synchronizer_mut().close_editor(),
    }
}

fn describe(prefix: &str, error: &AdminError) -> String {
    match error {
        AdminError::Cancelled => format!("{}: operação cancelada", prefix),
        e if e.is_transport() => format!("{}: {} (verifique a conexão)", prefix, e),
        e => format!("{}: {}", prefix, e),
    }
}

fn setup_terminal() -> Result<ShellTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut ShellTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChargingPointDraft;

    #[test]
    fn test_pending_labels() {
        assert_eq!(pending_label(&Command::Reload), Some("Carregando · Esc cancela"));
        assert_eq!(
            pending_label(&Command::Submit(ChargingPointDraft::default())),
            Some("Salvando · Esc cancela")
        );
        assert_eq!(pending_label(&Command::OpenNew), None);
        assert_eq!(pending_label(&Command::CancelEdit), None);
    }

    #[test]
    fn test_describe() {
        let err = AdminError::Timeout {
            after: std::time::Duration::from_secs(30),
        };
        assert_eq!(
            describe("Falha ao salvar", &err),
            "Falha ao salvar: Request timed out after 30s (verifique a conexão)"
        );
        assert_eq!(
            describe("Falha ao remover", &AdminError::Cancelled),
            "Falha ao remover: operação cancelada"
        );
        assert_eq!(
            describe("Falha no login", &AdminError::missing_credential()),
            "Falha no login: Authentication failed: 401 - no credential stored"
        );
    }
}
