use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tui_input::Input;

use crate::console::AdminConsole;
use crate::models::{ChargingPoint, ChargingPointDraft, REQUIRED_FIELDS};
use crate::sync::{Editor, Selection};

/// Log entry for the log panel
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: tracing::Level,
    pub message: String,
}

/// Work the run loop performs against the console
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Login { email: String, password: String },
    Logout,
    Reload,
    OpenNew,
    OpenEdit(i64),
    Delete(i64),
    Submit(ChargingPointDraft),
    CancelEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Records,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginForm {
    pub email: Input,
    pub password: Input,
    pub focus: LoginField,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: Input::default(),
            password: Input::default(),
            focus: LoginField::Email,
        }
    }
}

impl LoginForm {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn focused_mut(&mut self) -> &mut Input {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Index of the status toggle in the record form's focus order
pub const STATUS_FIELD: usize = REQUIRED_FIELDS.len();

/// Modal create/edit form bound to the synchronizer's editor
pub struct RecordForm {
    pub selection: Selection,
    pub inputs: Vec<Input>,
    pub status: bool,
    pub focus: usize,
    /// Wire names of fields reported missing on the last submit attempt
    pub missing: Vec<&'static str>,
}

impl RecordForm {
    pub fn from_editor(editor: &Editor) -> Self {
        let inputs = editor
            .draft
            .text_fields()
            .iter()
            .map(|value| Input::new(value.to_string()))
            .collect();

        Self {
            selection: editor.selection,
            inputs,
            status: editor.draft.status,
            focus: 0,
            missing: Vec::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.selection {
            Selection::New => "Novo Ponto de Recarga",
            Selection::Existing(_) => "Editar Ponto de Recarga",
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (STATUS_FIELD + 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + STATUS_FIELD) % (STATUS_FIELD + 1);
    }

    /// Current form values as a draft
    pub fn draft(&self) -> ChargingPointDraft {
        let mut draft = ChargingPointDraft {
            status: self.status,
            ..ChargingPointDraft::default()
        };
        for (index, input) in self.inputs.iter().enumerate() {
            if let Some(field) = draft.text_field_mut(index) {
                *field = input.value().to_string();
            }
        }
        draft
    }
}

/// One-line feedback shown under the table
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub const DRAWER_ITEMS: [&str; 2] = ["Tabelas", "Sair"];

/// Shell application state
pub struct ShellApp {
    pub screen: Screen,
    pub login: LoginForm,
    /// Snapshot of the console's record list
    pub records: Vec<ChargingPoint>,
    /// Selected table row
    pub selected: usize,
    pub form: Option<RecordForm>,
    pub drawer_open: bool,
    pub drawer_index: usize,
    pub status: Option<StatusMessage>,
    /// Label of the operation currently awaiting the server
    pub pending: Option<&'static str>,
    /// Log buffer for display
    pub log_buffer: Arc<Mutex<VecDeque<LogEntry>>>,
    pub log_scroll: usize,
    pub should_quit: bool,
}

impl ShellApp {
    pub fn new(log_buffer: Arc<Mutex<VecDeque<LogEntry>>>) -> Self {
        Self {
            screen: Screen::Login,
            login: LoginForm::default(),
            records: Vec::new(),
            selected: 0,
            form: None,
            drawer_open: false,
            drawer_index: 0,
            status: None,
            pending: None,
            log_buffer,
            log_scroll: 0,
            should_quit: false,
        }
    }

    /// Copy what the views need from the console
    pub fn sync_from(&mut self, console: &AdminConsole) {
        self.screen = if console.is_authenticated() {
            Screen::Records
        } else {
            Screen::Login
        };
        self.records = console.records().to_vec();
        if self.selected >= self.records.len() {
            self.selected = self.records.len().saturating_sub(1);
        }
        if !console.editor().open {
            self.form = None;
        }
    }

    /// Discard everything except the log buffer
    pub fn reset(&mut self) {
        let log_buffer = Arc::clone(&self.log_buffer);
        *self = Self::new(log_buffer);
    }

    pub fn open_form(&mut self, editor: &Editor) {
        self.form = Some(RecordForm::from_editor(editor));
    }

    pub fn selected_record(&self) -> Option<&ChargingPoint> {
        self.records.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn log_count(&self) -> usize {
        self.log_buffer.lock().map(|logs| logs.len()).unwrap_or(0)
    }

    /// Scroll the log panel towards older entries, stopping at the last one
    pub fn scroll_logs_down(&mut self, lines: usize) {
        let last = self.log_count().saturating_sub(1);
        self.log_scroll = self.log_scroll.saturating_add(lines).min(last);
    }

    pub fn scroll_logs_up(&mut self, lines: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(lines);
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ShellApp {
        ShellApp::new(Arc::new(Mutex::new(VecDeque::new())))
    }

    fn record(id: i64) -> ChargingPoint {
        ChargingPoint {
            id,
            nome: format!("Posto {}", id),
            endereco: "Rua 1".into(),
            tipo_recarga: "AC".into(),
            status: false,
            horario_funcionamento: "24h".into(),
            responsavel_nome: "Ana".into(),
            responsavel_contato: "1199".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_form_from_edit_round_trips_draft() {
        let mut editor = Editor::default();
        editor.open_edit(&record(3));

        let form = RecordForm::from_editor(&editor);
        assert_eq!(form.title(), "Editar Ponto de Recarga");
        assert_eq!(form.draft(), editor.draft);
    }

    #[test]
    fn test_new_form_is_empty() {
        let mut editor = Editor::default();
        editor.open_new();

        let form = RecordForm::from_editor(&editor);
        assert_eq!(form.title(), "Novo Ponto de Recarga");
        assert_eq!(form.draft(), ChargingPointDraft::default());
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = RecordForm::from_editor(&Editor::default());
        form.focus_prev();
        assert_eq!(form.focus, STATUS_FIELD);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_row_selection_bounds() {
        let mut app = app();
        app.records = vec![record(1), record(2)];

        app.select_prev();
        assert_eq!(app.selected, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
        assert_eq!(app.selected_record().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_reset_keeps_log_buffer() {
        let mut app = app();
        let buffer = Arc::clone(&app.log_buffer);
        app.records = vec![record(1)];
        app.drawer_open = true;
        app.set_error("boom");

        app.reset();

        assert!(app.records.is_empty());
        assert!(!app.drawer_open);
        assert!(app.status.is_none());
        assert!(Arc::ptr_eq(&buffer, &app.log_buffer));
    }

    #[test]
    fn test_log_scroll_stops_at_last_entry() {
        let mut app = app();
        for i in 0..4 {
            app.log_buffer.lock().unwrap().push_back(LogEntry {
                timestamp: chrono::Utc::now(),
                level: tracing::Level::INFO,
                message: format!("entry {}", i),
            });
        }

        app.scroll_logs_down(10);
        assert_eq!(app.log_scroll, 3);

        app.scroll_logs_up(2);
        assert_eq!(app.log_scroll, 1);
        app.scroll_logs_up(10);
        assert_eq!(app.log_scroll, 0);
    }
}
