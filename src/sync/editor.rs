// Edit surface state: which record is selected and the draft being edited

use crate::models::{ChargingPoint, ChargingPointDraft};

/// What a submit will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Create a new record
    #[default]
    New,
    /// Update the record with this id
    Existing(i64),
}

/// Submit-time description of a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Create(ChargingPointDraft),
    Update(i64, ChargingPointDraft),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Editor {
    pub selection: Selection,
    pub draft: ChargingPointDraft,
    pub open: bool,
}

impl Editor {
    /// Enter create mode with an empty draft
    pub fn open_new(&mut self) {
        self.selection = Selection::New;
        self.draft = ChargingPointDraft::default();
        self.open = true;
    }

    /// Enter edit mode seeded with the record's current values
    pub fn open_edit(&mut self, record: &ChargingPoint) {
        self.selection = Selection::Existing(record.id);
        self.draft = ChargingPointDraft::from(record);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Freeze the current selection and draft into an intent
    pub fn intent(&self) -> Intent {
        match self.selection {
            Selection::New => Intent::Create(self.draft.clone()),
            Selection::Existing(id) => Intent::Update(id, self.draft.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> ChargingPoint {
        ChargingPoint {
            id,
            nome: format!("Posto {}", id),
            endereco: "Rua 1".into(),
            tipo_recarga: "AC".into(),
            status: true,
            horario_funcionamento: "08:00-18:00".into(),
            responsavel_nome: "Ana".into(),
            responsavel_contato: "11999990000".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_open_new_resets_after_edit() {
        let mut editor = Editor::default();
        editor.open_edit(&record(3));
        editor.open_new();

        assert_eq!(editor.selection, Selection::New);
        assert_eq!(editor.draft, ChargingPointDraft::default());
        assert!(editor.open);
        assert!(matches!(editor.intent(), Intent::Create(_)));
    }

    #[test]
    fn test_open_edit_targets_record() {
        let mut editor = Editor::default();
        editor.open_new();
        editor.open_edit(&record(7));

        assert_eq!(editor.selection, Selection::Existing(7));
        assert_eq!(editor.draft.nome, "Posto 7");
        match editor.intent() {
            Intent::Update(id, draft) => {
                assert_eq!(id, 7);
                assert_eq!(draft.nome, "Posto 7");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_intent_ignores_draft_contents() {
        let mut editor = Editor::default();
        editor.open_new();
        editor.draft = ChargingPointDraft::from(&record(4));

        assert!(matches!(editor.intent(), Intent::Create(_)));
    }

    #[test]
    fn test_close_keeps_selection() {
        let mut editor = Editor::default();
        editor.open_edit(&record(2));
        editor.close();

        assert!(!editor.open);
        assert_eq!(editor.selection, Selection::Existing(2));
    }
}
