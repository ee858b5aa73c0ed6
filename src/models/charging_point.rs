// Charging point records as exchanged with the admin API

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Server-owned charging point record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingPoint {
    pub id: i64,
    pub nome: String,
    pub endereco: String,
    pub tipo_recarga: String,
    pub status: bool,
    pub horario_funcionamento: String,
    pub responsavel_nome: String,
    pub responsavel_contato: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ChargingPoint {
    pub fn status_label(&self) -> &'static str {
        if self.status {
            "Ativo"
        } else {
            "Inativo"
        }
    }
}

/// Writable subset of a [`ChargingPoint`]
///
/// `id`, `createdAt` and `updatedAt` are server-assigned and never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingPointDraft {
    pub nome: String,
    pub endereco: String,
    pub tipo_recarga: String,
    pub status: bool,
    pub horario_funcionamento: String,
    pub responsavel_nome: String,
    pub responsavel_contato: String,
}

/// Required text fields in form order, as (wire name, label)
pub const REQUIRED_FIELDS: [(&str, &str); 6] = [
    ("nome", "Nome"),
    ("endereco", "Endereço"),
    ("tipoRecarga", "Tipo de Recarga"),
    ("horarioFuncionamento", "Horário Funcionamento"),
    ("responsavelNome", "Responsável Nome"),
    ("responsavelContato", "Responsável Contato"),
];

impl ChargingPointDraft {
    /// Text field values in the same order as [`REQUIRED_FIELDS`]
    pub fn text_fields(&self) -> [&str; 6] {
        [
            self.nome.as_str(),
            self.endereco.as_str(),
            self.tipo_recarga.as_str(),
            self.horario_funcionamento.as_str(),
            self.responsavel_nome.as_str(),
            self.responsavel_contato.as_str(),
        ]
    }

    /// Mutable access to a text field by its position in [`REQUIRED_FIELDS`]
    pub fn text_field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.nome),
            1 => Some(&mut self.endereco),
            2 => Some(&mut self.tipo_recarga),
            3 => Some(&mut self.horario_funcionamento),
            4 => Some(&mut self.responsavel_nome),
            5 => Some(&mut self.responsavel_contato),
            _ => None,
        }
    }

    /// Wire names of required fields that are empty or whitespace
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .zip(self.text_fields())
            .filter(|(_, value)| value.trim().is_empty())
            .map(|((name, _), _)| *name)
            .collect()
    }

    pub fn validate(&self) -> Result<(), AdminError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        Err(AdminError::Validation(format!(
            "required fields are empty: {}",
            missing.join(", ")
        )))
    }
}

impl From<&ChargingPoint> for ChargingPointDraft {
    fn from(record: &ChargingPoint) -> Self {
        Self {
            nome: record.nome.clone(),
            endereco: record.endereco.clone(),
            tipo_recarga: record.tipo_recarga.clone(),
            status: record.status,
            horario_funcionamento: record.horario_funcionamento.clone(),
            responsavel_nome: record.responsavel_nome.clone(),
            responsavel_contato: record.responsavel_contato.clone(),
        }
    }
}
