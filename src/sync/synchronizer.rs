use reqwest::Method;
use std::sync::Arc;

use super::editor::{Editor, Intent};
use crate::error::AdminError;
use crate::http_client::{ensure_success, AdminHttpClient, ApiResponse, RequestOptions};
use crate::models::{ChargingPoint, ChargingPointDraft};

const COLLECTION_PATH: &str = "/chargingPoints";

fn record_path(id: i64) -> String {
    format!("{}/{}", COLLECTION_PATH, id)
}

/// Map a rejected response to the error taxonomy
fn rejection(status: u16, message: String) -> AdminError {
    match status {
        401 | 403 => AdminError::Auth { status, message },
        _ => AdminError::Mutation { status, message },
    }
}

/// Local cache of the charging point collection
///
/// Every successful write is followed by a full reload; the list is never
/// patched locally.
pub struct RecordSynchronizer {
    http_client: Arc<AdminHttpClient>,

    /// Records in server order
    records: Vec<ChargingPoint>,

    /// Edit surface state
    editor: Editor,
}

impl RecordSynchronizer {
    pub fn new(http_client: Arc<AdminHttpClient>) -> Self {
        Self {
            http_client,
            records: Vec::new(),
            editor: Editor::default(),
        }
    }

    pub fn records(&self) -> &[ChargingPoint] {
        &self.records
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn open_new(&mut self) {
        self.editor.open_new();
    }

    pub fn open_edit(&mut self, record: &ChargingPoint) {
        self.editor.open_edit(record);
    }

    pub fn close_editor(&mut self) {
        self.editor.close();
    }

    pub fn intent(&self) -> Intent {
        self.editor.intent()
    }

    /// Replace the local list with the server's current collection
    pub async fn reload(&mut self, options: &RequestOptions) -> Result<&[ChargingPoint], AdminError> {
        let response = self
            .send(Method::GET, COLLECTION_PATH, None, options)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to load charging points"))?;

        let records: Vec<ChargingPoint> = response.json().map_err(|e| {
            tracing::error!(error = %e, "Charging point list is not valid JSON");
            AdminError::Decode(format!("charging point list: {}", e))
        })?;

        tracing::info!(count = records.len(), "Loaded charging points");
        self.records = records;
        Ok(&self.records)
    }

    /// POST a new record; closes the editor and reloads on success
    pub async fn create(
        &mut self,
        draft: &ChargingPointDraft,
        options: &RequestOptions,
    ) -> Result<(), AdminError> {
        draft.validate()?;

        let response = self
            .send(Method::POST, COLLECTION_PATH, Some(draft_body(draft)?), options)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Create failed"))?;

        match response.json::<ChargingPoint>() {
            Ok(created) => tracing::info!(id = created.id, "Charging point created"),
            Err(_) => tracing::info!("Charging point created"),
        }

        self.editor.close();
        self.refresh_after("create", options).await;
        Ok(())
    }

    /// PUT the draft over record `id`; closes the editor and reloads on success
    pub async fn update(
        &mut self,
        id: i64,
        draft: &ChargingPointDraft,
        options: &RequestOptions,
    ) -> Result<(), AdminError> {
        draft.validate()?;

        self.send(Method::PUT, &record_path(id), Some(draft_body(draft)?), options)
            .await
            .inspect_err(|e| tracing::error!(id = id, error = %e, "Update failed"))?;

        tracing::info!(id = id, "Charging point updated");
        self.editor.close();
        self.refresh_after("update", options).await;
        Ok(())
    }

    /// DELETE record `id`; reloads on success
    pub async fn delete(&mut self, id: i64, options: &RequestOptions) -> Result<(), AdminError> {
        self.send(Method::DELETE, &record_path(id), None, options)
            .await
            .inspect_err(|e| tracing::error!(id = id, error = %e, "Delete failed"))?;

        tracing::info!(id = id, "Charging point deleted");
        self.refresh_after("delete", options).await;
        Ok(())
    }

    /// Execute an intent; the variant alone decides verb and endpoint
    pub async fn apply(&mut self, intent: Intent, options: &RequestOptions) -> Result<(), AdminError> {
        match intent {
            Intent::Create(draft) => self.create(&draft, options).await,
            Intent::Update(id, draft) => self.update(id, &draft, options).await,
        }
    }

    /// Submit the editor's current selection and draft
    pub async fn submit(&mut self, options: &RequestOptions) -> Result<(), AdminError> {
        let intent = self.editor.intent();
        self.apply(intent, options).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, AdminError> {
        if !self.http_client.credentials().is_present().await {
            return Err(AdminError::missing_credential());
        }

        let response = self
            .http_client
            .request(method, path, body, options.clone())
            .await?;

        ensure_success(response, rejection)
    }

    /// Reload after a confirmed write; failures keep the last good list
    async fn refresh_after(&mut self, operation: &str, options: &RequestOptions) {
        if let Err(e) = self.reload(options).await {
            tracing::warn!(
                operation = operation,
                error = %e,
                "Reload after write failed, showing last loaded list"
            );
        }
    }
}

fn draft_body(draft: &ChargingPointDraft) -> Result<serde_json::Value, AdminError> {
    serde_json::to_value(draft).map_err(|e| AdminError::Internal(e.into()))
}
