//! Pipeline orchestration: polling the server, projecting display rows, and
//! driving status transitions through the workflow gates.

use crate::api::PipelineApi;
use crate::core::entities::{
    Operation, OperationComment, OperationPayload, StatusHistoryEntry,
};
use crate::core::error::AppError;
use crate::core::events::{AppEvent, EventBus};
use crate::core::ficha::build_operation_payload;
use crate::core::status::{normalize_status, resolve_status, status_label, Status};
use crate::core::workflow::draft::{DraftStore, EditorState};
use crate::core::workflow::priority::{priority_meta, PriorityMeta};
use crate::core::workflow::{plan_transition, EditorKind, TransitionDraft};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One display row of the pipeline board. A pure projection of the server
/// record plus local draft/editor state; rebuilt on every refresh.
#[derive(Debug, Clone)]
pub struct PipelineRow {
    pub operation: Operation,
    /// Canonical status string after legacy-alias normalization.
    pub normalized_status: String,
    /// Resolved status, None when the server sent something unknown.
    pub status: Option<Status>,
    pub priority: PriorityMeta,
    pub draft: TransitionDraft,
    pub editor: EditorState,
}

impl PipelineRow {
    /// Targets the workflow allows from this row's current status.
    pub fn available_targets(&self) -> &'static [Status] {
        self.status
            .map(crate::core::workflow::allowed_targets)
            .unwrap_or(&[])
    }
}

/// Coordinates the pipeline views: owns the draft store, talks to the API,
/// and publishes events after every state-changing action.
pub struct PipelineService {
    api: Arc<dyn PipelineApi>,
    bus: EventBus,
    drafts: DraftStore,
}

impl PipelineService {
    pub fn new(api: Arc<dyn PipelineApi>, bus: EventBus) -> Self {
        PipelineService {
            api,
            bus,
            drafts: DraftStore::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Fetch the pipeline, reconcile local drafts against it, and project
    /// sorted display rows. Oldest operations first; rows with no parseable
    /// creation time sort last.
    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<Vec<PipelineRow>, AppError> {
        let operations = self.api.fetch_pipeline().await?;
        debug!(count = operations.len(), "pipeline fetched");
        self.drafts.reconcile(&operations);
        Ok(self.project_rows(operations, now))
    }

    /// Pure row projection against a sampled `now`; also used by the watch
    /// loop to recompute priority tones without another fetch.
    pub fn project_rows(&self, operations: Vec<Operation>, now: DateTime<Utc>) -> Vec<PipelineRow> {
        let mut rows: Vec<PipelineRow> = operations
            .into_iter()
            .map(|operation| {
                let normalized_status = normalize_status(&operation.status);
                let status = resolve_status(&operation.status);
                let priority = priority_meta(operation.criado_em.as_deref(), now);
                let draft = self.drafts.draft_for(&operation);
                let editor = self.drafts.editor(operation.id);
                PipelineRow {
                    operation,
                    normalized_status,
                    status,
                    priority,
                    draft,
                    editor,
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            a.priority
                .created_ms
                .cmp(&b.priority.created_ms)
                .then(a.operation.id.cmp(&b.operation.id))
        });
        rows
    }

    /// Run a status transition: evaluate the gate locally, submit on success,
    /// and broadcast the change. A failed gate never reaches the network; if
    /// it names an editor, that editor is opened so the missing field can be
    /// filled in.
    pub async fn request_transition(
        &self,
        operation: &Operation,
        target: Status,
    ) -> Result<Operation, AppError> {
        let draft = self.drafts.draft_for(operation);
        let request = match plan_transition(&operation.status, target, &draft) {
            Ok(request) => request,
            Err(error) => {
                if let Some(editor) = error.context.get("editor") {
                    let kind = if editor == "reprovacao" {
                        EditorKind::Rejection
                    } else {
                        EditorKind::Pendency
                    };
                    self.drafts.open_editor(operation.id, kind);
                }
                warn!(
                    operation_id = operation.id,
                    to = %target,
                    message = %error.message,
                    "transition blocked"
                );
                return Err(error);
            }
        };

        let updated = self
            .api
            .update_operation_status(operation.id, &request)
            .await?;
        info!(
            operation_id = operation.id,
            from = %normalize_status(&operation.status),
            to = %target,
            "operation transitioned"
        );
        self.drafts.close_editors(operation.id);
        self.drafts
            .put(operation.id, TransitionDraft::from_operation(&updated));
        self.bus.publish(AppEvent::PipelineChanged);
        self.bus.publish(AppEvent::NotificationsRefresh);
        Ok(updated)
    }

    /// Resolve an operation's pendency, returning it to bank analysis.
    pub async fn resolve_pendency(&self, operation: &Operation) -> Result<Operation, AppError> {
        self.request_transition(operation, Status::AnaliseBanco).await
    }

    /// Return an operation to the seller with the draft's motivo.
    pub async fn return_to_seller(&self, operation: &Operation) -> Result<Operation, AppError> {
        self.request_transition(operation, Status::DevolvidaVendedor)
            .await
    }

    pub async fn approve(&self, operation: &Operation) -> Result<Operation, AppError> {
        self.request_transition(operation, Status::Aprovado).await
    }

    /// Reject with the draft's reason code plus optional detail.
    pub async fn reject(&self, operation: &Operation) -> Result<Operation, AppError> {
        self.request_transition(operation, Status::Reprovado).await
    }

    /// Project the ficha into flat fields and update an existing operation.
    pub fn payload_for(&self, operation: &Operation) -> OperationPayload {
        let seed = crate::core::entities::OperationSeed::from_operation(operation);
        build_operation_payload(
            &operation.produto,
            operation.ficha_portabilidade.as_ref(),
            &seed,
        )
    }

    pub async fn submit_ficha(
        &self,
        operation: &Operation,
        payload: &OperationPayload,
    ) -> Result<Operation, AppError> {
        let updated = self.api.update_operation(operation.id, payload).await?;
        info!(operation_id = operation.id, "ficha submitted");
        self.bus.publish(AppEvent::PipelineChanged);
        Ok(updated)
    }

    pub async fn create_operation(
        &self,
        client_id: i64,
        payload: &OperationPayload,
    ) -> Result<Operation, AppError> {
        let created = self.api.create_operation(client_id, payload).await?;
        info!(client_id, operation_id = created.id, "operation created");
        self.bus.publish(AppEvent::PipelineChanged);
        Ok(created)
    }

    /// Seller-side submit/resend of an operation into the pipeline.
    pub async fn send_to_pipeline(&self, operation_id: i64) -> Result<(), AppError> {
        self.api.send_to_pipeline(operation_id).await?;
        info!(operation_id, "operation sent to pipeline");
        self.bus.publish(AppEvent::PipelineChanged);
        self.bus.publish(AppEvent::NotificationsRefresh);
        Ok(())
    }

    pub async fn status_history(
        &self,
        operation_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, AppError> {
        Ok(self.api.fetch_status_history(operation_id).await?)
    }

    pub async fn comments(&self, operation_id: i64) -> Result<Vec<OperationComment>, AppError> {
        Ok(self.api.fetch_comments(operation_id).await?)
    }

    /// Client record backing an operation's ficha defaults.
    pub async fn client(
        &self,
        client_id: i64,
    ) -> Result<crate::core::entities::Client, AppError> {
        Ok(self.api.fetch_client(client_id).await?)
    }

    pub async fn add_comment(
        &self,
        operation_id: i64,
        message: &str,
    ) -> Result<OperationComment, AppError> {
        let comment = self.api.add_comment(operation_id, message.trim()).await?;
        self.bus.publish(AppEvent::NotificationsRefresh);
        Ok(comment)
    }
}

/// Display form of one history entry's transition: "<from> -> <to>",
/// collapsed to a single label when the origin is absent or unchanged.
pub fn format_history_transition(entry: &StatusHistoryEntry) -> String {
    let from = status_label(&entry.previous_status);
    let to = status_label(&entry.next_status);
    if from == "-" || from == to {
        to
    } else {
        format!("{} -> {}", from, to)
    }
}

/// Display form of who performed a history entry: "Name (ROLE)", "Name", or
/// "Sistema" for server-originated changes.
pub fn format_history_actor(entry: &StatusHistoryEntry) -> String {
    let name = entry.changed_by_name.trim();
    let role = entry.changed_by_role.trim();
    match (name.is_empty(), role.is_empty()) {
        (true, _) => "Sistema".to_string(),
        (false, true) => name.to_string(),
        (false, false) => format!("{} ({})", name, role.to_uppercase()),
    }
}
