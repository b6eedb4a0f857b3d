//! Per-operation draft buffers and editor state, keyed by operation id.
//!
//! Each pipeline row owns a local edit buffer reconciled against the server
//! record on every poll: server state wins unless a pendency or rejection
//! editor is open for that operation, in which case local edits survive the
//! refresh.

use crate::core::entities::Operation;
use crate::core::workflow::{EditorKind, TransitionDraft};
use dashmap::DashMap;

/// Which inline editor is open for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    EditingPendency,
    EditingRejection,
}

impl EditorState {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditorState::Closed)
    }

    pub fn from_kind(kind: EditorKind) -> Self {
        match kind {
            EditorKind::Pendency => EditorState::EditingPendency,
            EditorKind::Rejection => EditorState::EditingRejection,
        }
    }
}

/// Shared store of drafts and editor states across pipeline views.
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: DashMap<i64, TransitionDraft>,
    editors: DashMap<i64, EditorState>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft for an operation, falling back to the server record.
    pub fn draft_for(&self, operation: &Operation) -> TransitionDraft {
        self.drafts
            .get(&operation.id)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| TransitionDraft::from_operation(operation))
    }

    /// Replace the whole draft for an operation.
    pub fn put(&self, operation_id: i64, draft: TransitionDraft) {
        self.drafts.insert(operation_id, draft);
    }

    /// Apply a single field edit to an operation's draft.
    pub fn edit<F: FnOnce(&mut TransitionDraft)>(&self, operation: &Operation, apply: F) {
        let mut draft = self.draft_for(operation);
        apply(&mut draft);
        self.drafts.insert(operation.id, draft);
    }

    pub fn editor(&self, operation_id: i64) -> EditorState {
        self.editors
            .get(&operation_id)
            .map(|entry| *entry)
            .unwrap_or_default()
    }

    /// Open one editor, closing the other (at most one open per operation).
    pub fn open_editor(&self, operation_id: i64, kind: EditorKind) {
        self.editors
            .insert(operation_id, EditorState::from_kind(kind));
    }

    pub fn close_editors(&self, operation_id: i64) {
        self.editors.insert(operation_id, EditorState::Closed);
    }

    pub fn toggle_editor(&self, operation_id: i64, kind: EditorKind) {
        let next = EditorState::from_kind(kind);
        let current = self.editor(operation_id);
        if current == next {
            self.close_editors(operation_id);
        } else {
            self.editors.insert(operation_id, next);
        }
    }

    /// Reconcile drafts against a fresh pipeline snapshot. Operations absent
    /// from the snapshot are dropped; the rest are rebuilt from the server
    /// record unless an editor is open for them.
    pub fn reconcile(&self, operations: &[Operation]) {
        let ids: std::collections::HashSet<i64> =
            operations.iter().map(|operation| operation.id).collect();
        self.drafts.retain(|id, _| ids.contains(id));
        self.editors.retain(|id, _| ids.contains(id));

        for operation in operations {
            if self.editor(operation.id).is_open() && self.drafts.contains_key(&operation.id) {
                continue;
            }
            self.drafts
                .insert(operation.id, TransitionDraft::from_operation(operation));
        }
    }
}
