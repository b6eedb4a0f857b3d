//! Status workflow engine: transition legality, draft gating, and the
//! update request handed to the pipeline API.

pub mod draft;
pub mod priority;

use crate::core::entities::Operation;
use crate::core::error::AppError;
use crate::core::status::{resolve_status, Status};
use crate::core::types::ErrorCategory;
use serde::{Deserialize, Serialize};

/// Pendency classification selected when flagging an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendencyType {
    Documentacao,
    Assinatura,
    Margem,
    DivergenciaCadastral,
    Outros,
}

impl PendencyType {
    pub const ALL: [PendencyType; 5] = [
        PendencyType::Documentacao,
        PendencyType::Assinatura,
        PendencyType::Margem,
        PendencyType::DivergenciaCadastral,
        PendencyType::Outros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PendencyType::Documentacao => "DOCUMENTACAO",
            PendencyType::Assinatura => "ASSINATURA",
            PendencyType::Margem => "MARGEM",
            PendencyType::DivergenciaCadastral => "DIVERGENCIA_CADASTRAL",
            PendencyType::Outros => "OUTROS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PendencyType::Documentacao => "Documentacao",
            PendencyType::Assinatura => "Assinatura",
            PendencyType::Margem => "Margem",
            PendencyType::DivergenciaCadastral => "Divergencia cadastral",
            PendencyType::Outros => "Outros",
        }
    }
}

/// Reason code required before an operation can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    MargemInsuficiente,
    DocumentacaoInvalida,
    DivergenciaCadastral,
    PoliticaBanco,
    DesistenciaCliente,
    Outros,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 6] = [
        RejectionReason::MargemInsuficiente,
        RejectionReason::DocumentacaoInvalida,
        RejectionReason::DivergenciaCadastral,
        RejectionReason::PoliticaBanco,
        RejectionReason::DesistenciaCliente,
        RejectionReason::Outros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MargemInsuficiente => "MARGEM_INSUFICIENTE",
            RejectionReason::DocumentacaoInvalida => "DOCUMENTACAO_INVALIDA",
            RejectionReason::DivergenciaCadastral => "DIVERGENCIA_CADASTRAL",
            RejectionReason::PoliticaBanco => "POLITICA_BANCO",
            RejectionReason::DesistenciaCliente => "DESISTENCIA_CLIENTE",
            RejectionReason::Outros => "OUTROS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RejectionReason::MargemInsuficiente => "Margem insuficiente",
            RejectionReason::DocumentacaoInvalida => "Documentacao invalida",
            RejectionReason::DivergenciaCadastral => "Divergencia cadastral",
            RejectionReason::PoliticaBanco => "Politica do banco",
            RejectionReason::DesistenciaCliente => "Desistencia do cliente",
            RejectionReason::Outros => "Outros",
        }
    }

    pub fn parse(code: &str) -> Option<RejectionReason> {
        let trimmed = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|reason| reason.as_str() == trimmed)
    }
}

/// Local edit buffer holding the gating fields for one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionDraft {
    pub link_formalizacao: String,
    pub pendencia_tipo: String,
    pub pendencia_motivo: String,
    pub motivo_reprovacao: String,
    /// Selected rejection reason code; never populated from the server.
    pub reprovacao_tipo: String,
}

impl TransitionDraft {
    /// Rebuild the draft from the authoritative server record.
    pub fn from_operation(operation: &Operation) -> Self {
        TransitionDraft {
            link_formalizacao: operation.link_formalizacao.clone(),
            pendencia_tipo: operation.pendencia_tipo.clone(),
            pendencia_motivo: operation.pendencia_motivo.clone(),
            motivo_reprovacao: operation.motivo_reprovacao.clone(),
            reprovacao_tipo: String::new(),
        }
    }
}

/// Body submitted to the API for a status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub pendencia_tipo: String,
    pub pendencia_motivo: String,
    pub link_formalizacao: String,
    pub motivo_reprovacao: String,
    pub status: String,
}

/// Which inline editor a failed gate check should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Pendency,
    Rejection,
}

impl EditorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorKind::Pendency => "pendencia",
            EditorKind::Rejection => "reprovacao",
        }
    }
}

/// Legal transition targets per canonical status. Self-transitions on
/// ANALISE_BANCO and PENDENCIA carry pendency edits (clear and update
/// respectively); DEVOLVIDA_VENDEDOR is reopened by the seller-side resend,
/// not by this engine.
pub fn allowed_targets(status: Status) -> &'static [Status] {
    match status {
        Status::ProntaDigitar => &[Status::EmDigitacao],
        Status::EmDigitacao => &[Status::AguardandoFormalizacao],
        Status::AguardandoFormalizacao => &[Status::AnaliseBanco],
        Status::AnaliseBanco => &[
            Status::AnaliseBanco,
            Status::Pendencia,
            Status::DevolvidaVendedor,
            Status::Aprovado,
            Status::Reprovado,
        ],
        Status::Pendencia => &[
            Status::Pendencia,
            Status::AnaliseBanco,
            Status::DevolvidaVendedor,
        ],
        Status::DevolvidaVendedor => &[],
        Status::Aprovado | Status::Reprovado => &[],
    }
}

fn validation_error(message: &str, editor: Option<EditorKind>) -> AppError {
    let mut error = AppError::new(ErrorCategory::ValidationError, message);
    if let Some(kind) = editor {
        error.add_context("editor", kind.as_str());
    }
    error
}

/// Evaluate the gate for a requested transition and build the request body.
///
/// Fails locally (no network effect) with the user-facing message when the
/// current status is unknown or terminal, the transition is not in the
/// legality table, or the target's required draft field is missing. On the
/// resolve path (target ANALISE_BANCO) the pendency fields are cleared.
pub fn plan_transition(
    current_status: &str,
    target: Status,
    draft: &TransitionDraft,
) -> Result<TransitionRequest, AppError> {
    let current = resolve_status(current_status).ok_or_else(|| {
        validation_error(
            &format!("Status desconhecido: {}", current_status.trim()),
            None,
        )
    })?;

    if current.is_terminal() {
        return Err(validation_error(
            &format!("Operacao finalizada nao aceita transicoes ({})", current),
            None,
        ));
    }
    if !allowed_targets(current).contains(&target) {
        return Err(validation_error(
            &format!("Transicao invalida: {} -> {}", current, target),
            None,
        ));
    }

    let mut request = TransitionRequest {
        pendencia_tipo: draft.pendencia_tipo.trim().to_string(),
        pendencia_motivo: draft.pendencia_motivo.trim().to_string(),
        link_formalizacao: draft.link_formalizacao.trim().to_string(),
        motivo_reprovacao: draft.motivo_reprovacao.trim().to_string(),
        status: target.as_str().to_string(),
    };

    match target {
        Status::AguardandoFormalizacao => {
            if request.link_formalizacao.is_empty() {
                return Err(validation_error(
                    "Informe o link de formalizacao para devolver ao vendedor.",
                    None,
                ));
            }
        }
        Status::Pendencia => {
            if request.pendencia_motivo.is_empty() {
                return Err(validation_error(
                    "Informe o motivo da pendencia.",
                    Some(EditorKind::Pendency),
                ));
            }
        }
        Status::DevolvidaVendedor => {
            if request.pendencia_motivo.is_empty() {
                return Err(validation_error(
                    "Informe o motivo para devolver ao vendedor.",
                    Some(EditorKind::Pendency),
                ));
            }
        }
        Status::Reprovado => {
            request.motivo_reprovacao = compose_rejection_reason(draft)?;
        }
        Status::AnaliseBanco => {
            // Resolving (or clearing) a pendency wipes its fields.
            request.pendencia_tipo.clear();
            request.pendencia_motivo.clear();
        }
        _ => {}
    }

    Ok(request)
}

/// Compose the final rejection reason from the required reason code plus the
/// optional free-text detail: `"<label>: <detail>"`, or just the label.
pub fn compose_rejection_reason(draft: &TransitionDraft) -> Result<String, AppError> {
    let reason = RejectionReason::parse(&draft.reprovacao_tipo).ok_or_else(|| {
        validation_error(
            "Selecione o motivo da reprovacao.",
            Some(EditorKind::Rejection),
        )
    })?;
    let detail = draft.motivo_reprovacao.trim();
    if detail.is_empty() {
        Ok(reason.label().to_string())
    } else {
        Ok(format!("{}: {}", reason.label(), detail))
    }
}
