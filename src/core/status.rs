use crate::core::types::Tone;
use serde::{Deserialize, Serialize};

/// Canonical operation status after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    ProntaDigitar,
    EmDigitacao,
    AguardandoFormalizacao,
    AnaliseBanco,
    Pendencia,
    DevolvidaVendedor,
    Aprovado,
    Reprovado,
}

/// All canonical statuses in pipeline order.
pub const ALL_STATUSES: [Status; 8] = [
    Status::ProntaDigitar,
    Status::EmDigitacao,
    Status::AguardandoFormalizacao,
    Status::AnaliseBanco,
    Status::Pendencia,
    Status::DevolvidaVendedor,
    Status::Aprovado,
    Status::Reprovado,
];

/// Alias table mapping legacy wire statuses to canonical ones.
const LEGACY_STATUS_MAP: [(&str, Status); 9] = [
    ("PENDENTE", Status::ProntaDigitar),
    ("ENVIADA_ESTEIRA", Status::ProntaDigitar),
    ("FORMALIZADA", Status::AnaliseBanco),
    ("EM_ANALISE_BANCO", Status::AnaliseBanco),
    ("PENDENTE_BANCO", Status::Pendencia),
    ("EM_TRATATIVA_VENDEDOR", Status::DevolvidaVendedor),
    ("REENVIADA_BANCO", Status::AnaliseBanco),
    ("EM_ANALISE", Status::AnaliseBanco),
    ("DEVOLVIDA", Status::DevolvidaVendedor),
];

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::ProntaDigitar => "PRONTA_DIGITAR",
            Status::EmDigitacao => "EM_DIGITACAO",
            Status::AguardandoFormalizacao => "AGUARDANDO_FORMALIZACAO",
            Status::AnaliseBanco => "ANALISE_BANCO",
            Status::Pendencia => "PENDENCIA",
            Status::DevolvidaVendedor => "DEVOLVIDA_VENDEDOR",
            Status::Aprovado => "APROVADO",
            Status::Reprovado => "REPROVADO",
        }
    }

    /// Fixed human label for the canonical status.
    pub fn label(&self) -> &'static str {
        match self {
            Status::ProntaDigitar => "Pronta para digitar",
            Status::EmDigitacao => "Em digitacao",
            Status::AguardandoFormalizacao => "Aguardando formalizacao",
            Status::AnaliseBanco => "Analise do banco",
            Status::Pendencia => "Pendencia",
            Status::DevolvidaVendedor => "Devolvida para vendedor",
            Status::Aprovado => "Aprovada",
            Status::Reprovado => "Reprovada",
        }
    }

    /// Parse an already-canonical status string.
    pub fn parse(canonical: &str) -> Option<Status> {
        ALL_STATUSES
            .iter()
            .copied()
            .find(|status| status.as_str() == canonical)
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Aprovado | Status::Reprovado)
    }

    /// Badge tone used by pipeline views.
    pub fn tone(&self) -> Tone {
        match self {
            Status::Aprovado => Tone::Green,
            Status::Reprovado => Tone::Red,
            Status::Pendencia | Status::DevolvidaVendedor => Tone::Blue,
            _ => Tone::Yellow,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw wire status: uppercase-trim, then map legacy aliases.
/// Unknown values pass through uppercased, so the function is total and
/// idempotent.
pub fn normalize_status(raw: &str) -> String {
    let normalized = raw.trim().to_uppercase();
    for (alias, canonical) in LEGACY_STATUS_MAP {
        if normalized == alias {
            return canonical.as_str().to_string();
        }
    }
    normalized
}

/// Normalize and parse a raw wire status into the canonical enum.
pub fn resolve_status(raw: &str) -> Option<Status> {
    Status::parse(&normalize_status(raw))
}

/// Human label for a raw wire status. Unknown statuses fall back to the
/// normalized value with underscores replaced; empty input yields "-".
pub fn status_label(raw: &str) -> String {
    let normalized = normalize_status(raw);
    if normalized.is_empty() {
        return "-".to_string();
    }
    match Status::parse(&normalized) {
        Some(status) => status.label().to_string(),
        None => normalized.replace('_', " "),
    }
}
