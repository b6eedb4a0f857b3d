use crate::core::ficha::FichaMap;
use crate::utils::format::number_to_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operation record as returned by the pipeline API.
///
/// Timestamps and ficha payloads are kept in wire form: the backend has sent
/// both RFC 3339 and localized date strings over time, and the ficha arrives
/// either as a JSON object or pre-serialized as a JSON string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    #[serde(default)]
    pub cliente_id: Option<i64>,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub produto: String,
    #[serde(default)]
    pub banco_digitacao: String,
    #[serde(default)]
    pub margem: Option<f64>,
    #[serde(default)]
    pub prazo: Option<f64>,
    #[serde(default)]
    pub valor_solicitado: Option<f64>,
    #[serde(default)]
    pub parcela_solicitada: Option<f64>,
    #[serde(default)]
    pub valor_liberado: Option<f64>,
    #[serde(default)]
    pub parcela_liberada: Option<f64>,
    #[serde(default)]
    pub link_formalizacao: String,
    #[serde(default)]
    pub pendencia_tipo: String,
    #[serde(default)]
    pub pendencia_motivo: String,
    #[serde(default)]
    pub motivo_reprovacao: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ficha_portabilidade: Option<Value>,
    #[serde(default)]
    pub criado_em: Option<String>,
    #[serde(default)]
    pub atualizado_em: Option<String>,
}

/// Carryover values seeded into ficha defaults when re-opening an operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationSeed {
    pub banco_digitacao: String,
    pub margem: String,
    pub prazo: String,
    pub valor_solicitado: String,
    pub parcela_solicitada: String,
}

impl OperationSeed {
    /// Derive the seed from an existing operation record. Numeric fields are
    /// carried as strings, absent values as empty strings.
    pub fn from_operation(operation: &Operation) -> Self {
        OperationSeed {
            banco_digitacao: operation.banco_digitacao.clone(),
            margem: number_to_text(operation.margem),
            prazo: number_to_text(operation.prazo),
            valor_solicitado: number_to_text(operation.valor_solicitado),
            parcela_solicitada: number_to_text(operation.parcela_solicitada),
        }
    }
}

/// Flat operation fields projected from a sanitized ficha, submitted to the
/// API on create/update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationPayload {
    pub produto: String,
    pub banco_digitacao: String,
    pub margem: f64,
    pub prazo: f64,
    pub valor_solicitado: Option<f64>,
    pub parcela_solicitada: Option<f64>,
    pub ficha_portabilidade: Option<FichaMap>,
}

/// Client record seeding ficha defaults. Read-only from this crate's
/// perspective.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub especie: String,
    #[serde(default)]
    pub uf_beneficio: String,
    #[serde(default)]
    pub numero_beneficio: String,
    #[serde(default)]
    pub data_nascimento: Option<String>,
    #[serde(default)]
    pub rg_numero: String,
    #[serde(default)]
    pub rg_data_emissao: Option<String>,
    #[serde(default)]
    pub rg_uf: String,
    #[serde(default)]
    pub rg_orgao_exp: String,
    #[serde(default)]
    pub naturalidade: String,
    #[serde(default)]
    pub nome_mae: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub salario: Option<f64>,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub rua: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub bairro: String,
}

/// Acting user (seller or data-entry role).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
}

/// One entry of an operation's status-change history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub previous_status: String,
    #[serde(default)]
    pub next_status: String,
    #[serde(default)]
    pub changed_by_name: String,
    #[serde(default)]
    pub changed_by_role: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Free-text comment attached to an operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationComment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_role: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
