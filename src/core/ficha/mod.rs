//! Product ficha engine: defaults, merge, sanitize, and the flat payload
//! projection consumed by the workflow engine.

pub mod schema;

pub use schema::{
    field_names, get_schema, normalize_product, FichaSchema, FieldDef, FieldGroup, FieldType,
    SelectOption, PRODUCT_OPTIONS,
};

use crate::core::entities::{Client, OperationPayload, OperationSeed, User};
use crate::utils::format;
use indexmap::IndexMap;
use serde_json::Value;

/// Ficha payloads are flat string-keyed maps preserving schema field order.
pub type FichaMap = IndexMap<String, String>;

/// Decode a stored ficha payload. Tolerates the payload arriving as a JSON
/// object or pre-serialized as a JSON string; anything unparseable degrades
/// to an empty map. Null values are dropped so the merge falls back to
/// defaults for them.
pub fn parse_ficha(payload: Option<&Value>) -> FichaMap {
    let Some(value) = payload else {
        return FichaMap::new();
    };
    match value {
        Value::Object(map) => coerce_object(map),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => coerce_object(&map),
            _ => FichaMap::new(),
        },
        _ => FichaMap::new(),
    }
}

fn coerce_object(map: &serde_json::Map<String, Value>) -> FichaMap {
    let mut ficha = FichaMap::new();
    for (key, value) in map {
        let text = match value {
            Value::Null => continue,
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            other => other.to_string(),
        };
        ficha.insert(key.clone(), text);
    }
    ficha
}

/// Derive default field values from the acting user, the client record, and
/// carryover seed values. Pure; unknown or missing sources default to the
/// empty string. The map covers every known default key; `merge_ficha`
/// narrows it to the product's schema.
pub fn build_defaults(
    product: &str,
    client: Option<&Client>,
    user: Option<&User>,
    seed: &OperationSeed,
) -> FichaMap {
    let upper_product = normalize_product(product);
    let client_field = |pick: fn(&Client) -> &String| -> String {
        client.map(|c| pick(c).clone()).unwrap_or_default()
    };
    let client_date = |pick: fn(&Client) -> &Option<String>| -> String {
        client
            .and_then(|c| pick(c).as_deref())
            .map(format::iso_date)
            .unwrap_or_default()
    };

    let endereco = client
        .map(|c| {
            [c.rua.as_str(), c.numero.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    let mut defaults = FichaMap::new();
    defaults.insert(
        "vendedor_nome".into(),
        user.map(|u| u.nome.clone()).unwrap_or_default(),
    );
    defaults.insert("banco_nome".into(), seed.banco_digitacao.clone());
    defaults.insert("banco_para_digitar".into(), seed.banco_digitacao.clone());
    defaults.insert(
        "titulo_produto".into(),
        if upper_product == "CARTAO" {
            "CARTAO RCC AMIGOZ".to_string()
        } else {
            String::new()
        },
    );
    defaults.insert("cliente_nome".into(), client_field(|c| &c.nome));
    defaults.insert("especie".into(), client_field(|c| &c.especie));
    defaults.insert("uf_beneficio".into(), client_field(|c| &c.uf_beneficio));
    defaults.insert(
        "numero_beneficio".into(),
        client_field(|c| &c.numero_beneficio),
    );
    defaults.insert("data_nascimento".into(), client_date(|c| &c.data_nascimento));
    defaults.insert("cpf".into(), client_field(|c| &c.cpf));
    defaults.insert("rg".into(), client_field(|c| &c.rg_numero));
    defaults.insert("data_emissao".into(), client_date(|c| &c.rg_data_emissao));
    defaults.insert("data_emissao_rg".into(), client_date(|c| &c.rg_data_emissao));
    defaults.insert("nome_mae".into(), client_field(|c| &c.nome_mae));
    defaults.insert("telefone".into(), client_field(|c| &c.telefone));
    defaults.insert(
        "email".into(),
        user.map(|u| u.email.clone()).unwrap_or_default(),
    );
    defaults.insert("naturalidade".into(), client_field(|c| &c.naturalidade));
    defaults.insert("rg_uf".into(), client_field(|c| &c.rg_uf));
    defaults.insert("rg_orgao_exp".into(), client_field(|c| &c.rg_orgao_exp));
    defaults.insert(
        "salario".into(),
        format::number_to_text(client.and_then(|c| c.salario)),
    );
    defaults.insert("cep".into(), client_field(|c| &c.cep));
    defaults.insert("endereco".into(), endereco);
    defaults.insert("rua".into(), client_field(|c| &c.rua));
    defaults.insert("numero".into(), client_field(|c| &c.numero));
    defaults.insert("bairro".into(), client_field(|c| &c.bairro));
    defaults.insert("tipo_conta".into(), "CORRENTE".to_string());
    defaults.insert("margem".into(), seed.margem.clone());
    defaults.insert("prazo".into(), seed.prazo.clone());
    defaults.insert("valor_solicitado".into(), seed.valor_solicitado.clone());
    defaults.insert(
        "parcela_solicitada".into(),
        seed.parcela_solicitada.clone(),
    );
    defaults
}

/// Per-field override-over-default merge: for every schema field name, the
/// stored value wins when present, else the derived default, else "". The
/// output key set is exactly the schema's field names, so switching product
/// preserves shared field values and drops the rest.
pub fn merge_ficha(
    product: &str,
    client: Option<&Client>,
    user: Option<&User>,
    current_payload: Option<&Value>,
    seed: &OperationSeed,
) -> FichaMap {
    let Some(schema) = get_schema(product) else {
        return FichaMap::new();
    };
    let defaults = build_defaults(product, client, user, seed);
    let current = parse_ficha(current_payload);

    let mut merged = FichaMap::new();
    for name in field_names(schema) {
        let value = current
            .get(name)
            .or_else(|| defaults.get(name))
            .cloned()
            .unwrap_or_default();
        merged.insert(name.to_string(), value);
    }
    merged
}

/// Coerce a ficha payload to trimmed strings over the schema's full key set.
/// Returns None when every value is empty ("no ficha filled") or when the
/// product is unknown. `required` markers do not participate here; this is
/// the has-any-value rule, not a required-fields validator.
pub fn sanitize_ficha(product: &str, payload: Option<&Value>) -> Option<FichaMap> {
    let schema = get_schema(product)?;
    let source = parse_ficha(payload);

    let mut result = FichaMap::new();
    let mut has_value = false;
    for name in field_names(schema) {
        let text = source
            .get(name)
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        if !text.is_empty() {
            has_value = true;
        }
        result.insert(name.to_string(), text);
    }
    has_value.then_some(result)
}

/// Whether the payload carries any filled ficha field for the product.
pub fn has_ficha(product: &str, payload: Option<&Value>) -> bool {
    sanitize_ficha(product, payload).is_some()
}

fn first_number(candidates: &[&str]) -> Option<f64> {
    for candidate in candidates {
        let text = candidate.trim();
        if text.is_empty() {
            continue;
        }
        if let Ok(number) = text.parse::<f64>() {
            return Some(number);
        }
    }
    None
}

fn first_number_or(default: f64, candidates: &[&str]) -> f64 {
    first_number(candidates).unwrap_or(default)
}

fn first_text(candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|candidate| candidate.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Project a ficha into the operation's flat top-level fields. Each
/// destination field resolves through a fixed first-present-wins chain;
/// later sources are ignored once an earlier one yields a value.
pub fn build_operation_payload(
    product: &str,
    ficha_payload: Option<&Value>,
    fallback: &OperationSeed,
) -> OperationPayload {
    let sanitized = sanitize_ficha(product, ficha_payload);
    let ficha = sanitized.clone().unwrap_or_default();
    let upper_product = normalize_product(product);
    let field = |name: &str| ficha.get(name).map(String::as_str).unwrap_or("");

    let prazo = first_number_or(
        0.0,
        &[field("prazo"), field("total_parcelas"), &fallback.prazo],
    );
    let margem = first_number_or(0.0, &[field("margem"), &fallback.margem]);
    let valor_solicitado = first_number(&[
        field("valor_solicitado"),
        field("saldo_quitacao"),
        &fallback.valor_solicitado,
    ]);
    let parcela_solicitada = first_number(&[
        field("parcela_solicitada"),
        field("valor_parcela"),
        &fallback.parcela_solicitada,
    ]);
    let banco_digitacao = first_text(&[
        field("banco_para_digitar"),
        field("banco_nome"),
        field("banco_codigo"),
        &fallback.banco_digitacao,
        &upper_product,
    ]);

    OperationPayload {
        produto: upper_product,
        banco_digitacao,
        margem,
        prazo,
        valor_solicitado,
        parcela_solicitada,
        ficha_portabilidade: sanitized,
    }
}

/// Display form of a single ficha value: empty/absent renders "-", dates are
/// localized, everything else is passed through.
pub fn format_value(value: &str, field_type: FieldType) -> String {
    if value.trim().is_empty() {
        return "-".to_string();
    }
    match field_type {
        FieldType::Date => format::format_date_br(value),
        _ => value.to_string(),
    }
}
