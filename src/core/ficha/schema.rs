//! Canonical per-product ficha schema registry.
//!
//! One table per product, consumed by every form and detail view. Field
//! names are unique within a schema and their order is the authoritative
//! key order for ficha payloads.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Input type rendered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Email,
}

/// One option of a select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// A single field definition inside a ficha group.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub options: &'static [SelectOption],
    pub min: Option<f64>,
    pub step: Option<&'static str>,
}

impl FieldDef {
    const fn new(name: &'static str, label: &'static str) -> Self {
        FieldDef {
            name,
            label,
            field_type: FieldType::Text,
            required: false,
            options: &[],
            min: None,
            step: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn typed(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    const fn numeric(mut self) -> Self {
        self.field_type = FieldType::Number;
        self.min = Some(0.0);
        self
    }

    const fn decimal(mut self) -> Self {
        self.field_type = FieldType::Number;
        self.min = Some(0.0);
        self.step = Some("0.01");
        self
    }

    const fn select(mut self, options: &'static [SelectOption]) -> Self {
        self.options = options;
        self
    }
}

/// Ordered group of fields with a section title.
#[derive(Debug, Clone, Serialize)]
pub struct FieldGroup {
    pub title: &'static str,
    pub fields: Vec<FieldDef>,
}

/// Complete ficha schema for one product.
#[derive(Debug, Clone, Serialize)]
pub struct FichaSchema {
    pub title: &'static str,
    pub groups: Vec<FieldGroup>,
}

const ACCOUNT_TYPE_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "CORRENTE", label: "Corrente" },
    SelectOption { value: "POUPANCA", label: "Poupanca" },
    SelectOption { value: "SALARIO", label: "Salario" },
];

/// Product selector offered when creating an operation.
pub const PRODUCT_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "NOVO", label: "Novo" },
    SelectOption { value: "PORTABILIDADE", label: "Portabilidade" },
    SelectOption { value: "REFINANCIAMENTO", label: "Refinanciamento" },
    SelectOption { value: "PORTABILIDADE_REFIN", label: "Port + Refin" },
    SelectOption { value: "CARTAO", label: "Cartao" },
];

fn portabilidade_schema() -> FichaSchema {
    FichaSchema {
        title: "Ficha para Portabilidade",
        groups: vec![
            FieldGroup {
                title: "Dados gerais",
                fields: vec![
                    FieldDef::new("vendedor_nome", "Nome do vendedor").required(),
                    FieldDef::new("banco_nome", "Nome do banco").required(),
                    FieldDef::new("cliente_negativo", "Negativo do cliente (se tiver)"),
                ],
            },
            FieldGroup {
                title: "Dados do beneficiario",
                fields: vec![
                    FieldDef::new("cliente_nome", "Nome").required(),
                    FieldDef::new("especie", "Especie").required(),
                    FieldDef::new("uf_beneficio", "UF do beneficio").required(),
                    FieldDef::new("numero_beneficio", "Numero do beneficio").required(),
                    FieldDef::new("data_nascimento", "Data de nascimento")
                        .typed(FieldType::Date)
                        .required(),
                    FieldDef::new("cpf", "CPF").required(),
                    FieldDef::new("rg", "RG").required(),
                    FieldDef::new("data_emissao", "Data emissao").typed(FieldType::Date),
                    FieldDef::new("nome_mae", "Nome da mae").required(),
                    FieldDef::new("telefone", "Telefone").required(),
                    FieldDef::new("email", "Email").typed(FieldType::Email),
                    FieldDef::new("cep", "CEP").required(),
                    FieldDef::new("endereco", "Endereco").required(),
                    FieldDef::new("bairro", "Bairro").required(),
                ],
            },
            FieldGroup {
                title: "Dados bancarios",
                fields: vec![
                    FieldDef::new("conta", "Conta").required(),
                    FieldDef::new("agencia", "Agencia").required(),
                    FieldDef::new("banco", "Banco").required(),
                    FieldDef::new("tipo_conta", "Tipo de conta")
                        .required()
                        .select(ACCOUNT_TYPE_OPTIONS),
                ],
            },
            FieldGroup {
                title: "Dados para portar",
                fields: vec![
                    FieldDef::new("banco_portado", "Banco portado").required(),
                    FieldDef::new("contrato_portado", "Contrato portado").required(),
                    FieldDef::new("total_parcelas", "Total de parcelas")
                        .numeric()
                        .required(),
                    FieldDef::new("parcelas_pagas", "Parcelas pagas")
                        .numeric()
                        .required(),
                    FieldDef::new("parcelas_restantes", "Parcelas restantes")
                        .numeric()
                        .required(),
                    FieldDef::new("saldo_quitacao", "Saldo de quitacao")
                        .decimal()
                        .required(),
                    FieldDef::new("valor_parcela", "Valor da parcela")
                        .decimal()
                        .required(),
                    FieldDef::new("prazo", "Prazo").numeric(),
                    FieldDef::new("margem", "Margem").decimal(),
                    FieldDef::new("valor_solicitado", "Valor solicitado").decimal(),
                    FieldDef::new("parcela_solicitada", "Parcela solicitada").decimal(),
                ],
            },
        ],
    }
}

fn beneficiario_completo_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("especie", "Especie").required(),
        FieldDef::new("uf_beneficio", "UF do beneficio").required(),
        FieldDef::new("cliente_nome", "Nome").required(),
        FieldDef::new("cpf", "CPF").required(),
        FieldDef::new("data_nascimento", "Data de nascimento")
            .typed(FieldType::Date)
            .required(),
        FieldDef::new("numero_beneficio", "Numero do beneficio").required(),
        FieldDef::new("telefone", "Telefone").required(),
        FieldDef::new("nome_mae", "Nome da mae").required(),
        FieldDef::new("rg", "Numero do RG").required(),
        FieldDef::new("naturalidade", "Naturalidade").required(),
        FieldDef::new("rg_uf", "UF").required(),
        FieldDef::new("rg_orgao_exp", "Orgao exp").required(),
        FieldDef::new("data_emissao_rg", "Data emissao RG")
            .typed(FieldType::Date)
            .required(),
        FieldDef::new("salario", "Salario").decimal().required(),
    ]
}

fn dados_bancarios_codigo_group() -> FieldGroup {
    FieldGroup {
        title: "Dados bancarios",
        fields: vec![
            FieldDef::new("banco_codigo", "Cod banco").required(),
            FieldDef::new("agencia", "Agencia").required(),
            FieldDef::new("conta", "Conta").required(),
            FieldDef::new("tipo_conta", "Tipo de conta")
                .required()
                .select(ACCOUNT_TYPE_OPTIONS),
        ],
    }
}

fn endereco_group() -> FieldGroup {
    FieldGroup {
        title: "Endereco",
        fields: vec![
            FieldDef::new("cep", "CEP").required(),
            FieldDef::new("rua", "Rua").required(),
            FieldDef::new("numero", "N").required(),
            FieldDef::new("bairro", "Bairro").required(),
        ],
    }
}

fn novo_schema() -> FichaSchema {
    FichaSchema {
        title: "Ficha para Novo",
        groups: vec![
            FieldGroup {
                title: "Dados gerais",
                fields: vec![
                    FieldDef::new("banco_para_digitar", "Banco pra digitar").required(),
                    FieldDef::new("vendedor_nome", "Nome do vendedor").required(),
                    FieldDef::new("valor_solicitado", "Valor solicitado").decimal(),
                    FieldDef::new("parcela_solicitada", "Parcela solicitada").decimal(),
                    FieldDef::new("margem", "Margem").decimal().required(),
                    FieldDef::new("prazo", "Prazo").numeric().required(),
                ],
            },
            FieldGroup {
                title: "Dados do beneficiario",
                fields: beneficiario_completo_fields(),
            },
            dados_bancarios_codigo_group(),
            endereco_group(),
        ],
    }
}

fn cartao_schema() -> FichaSchema {
    FichaSchema {
        title: "Ficha para Cartao",
        groups: vec![
            FieldGroup {
                title: "Dados gerais",
                fields: vec![
                    FieldDef::new("titulo_produto", "Produto").required(),
                    FieldDef::new("vendedor_nome", "Nome do vendedor").required(),
                    FieldDef::new("valor_solicitado", "Valor solicitado").decimal(),
                    FieldDef::new("parcela_solicitada", "Parcela solicitada").decimal(),
                    FieldDef::new("margem", "Margem").decimal().required(),
                    FieldDef::new("prazo", "Prazo").numeric(),
                ],
            },
            FieldGroup {
                title: "Dados do beneficiario",
                fields: beneficiario_completo_fields(),
            },
            dados_bancarios_codigo_group(),
            endereco_group(),
        ],
    }
}

static PORTABILIDADE: LazyLock<FichaSchema> = LazyLock::new(portabilidade_schema);
static NOVO: LazyLock<FichaSchema> = LazyLock::new(novo_schema);
static CARTAO: LazyLock<FichaSchema> = LazyLock::new(cartao_schema);

/// Normalize a product code the way every lookup does: trim and uppercase.
pub fn normalize_product(product: &str) -> String {
    product.trim().to_uppercase()
}

/// Look up the ficha schema for a product code. Case-insensitive, trimmed;
/// PORTABILIDADE_REFIN and REFINANCIAMENTO alias the PORTABILIDADE schema.
/// Unknown products yield None.
pub fn get_schema(product: &str) -> Option<&'static FichaSchema> {
    match normalize_product(product).as_str() {
        "PORTABILIDADE" | "PORTABILIDADE_REFIN" | "REFINANCIAMENTO" => Some(&PORTABILIDADE),
        "NOVO" => Some(&NOVO),
        "CARTAO" => Some(&CARTAO),
        _ => None,
    }
}

/// All field names of a schema, flattened across groups in insertion order.
/// This is the authoritative key set for ficha payloads.
pub fn field_names(schema: &FichaSchema) -> Vec<&'static str> {
    schema
        .groups
        .iter()
        .flat_map(|group| group.fields.iter().map(|field| field.name))
        .collect()
}
