use esteira::core::entities::OperationSeed;
use esteira::core::ficha::build_operation_payload;
use serde_json::json;

fn no_fallback() -> OperationSeed {
    OperationSeed::default()
}

#[test]
fn portabilidade_falls_back_to_quitacao_and_parcela() {
    let ficha = json!({
        "saldo_quitacao": "1500",
        "valor_parcela": "120"
    });
    let payload = build_operation_payload("PORTABILIDADE", Some(&ficha), &no_fallback());

    assert_eq!(payload.produto, "PORTABILIDADE");
    assert_eq!(payload.valor_solicitado, Some(1500.0));
    assert_eq!(payload.parcela_solicitada, Some(120.0));
    assert_eq!(payload.margem, 0.0);
    assert_eq!(payload.prazo, 0.0);
}

#[test]
fn explicit_fields_win_over_later_chain_sources() {
    let ficha = json!({
        "valor_solicitado": "9000",
        "saldo_quitacao": "1500",
        "parcela_solicitada": "300",
        "valor_parcela": "120",
        "prazo": "84",
        "total_parcelas": "96"
    });
    let payload = build_operation_payload("PORTABILIDADE", Some(&ficha), &no_fallback());

    assert_eq!(payload.valor_solicitado, Some(9000.0));
    assert_eq!(payload.parcela_solicitada, Some(300.0));
    assert_eq!(payload.prazo, 84.0);
}

#[test]
fn prazo_chain_reaches_total_parcelas_then_fallback() {
    let ficha = json!({"total_parcelas": "96"});
    let payload = build_operation_payload("PORTABILIDADE", Some(&ficha), &no_fallback());
    assert_eq!(payload.prazo, 96.0);

    let fallback = OperationSeed {
        prazo: "48".to_string(),
        ..OperationSeed::default()
    };
    // Ficha has some value so it is kept, but no prazo source inside it.
    let ficha = json!({"cpf": "1"});
    let payload = build_operation_payload("NOVO", Some(&ficha), &fallback);
    assert_eq!(payload.prazo, 48.0);

    let payload = build_operation_payload("NOVO", None, &no_fallback());
    assert_eq!(payload.prazo, 0.0);
}

#[test]
fn margem_defaults_to_zero_but_nullable_fields_stay_none() {
    let payload = build_operation_payload("NOVO", None, &no_fallback());
    assert_eq!(payload.margem, 0.0);
    assert_eq!(payload.prazo, 0.0);
    assert_eq!(payload.valor_solicitado, None);
    assert_eq!(payload.parcela_solicitada, None);
}

#[test]
fn banco_chain_ends_at_the_product_name() {
    let payload = build_operation_payload("NOVO", None, &no_fallback());
    assert_eq!(payload.banco_digitacao, "NOVO");

    let fallback = OperationSeed {
        banco_digitacao: "BANCO BETA".to_string(),
        ..OperationSeed::default()
    };
    let payload = build_operation_payload("NOVO", None, &fallback);
    assert_eq!(payload.banco_digitacao, "BANCO BETA");

    let ficha = json!({"banco_codigo": "341"});
    let payload = build_operation_payload("NOVO", Some(&ficha), &fallback);
    assert_eq!(payload.banco_digitacao, "341");

    let ficha = json!({"banco_codigo": "341", "banco_para_digitar": "BANCO GAMA"});
    let payload = build_operation_payload("NOVO", Some(&ficha), &fallback);
    assert_eq!(payload.banco_digitacao, "BANCO GAMA");
}

#[test]
fn banco_nome_beats_banco_codigo() {
    let ficha = json!({"banco_nome": "BANCO DELTA", "banco_codigo": "104"});
    let payload = build_operation_payload("PORTABILIDADE", Some(&ficha), &no_fallback());
    assert_eq!(payload.banco_digitacao, "BANCO DELTA");
}

#[test]
fn unparseable_numbers_are_skipped_in_the_chain() {
    let ficha = json!({
        "valor_solicitado": "muito",
        "saldo_quitacao": "1500.75"
    });
    let payload = build_operation_payload("PORTABILIDADE", Some(&ficha), &no_fallback());
    assert_eq!(payload.valor_solicitado, Some(1500.75));
}

#[test]
fn product_aliases_and_casing_normalize() {
    let payload = build_operation_payload(" portabilidade_refin ", None, &no_fallback());
    assert_eq!(payload.produto, "PORTABILIDADE_REFIN");
    // Aliased products still project through the PORTABILIDADE schema.
    let ficha = json!({"saldo_quitacao": "800"});
    let payload = build_operation_payload("REFINANCIAMENTO", Some(&ficha), &no_fallback());
    assert_eq!(payload.valor_solicitado, Some(800.0));
}

#[test]
fn empty_ficha_projects_without_payload() {
    let payload = build_operation_payload("NOVO", Some(&json!({})), &no_fallback());
    assert!(payload.ficha_portabilidade.is_none());

    let payload = build_operation_payload("NOVO", Some(&json!({"cpf": "1"})), &no_fallback());
    let ficha = payload.ficha_portabilidade.unwrap();
    assert_eq!(ficha["cpf"], "1");
}

#[test]
fn unknown_product_projects_from_fallback_only() {
    let fallback = OperationSeed {
        banco_digitacao: "BANCO X".to_string(),
        margem: "300".to_string(),
        prazo: "12".to_string(),
        valor_solicitado: "1000".to_string(),
        parcela_solicitada: "90".to_string(),
    };
    // No schema means no sanitized ficha; field chains resolve via fallback.
    let ficha = json!({"saldo_quitacao": "999"});
    let payload = build_operation_payload("CONSORCIO", Some(&ficha), &fallback);
    assert_eq!(payload.produto, "CONSORCIO");
    assert!(payload.ficha_portabilidade.is_none());
    assert_eq!(payload.margem, 300.0);
    assert_eq!(payload.prazo, 12.0);
    assert_eq!(payload.valor_solicitado, Some(1000.0));
    assert_eq!(payload.parcela_solicitada, Some(90.0));
    assert_eq!(payload.banco_digitacao, "BANCO X");
}
