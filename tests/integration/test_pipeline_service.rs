use chrono::Utc;
use esteira::api::HttpPipelineClient;
use esteira::core::config::EsteiraConfig;
use esteira::core::entities::Operation;
use esteira::core::events::{AppEvent, EventBus};
use esteira::core::pipeline::PipelineService;
use esteira::core::status::Status;
use esteira::core::workflow::draft::EditorState;
use serde_json::json;
use std::sync::Arc;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn service_for(server: &MockServer) -> PipelineService {
    let mut config = EsteiraConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    let client = HttpPipelineClient::from_config(&config).unwrap();
    PipelineService::new(Arc::new(client), EventBus::new())
}

fn operation(id: i64, status: &str) -> Operation {
    Operation {
        id,
        status: status.to_string(),
        ..Operation::default()
    }
}

#[tokio::test]
async fn refresh_sorts_oldest_first_with_missing_dates_last() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pipeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "status": "PENDENTE", "criado_em": "2024-06-10T10:00:00Z"},
            {"id": 2, "status": "ANALISE_BANCO", "criado_em": "2024-06-09T10:00:00Z"},
            {"id": 3, "status": "PENDENTE"},
            {"id": 4, "status": "PENDENTE", "criado_em": "2024-06-09T10:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let service = service_for(&server).await;
    let rows = service.refresh(Utc::now()).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|row| row.operation.id).collect();
    // Ties break by id; missing criado_em sorts last.
    assert_eq!(ids, vec![2, 4, 1, 3]);
    assert_eq!(rows[3].priority.label, "-");

    // Legacy status normalization is part of the projection.
    assert_eq!(rows[2].normalized_status, "PRONTA_DIGITAR");
    assert_eq!(rows[2].status, Some(Status::ProntaDigitar));
    assert_eq!(
        rows[2].available_targets(),
        &[Status::EmDigitacao]
    );
}

#[tokio::test]
async fn successful_transition_publishes_events_and_closes_editors() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/operations/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "status": "APROVADO"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server).await;
    let mut events = service.events().subscribe();
    let current = operation(42, "ANALISE_BANCO");

    let updated = service
        .request_transition(&current, Status::Aprovado)
        .await
        .unwrap();
    assert_eq!(updated.status, "APROVADO");
    assert_eq!(events.recv().await.unwrap(), AppEvent::PipelineChanged);
    assert_eq!(events.recv().await.unwrap(), AppEvent::NotificationsRefresh);
    assert_eq!(service.drafts().editor(42), EditorState::Closed);
}

#[tokio::test]
async fn failed_gate_never_reaches_the_network_and_opens_editor() {
    let server = MockServer::start().await;
    // No PUT mock mounted: any network attempt would fail loudly, and we
    // assert below that none was made.

    let service = service_for(&server).await;
    let current = operation(7, "ANALISE_BANCO");

    let error = service
        .request_transition(&current, Status::Pendencia)
        .await
        .unwrap_err();
    assert!(error.is_validation());
    assert_eq!(error.message, "Informe o motivo da pendencia.");
    assert_eq!(service.drafts().editor(7), EditorState::EditingPendency);
    assert!(server.received_requests().await.unwrap().is_empty());

    let error = service
        .request_transition(&current, Status::Reprovado)
        .await
        .unwrap_err();
    assert_eq!(error.message, "Selecione o motivo da reprovacao.");
    assert_eq!(service.drafts().editor(7), EditorState::EditingRejection);
}

#[tokio::test]
async fn api_failure_preserves_draft_and_editor_state() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/operations/5"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "Status ja alterado"})),
        )
        .mount(&server)
        .await;

    let service = service_for(&server).await;
    let current = operation(5, "PENDENCIA");
    service.drafts().edit(&current, |draft| {
        draft.pendencia_motivo = "falta assinatura".to_string();
    });

    let error = service
        .request_transition(&current, Status::DevolvidaVendedor)
        .await
        .unwrap_err();
    assert!(!error.is_validation());
    assert!(error.message.contains("Status ja alterado"));
    // The local edit survives the failed submit.
    assert_eq!(
        service.drafts().draft_for(&current).pendencia_motivo,
        "falta assinatura"
    );
}

#[tokio::test]
async fn draft_edits_flow_into_the_submitted_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/operations/9"))
        .and(wiremock::matchers::body_json(json!({
            "pendencia_tipo": "DOCUMENTACAO",
            "pendencia_motivo": "falta RG",
            "link_formalizacao": "",
            "motivo_reprovacao": "",
            "status": "PENDENCIA"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "status": "PENDENCIA",
            "pendencia_tipo": "DOCUMENTACAO",
            "pendencia_motivo": "falta RG"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server).await;
    let current = operation(9, "ANALISE_BANCO");
    service.drafts().edit(&current, |draft| {
        draft.pendencia_tipo = "DOCUMENTACAO".to_string();
        draft.pendencia_motivo = "falta RG".to_string();
    });

    let updated = service
        .request_transition(&current, Status::Pendencia)
        .await
        .unwrap();
    assert_eq!(updated.pendencia_motivo, "falta RG");
    // After the submit, the draft is rebuilt from the server record.
    assert_eq!(
        service.drafts().draft_for(&current).pendencia_motivo,
        "falta RG"
    );
}

#[tokio::test]
async fn refresh_reconciles_drafts_against_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pipeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "status": "PENDENCIA", "pendencia_motivo": "do servidor"}
        ])))
        .mount(&server)
        .await;

    let service = service_for(&server).await;
    let stale = Operation {
        id: 1,
        pendencia_motivo: "antigo".to_string(),
        ..operation(1, "PENDENCIA")
    };
    service.drafts().edit(&stale, |draft| {
        draft.pendencia_motivo = "edicao local".to_string();
    });

    // Closed editor: server record wins on refresh.
    let rows = service.refresh(Utc::now()).await.unwrap();
    assert_eq!(rows[0].draft.pendencia_motivo, "do servidor");

    // Open editor: the local edit survives the next refresh.
    service.drafts().edit(&rows[0].operation, |draft| {
        draft.pendencia_motivo = "editando agora".to_string();
    });
    service
        .drafts()
        .open_editor(1, esteira::core::workflow::EditorKind::Pendency);
    let rows = service.refresh(Utc::now()).await.unwrap();
    assert_eq!(rows[0].draft.pendencia_motivo, "editando agora");
    assert_eq!(rows[0].editor, EditorState::EditingPendency);
}

#[tokio::test]
async fn send_to_pipeline_publishes_both_events() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/operations/11/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Operacao enviada"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server).await;
    let mut events = service.events().subscribe();
    assert_ok!(service.send_to_pipeline(11).await);
    assert_eq!(events.recv().await.unwrap(), AppEvent::PipelineChanged);
    assert_eq!(events.recv().await.unwrap(), AppEvent::NotificationsRefresh);
}
