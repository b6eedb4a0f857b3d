use crate::api::HttpPipelineClient;
use crate::cli::args::{
    FichaArgs, HistoryArgs, OutputFormat, PipelineArgs, SendArgs, TransitionArgs, WatchArgs,
};
use crate::core::config::{ConfigLoader, EsteiraConfig};
use crate::core::entities::{Operation, OperationSeed};
use crate::core::events::EventBus;
use crate::core::ficha::{self, format_value, get_schema, merge_ficha};
use crate::core::pipeline::{
    format_history_actor, format_history_transition, PipelineRow, PipelineService,
};
use crate::core::status::{resolve_status, status_label};
use crate::utils::format::{format_currency_brl, format_datetime_br};
use anyhow::{anyhow, bail};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn build_service(config_path: Option<&Path>) -> crate::Result<(EsteiraConfig, PipelineService)> {
    let config = ConfigLoader::load(config_path)?;
    let client = HttpPipelineClient::from_config(&config)?;
    let service = PipelineService::new(Arc::new(client), EventBus::new());
    Ok((config, service))
}

fn render_rows(rows: &[PipelineRow], format: OutputFormat) -> crate::Result<()> {
    match format {
        OutputFormat::Json => {
            let body: Vec<_> = rows
                .iter()
                .map(|row| {
                    serde_json::json!({
                        "id": row.operation.id,
                        "cliente": row.operation.nome,
                        "cpf": row.operation.cpf,
                        "produto": row.operation.produto,
                        "status": row.normalized_status,
                        "status_label": status_label(&row.operation.status),
                        "prioridade": row.priority.label,
                        "tom": row.priority.tone.as_str(),
                        "criado_em": row.operation.criado_em,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<6} {:<24} {:<16} {:<24} {:<6} {:<8} {:<14} {}",
                "ID", "CLIENTE", "PRODUTO", "STATUS", "IDADE", "TOM", "VALOR", "CRIADO"
            );
            for row in rows {
                let criado = row
                    .operation
                    .criado_em
                    .as_deref()
                    .map(format_datetime_br)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<6} {:<24} {:<16} {:<24} {:<6} {:<8} {:<14} {}",
                    row.operation.id,
                    row.operation.nome,
                    row.operation.produto,
                    status_label(&row.operation.status),
                    row.priority.label,
                    row.priority.tone.as_str(),
                    format_currency_brl(row.operation.valor_solicitado),
                    criado
                );
            }
            println!("\n{} operacao(oes) na esteira", rows.len());
        }
    }
    Ok(())
}

pub async fn pipeline(config_path: Option<&Path>, args: PipelineArgs) -> crate::Result<()> {
    let (_config, service) = build_service(config_path)?;
    let rows = service.refresh(Utc::now()).await?;
    render_rows(&rows, args.format)
}

pub async fn watch(config_path: Option<&Path>, args: WatchArgs) -> crate::Result<()> {
    let (config, service) = build_service(config_path)?;
    let poll_interval = match &args.interval {
        Some(raw) => humantime::parse_duration(raw.trim())
            .map_err(|e| anyhow!("invalid --interval {}: {}", raw, e))?,
        None => config.poll_interval()?,
    };
    let priority_refresh = config.priority_refresh()?;

    info!(
        poll = %humantime::format_duration(poll_interval),
        refresh = %humantime::format_duration(priority_refresh),
        "watching pipeline"
    );

    let mut poll = tokio::time::interval(poll_interval);
    let mut refresh = tokio::time::interval(priority_refresh);
    // First ticks fire immediately; consume the refresh one so the initial
    // poll renders alone.
    refresh.tick().await;

    let mut cached: Vec<Operation> = Vec::new();
    loop {
        tokio::select! {
            _ = poll.tick() => {
                let rows = service.refresh(Utc::now()).await?;
                cached = rows.iter().map(|row| row.operation.clone()).collect();
                render_rows(&rows, OutputFormat::Text)?;
            }
            _ = refresh.tick() => {
                // Priority tones drift between polls; re-project without
                // another fetch.
                let rows = service.project_rows(cached.clone(), Utc::now());
                render_rows(&rows, OutputFormat::Text)?;
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("watch interrupted");
                return Ok(());
            }
        }
    }
}

async fn find_operation(service: &PipelineService, operation_id: i64) -> crate::Result<Operation> {
    let rows = service.refresh(Utc::now()).await?;
    rows.into_iter()
        .map(|row| row.operation)
        .find(|operation| operation.id == operation_id)
        .ok_or_else(|| anyhow!("operacao {} nao encontrada na esteira", operation_id))
}

pub async fn transition(config_path: Option<&Path>, args: TransitionArgs) -> crate::Result<()> {
    let (_config, service) = build_service(config_path)?;
    let target = resolve_status(&args.target)
        .ok_or_else(|| anyhow!("Status desconhecido: {}", args.target.trim()))?;
    let operation = find_operation(&service, args.operation_id).await?;

    service.drafts().edit(&operation, |draft| {
        if let Some(link) = &args.link {
            draft.link_formalizacao = link.clone();
        }
        if let Some(tipo) = &args.pendencia_tipo {
            draft.pendencia_tipo = tipo.clone();
        }
        if let Some(motivo) = &args.pendencia_motivo {
            draft.pendencia_motivo = motivo.clone();
        }
        if let Some(codigo) = &args.reprovacao_tipo {
            draft.reprovacao_tipo = codigo.clone();
        }
        if let Some(motivo) = &args.motivo {
            draft.motivo_reprovacao = motivo.clone();
        }
    });

    let updated = service.request_transition(&operation, target).await?;
    println!(
        "Operacao {}: {} -> {}",
        updated.id,
        status_label(&operation.status),
        status_label(&updated.status)
    );
    Ok(())
}

pub async fn ficha(config_path: Option<&Path>, args: FichaArgs) -> crate::Result<()> {
    let (_config, service) = build_service(config_path)?;
    let operation = find_operation(&service, args.operation_id).await?;

    if args.payload {
        let payload = service.payload_for(&operation);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let Some(schema) = get_schema(&operation.produto) else {
        bail!("produto sem ficha: {}", operation.produto);
    };

    let client = match operation.cliente_id {
        Some(client_id) => Some(service.client(client_id).await?),
        None => None,
    };
    let seed = OperationSeed::from_operation(&operation);
    let merged = merge_ficha(
        &operation.produto,
        client.as_ref(),
        None,
        operation.ficha_portabilidade.as_ref(),
        &seed,
    );

    println!("{}\n", schema.title);
    for group in &schema.groups {
        println!("== {} ==", group.title);
        for field in &group.fields {
            let value = merged.get(field.name).map(String::as_str).unwrap_or("");
            println!(
                "  {:<28} {}",
                field.label,
                format_value(value, field.field_type)
            );
        }
        println!();
    }
    if !ficha::has_ficha(&operation.produto, operation.ficha_portabilidade.as_ref()) {
        println!("(ficha ainda nao preenchida; valores acima sao derivados)");
    }
    Ok(())
}

pub async fn send(config_path: Option<&Path>, args: SendArgs) -> crate::Result<()> {
    let (_config, service) = build_service(config_path)?;
    service.send_to_pipeline(args.operation_id).await?;
    println!("Operacao {} enviada para a esteira", args.operation_id);
    Ok(())
}

pub async fn history(config_path: Option<&Path>, args: HistoryArgs) -> crate::Result<()> {
    let (_config, service) = build_service(config_path)?;
    let entries = service.status_history(args.operation_id).await?;

    if entries.is_empty() {
        println!("Sem historico para a operacao {}", args.operation_id);
    }
    for entry in &entries {
        let when = entry
            .created_at
            .as_deref()
            .map(format_datetime_br)
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "{}  {}  por {}",
            when,
            format_history_transition(entry),
            format_history_actor(entry)
        );
        if !entry.note.trim().is_empty() {
            line.push_str(&format!("  ({})", entry.note.trim()));
        }
        println!("{}", line);
    }

    if args.comments {
        let comments = service.comments(args.operation_id).await?;
        println!("\nComentarios:");
        if comments.is_empty() {
            println!("  (nenhum)");
        }
        for comment in &comments {
            let when = comment
                .created_at
                .as_deref()
                .map(format_datetime_br)
                .unwrap_or_else(|| "-".to_string());
            let author = if comment.author_name.trim().is_empty() {
                "Sistema"
            } else {
                comment.author_name.trim()
            };
            println!("  {}  {}: {}", when, author, comment.message);
        }
    }
    Ok(())
}
