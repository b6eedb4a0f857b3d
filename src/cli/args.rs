use clap::{Args, ValueEnum};

/// Output rendering for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct PipelineArgs {
    /// Output format (default: text)
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Override the configured poll interval (e.g. 20s)
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,
}

#[derive(Args)]
pub struct TransitionArgs {
    /// Operation to transition
    #[arg(value_name = "OPERATION_ID")]
    pub operation_id: i64,

    /// Target status (canonical or legacy form, e.g. PENDENCIA)
    #[arg(value_name = "STATUS")]
    pub target: String,

    /// Formalization link required to leave EM_DIGITACAO
    #[arg(long, value_name = "URL", help_heading = "Gate Fields")]
    pub link: Option<String>,

    /// Pendency classification (e.g. DOCUMENTACAO, MARGEM)
    #[arg(long, value_name = "TIPO", help_heading = "Gate Fields")]
    pub pendencia_tipo: Option<String>,

    /// Pendency reason required for PENDENCIA and DEVOLVIDA_VENDEDOR
    #[arg(long, value_name = "TEXT", help_heading = "Gate Fields")]
    pub pendencia_motivo: Option<String>,

    /// Rejection reason code required for REPROVADO (e.g. MARGEM_INSUFICIENTE)
    #[arg(long, value_name = "CODE", help_heading = "Gate Fields")]
    pub reprovacao_tipo: Option<String>,

    /// Free-text detail appended to the rejection reason
    #[arg(long, value_name = "TEXT", help_heading = "Gate Fields")]
    pub motivo: Option<String>,
}

#[derive(Args)]
pub struct FichaArgs {
    /// Operation whose ficha to inspect
    #[arg(value_name = "OPERATION_ID")]
    pub operation_id: i64,

    /// Print the flat payload projection instead of the grouped ficha view
    #[arg(long)]
    pub payload: bool,
}

#[derive(Args)]
pub struct SendArgs {
    /// Operation to submit or resend into the pipeline
    #[arg(value_name = "OPERATION_ID")]
    pub operation_id: i64,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Operation whose status history to show
    #[arg(value_name = "OPERATION_ID")]
    pub operation_id: i64,

    /// Also list the operation's comments
    #[arg(long)]
    pub comments: bool,
}
