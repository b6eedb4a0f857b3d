pub mod args;
pub mod commands;

pub use args::{
    FichaArgs, HistoryArgs, OutputFormat, PipelineArgs, SendArgs, TransitionArgs, WatchArgs,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
PIPELINE COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "esteira")]
#[command(version = crate::VERSION)]
#[command(about = "Consignado operations pipeline from the terminal")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: watch the pipeline, transition operations through analysis, then inspect history when something looks off."
)]
pub struct Args {
    /// Path to custom config file (default: ./esteira.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "List the pipeline board once",
        long_about = "Pipeline fetches every operation in the board, normalizes legacy statuses, and renders rows sorted by age (oldest first).",
        after_help = "Example:\n    esteira pipeline --format json"
    )]
    Pipeline(PipelineArgs),
    #[command(
        about = "Poll the pipeline continuously",
        long_about = "Watch re-fetches the board on the configured poll interval and recomputes priority tones between polls. Stop with Ctrl-C.",
        after_help = "Example:\n    esteira watch --interval 10s"
    )]
    Watch(WatchArgs),
    #[command(
        about = "Move an operation to a new status",
        long_about = "Transition evaluates the workflow gate locally before touching the server: missing pendency reasons, formalization links, or rejection codes fail fast with the exact message the gate produces.",
        after_help = "Examples:\n    esteira transition 42 EM_DIGITACAO\n    esteira transition 42 PENDENCIA --pendencia-tipo MARGEM --pendencia-motivo \"margem estourada\""
    )]
    Transition(TransitionArgs),
    #[command(
        about = "Inspect an operation's product ficha",
        long_about = "Ficha renders the operation's stored ficha merged over derived defaults, grouped per the product schema, or the flat payload projection with --payload.",
        after_help = "Example:\n    esteira ficha 42 --payload"
    )]
    Ficha(FichaArgs),
    #[command(
        about = "Submit or resend an operation into the pipeline",
        after_help = "Example:\n    esteira send 42"
    )]
    Send(SendArgs),
    #[command(
        about = "Show an operation's status history",
        after_help = "Example:\n    esteira history 42 --comments"
    )]
    History(HistoryArgs),
}

pub async fn run(args: Args) -> crate::Result<()> {
    let config_path = args.config.clone();
    match args.command {
        Command::Pipeline(pipeline_args) => {
            commands::pipeline(config_path.as_deref(), pipeline_args).await
        }
        Command::Watch(watch_args) => commands::watch(config_path.as_deref(), watch_args).await,
        Command::Transition(transition_args) => {
            commands::transition(config_path.as_deref(), transition_args).await
        }
        Command::Ficha(ficha_args) => commands::ficha(config_path.as_deref(), ficha_args).await,
        Command::Send(send_args) => commands::send(config_path.as_deref(), send_args).await,
        Command::History(history_args) => {
            commands::history(config_path.as_deref(), history_args).await
        }
    }
}
