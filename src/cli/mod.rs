pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tefi")]
#[command(about = "TEFI CLI - talk to SuiteCRM directly with the integration client")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate the PDF of a FITAC record")]
    Pdf {
        #[arg(help = "FITAC record id")]
        fitac_id: String,
        #[arg(help = "PDF template id")]
        template_id: String,
        #[arg(short, long, help = "Output file (default: fitac-<id>.pdf)")]
        output: Option<std::path::PathBuf>,
    },

    #[command(about = "Log in to SuiteCRM and log out again")]
    Check,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Pdf {
            fitac_id,
            template_id,
            output,
        } => commands::pdf::handle(&fitac_id, &template_id, output, output_format).await,
        Commands::Check => commands::check::handle(output_format).await,
    }
}
