use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use quakemap::{generate_commands, plan_execution};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both feeds and render the map
    Run {
        #[clap(short, long)]
        plan: Option<String>,
        /// Write a single export here instead of the plan's profiles
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Write a plan file with every default filled in
    Init {
        #[clap(short, long)]
        plan: String,
    },
    Generate {
        #[clap(subcommand)]
        command: GenerateCommands,
    },
}

#[derive(Subcommand, Debug)]
enum GenerateCommands {
    /// Print a built-in template: html or plan
    Template { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Run { plan, output } => {
            info!("Running plan: {}", plan.as_deref().unwrap_or("<defaults>"));
            plan_execution::execute_plan(plan, output).await?;
        }
        Commands::Init { plan } => {
            info!("Initializing plan: {}", plan);
            generate_commands::init_plan(&plan)?;
        }
        Commands::Generate { command } => match command {
            GenerateCommands::Template { name } => {
                generate_commands::generate_template(name);
            }
        },
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
