//! IChingSage - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ichingsage::{
    cli::{parse_level, parse_line_values, Args, Commands},
    config::Config,
    consultation::{ConsultationOrchestrator, ConsultationRequest, InMemoryConsultationStore},
    hexagram::{Hexagram, HexagramCaster},
    interpretation::InterpretationSource,
    llm::OpenAiClient,
};
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let level = args
        .verbosity()
        .log_level()
        .unwrap_or_else(|| parse_level(&config.logging.level));
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match &args.command {
        Some(Commands::Cast { seed }) => {
            run_cast(*seed);
        }
        Some(Commands::Ask {
            question,
            user,
            lines,
        }) => {
            run_ask(&config, question, user, lines.as_deref()).await?;
        }
        Some(Commands::Config) => {
            show_config(&args, &config)?;
        }
        None => {
            println!("IChingSage v{} - I Ching consultations", env!("CARGO_PKG_VERSION"));
            println!("\nUsage:");
            println!("  ichingsage cast                       Cast and draw a hexagram");
            println!("  ichingsage ask <QUESTION> --user ID   Ask for an interpretation");
            println!("  ichingsage config                     Show configuration");
            println!("\nExample:");
            println!("  ichingsage ask \"How should I approach this change?\"");
            println!();
        }
    }

    Ok(())
}

fn run_cast(seed: Option<u64>) {
    let mut caster = match seed {
        Some(seed) => HexagramCaster::with_seed(seed),
        None => HexagramCaster::new(),
    };
    print_hexagram(&caster.cast());
}

async fn run_ask(config: &Config, question: &str, user: &str, lines: Option<&str>) -> Result<()> {
    let api_key = config.api_key();
    if api_key.is_none() {
        warn!(
            env = %config.llm.api_key_env,
            "no API key configured, interpretations will use the built-in fallback"
        );
    }

    let llm = OpenAiClient::with_config(&config.llm.base_url, api_key)?;
    let store = InMemoryConsultationStore::new();
    let mut orchestrator = ConsultationOrchestrator::with_config(
        Arc::new(llm),
        Arc::new(store),
        config.orchestrator_config(),
    );

    let mut request = ConsultationRequest::new(question, user);
    if let Some(input) = lines {
        let values = parse_line_values(input).map_err(anyhow::Error::msg)?;
        request = request.with_hexagram(Hexagram::from_values(values)?);
    }

    let outcome = orchestrator
        .create_consultation(request)
        .await
        .context("Consultation failed")?;

    print_hexagram(&outcome.hexagram);

    let source = match outcome.source {
        InterpretationSource::Model => format!("{} ({})", outcome.source, outcome.model.model).green(),
        InterpretationSource::Cache => outcome.source.to_string().cyan(),
        InterpretationSource::Fallback => outcome.source.to_string().yellow(),
    };
    println!("{} {}", "Source:".bold(), source);
    println!(
        "{} {:.2} ({} prompt)",
        "Complexity:".bold(),
        outcome.complexity,
        outcome.strategy
    );
    println!();

    let interpretation = &outcome.interpretation;
    println!("{}", interpretation.interpretation);
    if let Some(guidance) = &interpretation.guidance {
        println!("\n{} {}", "Guidance:".bold(), guidance);
    }
    if let Some(advice) = &interpretation.practical_advice {
        println!("\n{} {}", "Practical advice:".bold(), advice);
    }
    if let Some(context) = &interpretation.cultural_context {
        println!("\n{} {}", "Context:".bold(), context);
    }

    let summary = orchestrator.cost_tracker().summary();
    println!();
    println!(
        "{} ${:.5} across {} model call(s)",
        "Cost:".bold(),
        summary.total_cost,
        summary.consultations
    );
    println!("{} {}", "Consultation:".dimmed(), outcome.consultation.id);

    Ok(())
}

fn print_hexagram(hexagram: &Hexagram) {
    println!("{}", hexagram.to_string().bold());
    println!("{}", hexagram.render());
    if let Some(relating) = hexagram.relating() {
        println!(
            "{} lines {} → {}",
            "Changing:".bold(),
            hexagram.changing_lines_label(),
            relating
        );
    }
    println!();
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    println!("{} {}", "Config file:".bold(), path.display());
    println!(
        "{} {}",
        "API key:".bold(),
        if config.api_key().is_some() {
            format!("set (${})", config.llm.api_key_env).green()
        } else {
            format!("missing (${})", config.llm.api_key_env).yellow()
        }
    );
    println!();
    print!("{}", toml::to_string_pretty(config).context("Failed to render config")?);

    Ok(())
}
