//! CLI Command Implementations

use anyhow::{Context, Result};
use serde::Serialize;

use crate::persona::PersonaCatalog;
use crate::telemetry::init_telemetry;
use crate::{SimulatorConfig, VERSION};

use super::{Cli, Commands, ConfigAction, ConfigCommand, PersonasCommand, ServeCommand};

/// Execute the CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = if let Some(path) = &cli.config {
        SimulatorConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?
    } else {
        SimulatorConfig::from_env()?
    };

    config.telemetry.log_level = cli.log_level.clone();
    config.telemetry.json_logs = cli.json_logs;

    match cli.command {
        Commands::Serve(cmd) => execute_serve(cmd, config, cli.quiet).await,
        Commands::Personas(cmd) => execute_personas(cmd, &config),
        Commands::Config(cmd) => execute_config(cmd, &config),
        Commands::Version => execute_version(),
    }
}

/// Fold the serve flags into the loaded configuration
pub fn apply_serve_overrides(cmd: &ServeCommand, config: &mut SimulatorConfig) {
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(host) = &cmd.host {
        config.server.host = host.clone();
    }
    if let Some(seed) = cmd.seed {
        config.seed = Some(seed);
    }
    if let Some(persona) = &cmd.persona {
        config.default_persona = persona.clone();
    }

    if let Some(preset) = cmd.latency_profile {
        config.latency = preset.config();
    }
    if cmd.no_latency {
        config.latency.enabled = false;
    }

    if let Some(scenario) = cmd.scenario {
        scenario.apply(&mut config.chaos);
    }
    if cmd.chaos {
        config.chaos.enabled = true;
    }
    if let Some(p) = cmd.rate_limit_probability {
        config.chaos.rate_limit_probability = p;
    }
    if let Some(p) = cmd.server_error_probability {
        config.chaos.server_error_probability = p;
    }
    if let Some(p) = cmd.slowdown_probability {
        config.chaos.slowdown_probability = p;
    }
}

/// Execute the serve command
async fn execute_serve(cmd: ServeCommand, mut config: SimulatorConfig, quiet: bool) -> Result<()> {
    apply_serve_overrides(&cmd, &mut config);
    config.validate().context("Configuration validation failed")?;

    if !quiet {
        print_banner(&config);
    }

    init_telemetry(&config.telemetry)?;
    crate::run_server(config).await
}

#[derive(Debug, Serialize)]
struct PersonaSummary<'a> {
    name: &'a str,
    description: &'a str,
    variants: usize,
    tool_calls: bool,
}

/// Execute the personas command
fn execute_personas(cmd: PersonasCommand, config: &SimulatorConfig) -> Result<()> {
    let catalog: PersonaCatalog = config.persona_catalog()?;
    let summaries: Vec<PersonaSummary<'_>> = catalog
        .iter()
        .map(|p| PersonaSummary {
            name: &p.name,
            description: &p.description,
            variants: p.texts.len(),
            tool_calls: p.has_tool_calls(),
        })
        .collect();

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summaries)?),
        _ => {
            println!("{:<16} {:>8} {:>6}  DESCRIPTION", "PERSONA", "VARIANTS", "TOOLS");
            for s in &summaries {
                let marker = if s.name == config.default_persona { "*" } else { " " };
                println!(
                    "{}{:<15} {:>8} {:>6}  {}",
                    marker,
                    s.name,
                    s.variants,
                    if s.tool_calls { "yes" } else { "no" },
                    s.description
                );
            }
        }
    }
    Ok(())
}

/// Execute the config command
fn execute_config(cmd: ConfigCommand, config: &SimulatorConfig) -> Result<()> {
    match cmd.action {
        ConfigAction::Show { format } => {
            let output = match format.as_str() {
                "toml" => toml::to_string_pretty(config)?,
                "json" => serde_json::to_string_pretty(config)?,
                _ => serde_yaml::to_string(config)?,
            };
            println!("{}", output);
            Ok(())
        }

        ConfigAction::Validate { file } => {
            let config = SimulatorConfig::from_file(&file)?;
            let catalog = config.persona_catalog()?;
            println!("Configuration at {:?} is valid", file);
            println!("  Personas:  {}", catalog.len());
            println!("  Default:   {}", config.default_persona);
            println!("  Latency:   {}", if config.latency.enabled { "enabled" } else { "disabled" });
            println!("  Chaos:     {}", if config.chaos.is_active() { "enabled" } else { "disabled" });
            Ok(())
        }
    }
}

fn execute_version() -> Result<()> {
    println!("llm-emulator {}", VERSION);
    Ok(())
}

fn print_banner(config: &SimulatorConfig) {
    let base = format!("http://{}:{}", config.server.host, config.server.port);

    println!();
    println!("LLM Emulator v{}", VERSION);
    println!();
    println!("Configuration:");
    println!("  • Server:    {}:{}", config.server.host, config.server.port);
    println!("  • Persona:   {} (of {} custom)", config.default_persona, config.personas.len());
    println!("  • Latency:   {}", if config.latency.enabled { "enabled" } else { "disabled" });
    println!("  • Chaos:     {}", if config.chaos.is_active() { "enabled" } else { "disabled" });
    println!("  • Seed:      {}", config.seed.map_or("random".to_string(), |s| s.to_string()));
    println!();
    println!("Endpoints:");
    println!("  • OpenAI:    {}/v1/chat/completions", base);
    println!("  • Anthropic: {}/v1/messages", base);
    println!("  • Gemini:    {}/v1beta/models/{{model}}:generateContent", base);
    println!("  • Health:    {}/health", base);
    println!("  • Metrics:   {}/metrics", base);
    println!();
}
