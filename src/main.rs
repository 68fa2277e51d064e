//! pc-compat CLI - PC build compatibility checker
//!
//! Usage:
//!   pc-compat check build.json                 # Validate a build
//!   pc-compat alternatives gpu build.json      # Catalog parts that fit a slot
//!   pc-compat rules                            # List rule checks
//!   pc-compat parts --kind cpu                 # Browse the parts catalog

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use pc_compat::config::{ColorMode, OutputFormat};
use pc_compat::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pc-compat")]
#[command(about = "PC build compatibility checker")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Parts catalog (JSON); defaults to the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a build file (JSON or YAML)
    Check {
        /// Build file mapping slots to catalog ids or inline records
        build: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Disable specific rules (comma-separated)
        #[arg(long, value_delimiter = ',')]
        disable: Vec<String>,

        /// Exit with status 1 when the build is not compatible
        #[arg(long)]
        strict: bool,
    },

    /// List catalog parts that fit a slot of a build
    Alternatives {
        /// Slot to replace (cpu, motherboard, gpu, ram, psu, case, cooler, storage)
        slot: ComponentKind,

        /// Build file
        build: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// List the rule checks
    Rules,

    /// List catalog parts
    Parts {
        /// Only parts of this kind
        #[arg(short, long)]
        kind: Option<ComponentKind>,

        /// Filter by id, name or brand
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Config::load_default().context("Failed to load config"),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Catalog::builtin().context("Built-in catalog is invalid"),
    }
}

fn load_build(path: &Path, catalog: &Catalog) -> Result<Build> {
    let spec = BuildSpec::load(path)
        .with_context(|| format!("Failed to read build {}", path.display()))?;
    spec.resolve(catalog)
        .with_context(|| format!("Failed to resolve build {}", path.display()))
}

fn validate(engine: &CompatibilityEngine, build: &Build) -> Report {
    match engine.validate_build(build) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{}: {}", "error".red().bold(), err);
            std::process::exit(2);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let use_color = !cli.no_color && config.output.color != ColorMode::Never;
    match (cli.no_color, config.output.color) {
        (true, _) | (_, ColorMode::Never) => colored::control::set_override(false),
        (false, ColorMode::Always) => colored::control::set_override(true),
        _ => {}
    }

    match cli.command {
        Commands::Check {
            build,
            format,
            disable,
            strict,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let build = load_build(&build, &catalog)?;

            let mut engine = CompatibilityEngine::from_config(&config);
            for id in &disable {
                if rules::find_rule(id).is_none() {
                    bail!("Unknown rule: {}", id);
                }
                engine = engine.disable(id);
            }

            let report = validate(&engine, &build);

            let formatter: Box<dyn ReportFormatter> =
                match format.unwrap_or_else(|| config.output.format.into()) {
                    Format::Json => Box::new(JsonFormatter::new().pretty()),
                    Format::Text => {
                        let text = TextFormatter::new();
                        Box::new(if use_color { text } else { text.without_color() })
                    }
                };
            let output = formatter.format(&report);
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }

            if strict && !report.compatible {
                std::process::exit(1);
            }
        }

        Commands::Alternatives {
            slot,
            build,
            format,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let build = load_build(&build, &catalog)?;
            let Some(current) = build.get(slot).cloned() else {
                bail!("Build has no {} selected", slot);
            };

            let engine = CompatibilityEngine::from_config(&config)
                .with_provider(CatalogSuggestions::with_config(catalog.clone(), &config));

            let suggestion = engine.get_suggestions(slot, &current, &build);

            match format.unwrap_or_else(|| config.output.format.into()) {
                Format::Json => println!("{}", serde_json::to_string_pretty(&suggestion)?),
                Format::Text => {
                    println!("{}", suggestion.message);
                    for id in &suggestion.candidates {
                        let name = catalog.get(id).map(|c| c.name.as_str()).unwrap_or("");
                        println!("  {:<32} {}", id, name);
                    }
                }
            }
        }

        Commands::Rules => {
            println!("{}", "Compatibility rules".bold());
            println!("{}", "=".repeat(60));
            for rule in RULES {
                let slots: Vec<_> = rule.requires.iter().map(|k| k.label()).collect();
                println!();
                println!("{}  ({})", rule.id.cyan(), slots.join(", "));
                println!("  {}", rule.description);
                for kind in rule.emits {
                    println!(
                        "    {:<9} {:<27} {}",
                        kind.severity().to_string(),
                        kind.as_str(),
                        kind.description()
                    );
                }
            }
        }

        Commands::Parts { kind, search } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let query = search.unwrap_or_default();
            let parts = catalog
                .search(&query)
                .filter(|p| kind.map_or(true, |k| p.kind == k));

            let mut count = 0;
            for part in parts {
                let price = part
                    .price()
                    .map(|p| format!("${:.0}", p))
                    .unwrap_or_default();
                println!(
                    "{:<12} {:<32} {:<48} {:>6}",
                    part.kind.as_str(),
                    part.id,
                    part.name,
                    price
                );
                count += 1;
            }
            if count == 0 {
                eprintln!("No parts found");
            }
        }
    }

    Ok(())
}
