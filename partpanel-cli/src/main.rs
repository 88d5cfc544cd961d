//! PartPanel CLI - render part datasheet and parameter panels from the command line.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use partpanel::config::{
    LayeredConfig, DATASHEET_COMMENT_KEYWORD, ENABLE_PART_PANEL, MAX_PARAMETERS, SETTINGS,
};
use partpanel::{
    BaseUrlResolver, ConfigProvider, MemoryStore, PanelContext, PanelContextBuilder,
    PanelSettings, PanelTarget, PartStore, SettingsMap, SqliteStore, UrlResolver, PLUGIN,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "partpanel")]
#[command(about = "Datasheet and parameter panels for inventory parts", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the panel for a single part
    Show {
        /// Part identifier
        #[arg(long, value_name = "ID")]
        part: String,

        /// Entity type the panel is requested for
        #[arg(long, default_value = "part")]
        target_model: String,

        /// Base URL used to make relative datasheet links absolute
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Host software version reported in the panel metadata
        #[arg(long, default_value = "unknown")]
        host_version: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// List recognized settings and their effective values
    Settings {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// SQLite inventory database (opened read-only)
    #[arg(long, value_name = "FILE", conflicts_with = "snapshot")]
    db: Option<PathBuf>,

    /// JSON snapshot of parts, attachments and parameters
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,
}

#[derive(Args)]
struct SettingsArgs {
    /// JSON settings file, layered over database settings
    #[arg(long = "settings", value_name = "FILE")]
    settings_file: Option<PathBuf>,

    /// Override DATASHEET_COMMENT_KEYWORD
    #[arg(long)]
    keyword: Option<String>,

    /// Override MAX_PARAMETERS (0 disables the limit)
    #[arg(long, value_name = "N")]
    max_parameters: Option<usize>,

    /// Set ENABLE_PART_PANEL to false
    #[arg(long)]
    disable: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// Panel context as JSON (`null` when there is no panel)
    Json,
    /// Panel registrations as the host UI consumes them
    Panel,
}

enum Backend {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl Backend {
    fn open(source: &SourceArgs) -> Result<Self> {
        match (&source.db, &source.snapshot) {
            (Some(db), _) => {
                let store = partpanel::open_database(db)
                    .with_context(|| format!("Failed to open database {}", db.display()))?;
                Ok(Backend::Sqlite(store))
            }
            (None, Some(snapshot)) => {
                let store = partpanel::load_snapshot(snapshot)
                    .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;
                Ok(Backend::Memory(store))
            }
            (None, None) => Ok(Backend::Memory(MemoryStore::new())),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Backend::Sqlite(_) => "sqlite",
            Backend::Memory(_) => "memory",
        }
    }

    fn store(&self) -> &dyn PartStore {
        match self {
            Backend::Sqlite(store) => store,
            Backend::Memory(store) => store,
        }
    }

    fn settings(&self) -> Option<&dyn ConfigProvider> {
        match self {
            Backend::Sqlite(store) => Some(store as &dyn ConfigProvider),
            Backend::Memory(_) => None,
        }
    }
}

impl SettingsArgs {
    fn overrides(&self) -> SettingsMap {
        let mut overrides = SettingsMap::new();
        if let Some(keyword) = &self.keyword {
            overrides.insert(DATASHEET_COMMENT_KEYWORD, keyword.clone());
        }
        if let Some(max) = self.max_parameters {
            overrides.insert(MAX_PARAMETERS, max.to_string());
        }
        if self.disable {
            overrides.insert(ENABLE_PART_PANEL, "false");
        }
        overrides
    }

    fn file(&self) -> Result<SettingsMap> {
        match &self.settings_file {
            Some(path) => load_settings_file(path),
            None => Ok(SettingsMap::new()),
        }
    }
}

fn load_settings_file(path: &Path) -> Result<SettingsMap> {
    partpanel::load_settings(path)
        .with_context(|| format!("Failed to load settings {}", path.display()))
}

/// Command-line overrides, then the settings file, then database settings.
fn layered_settings<'a>(
    overrides: &'a SettingsMap,
    file: &'a SettingsMap,
    backend: &'a Backend,
) -> LayeredConfig<'a> {
    let mut layered = LayeredConfig::new();
    for layer in [overrides, file] {
        if !layer.is_empty() {
            layered = layered.layer(layer);
        }
    }
    if let Some(db_settings) = backend.settings() {
        layered = layered.layer(db_settings);
    }
    layered
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Show {
            part,
            target_model,
            base_url,
            host_version,
            format,
            source,
            settings,
        } => handle_show(
            &part,
            target_model,
            base_url.as_deref(),
            &host_version,
            format,
            &source,
            &settings,
        ),
        Commands::Settings { source, settings } => handle_settings(&source, &settings),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn handle_show(
    part: &str,
    target_model: String,
    base_url: Option<&str>,
    host_version: &str,
    format: OutputFormat,
    source: &SourceArgs,
    settings: &SettingsArgs,
) -> Result<i32> {
    let backend = Backend::open(source)?;
    let overrides = settings.overrides();
    let file = settings.file()?;

    let layered = layered_settings(&overrides, &file, &backend);
    tracing::debug!(
        "Using {} store with settings {:?}",
        backend.describe(),
        PanelSettings::resolve(&layered)
    );

    let resolver = base_url
        .map(BaseUrlResolver::new)
        .transpose()
        .context("Invalid --base-url")?;
    if let Some(ref resolver) = resolver {
        tracing::debug!("Resolving relative URLs against {}", resolver.base());
    }

    let target = PanelTarget {
        target_model: Some(target_model),
        target_id: serde_json::Value::String(part.to_string()),
    };

    let builder = PanelContextBuilder::new(backend.store(), &layered, host_version);
    let request = resolver.as_ref().map(|r| r as &dyn UrlResolver);

    match format {
        OutputFormat::Human => output_human(builder.build(request, &target).as_ref()),
        OutputFormat::Json => {
            let panel = builder.build(request, &target);
            println!("{}", serde_json::to_string_pretty(&panel)?);
        }
        OutputFormat::Panel => {
            let panels = builder.panels(request, &target);
            let registration = serde_json::json!({ "plugin": PLUGIN, "panels": panels });
            println!("{}", serde_json::to_string_pretty(&registration)?);
        }
    }

    Ok(0)
}

fn output_human(panel: Option<&PanelContext>) {
    let Some(panel) = panel else {
        println!("No panel for this target");
        return;
    };

    println!("\nPart: {} (#{})", panel.part.name, panel.part.id);
    println!("{}", "─".repeat(60));
    if !panel.part.description.is_empty() {
        println!("  {}", panel.part.description);
    }
    println!("  Active: {}", if panel.part.active { "yes" } else { "no" });
    if let Some(ref url) = panel.part.url {
        println!("  URL: {}", url);
    }

    println!("\n  Datasheets ({}):", panel.datasheets.len());
    if panel.datasheets.is_empty() {
        println!("    none");
    }
    for datasheet in &panel.datasheets {
        println!("    - {}", datasheet.label);
        println!("      {}", datasheet.url);
    }

    println!("\n  Parameters ({}):", panel.parameters.len());
    if panel.parameters.is_empty() {
        println!("    none");
    }
    for parameter in &panel.parameters {
        match parameter.units {
            Some(ref units) => println!("    - {}: {} {}", parameter.name, parameter.value, units),
            None => println!("    - {}: {}", parameter.name, parameter.value),
        }
    }

    println!(
        "\n  Host {} / {} {}",
        panel.meta.host_version, PLUGIN.title, panel.meta.plugin_version
    );
}

fn handle_settings(source: &SourceArgs, settings: &SettingsArgs) -> Result<i32> {
    let backend = Backend::open(source)?;
    let overrides = settings.overrides();
    let file = settings.file()?;

    let layered = layered_settings(&overrides, &file, &backend);
    let effective = PanelSettings::resolve(&layered);
    tracing::debug!("Effective settings from {} store: {:?}", backend.describe(), effective);

    println!("Recognized settings:\n");
    for spec in &SETTINGS {
        let value = match spec.key {
            ENABLE_PART_PANEL => effective.enabled.to_string(),
            DATASHEET_COMMENT_KEYWORD => effective.datasheet_keyword.clone(),
            MAX_PARAMETERS => effective.max_parameters.to_string(),
            _ => continue,
        };
        println!("  {} ({})", spec.name, spec.key);
        println!("    {}", spec.description);
        println!("    default: {}", spec.default);
        println!("    current: {}", value);
        println!();
    }

    if !effective.enabled {
        println!("The part panel is disabled.");
    }

    Ok(0)
}
