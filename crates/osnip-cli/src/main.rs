use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};

use osnip_core::augment;
use osnip_core::catalog::{self, Target};
use osnip_core::config::{self, CONFIG_FILE_NAME, OsnipConfig};
use osnip_core::load::{DocumentLoader, FsLoader};
use osnip_core::write::{self, OutputFormat};
use osnip_httpsnippet::HttpSnippet;

#[derive(Parser, Debug)]
#[command(
    name = "osnip",
    about = "Add x-codeSamples to every operation of an OpenAPI document",
    version,
    disable_version_flag = true
)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Targets to generate, e.g. `shell_curl` or `python`; comma-separated or repeated
    #[arg(short, long, action = ArgAction::Append, value_delimiter = ',')]
    targets: Vec<String>,

    /// Output format
    #[arg(short, long)]
    ext: Option<Ext>,

    /// Output file [default: output.yaml]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file [default: .osnip.yaml when present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OpenAPI document (YAML or JSON)
    file: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Ext {
    Yaml,
    Json,
}

impl From<Ext> for OutputFormat {
    fn from(ext: Ext) -> Self {
        match ext {
            Ext::Yaml => OutputFormat::Yaml,
            Ext::Json => OutputFormat::Json,
        }
    }
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, PartialEq)]
struct Settings {
    targets: Vec<Target>,
    format: OutputFormat,
    output: PathBuf,
}

impl Settings {
    fn merge(cli: &Cli, cfg: OsnipConfig) -> Self {
        let tokens = if cli.targets.is_empty() {
            cfg.target_tokens()
        } else {
            Some(config::split_tokens(&cli.targets))
        };
        let targets = catalog::resolve(tokens.as_deref());
        log::debug!(
            "resolved targets: {}",
            targets.iter().map(|t| t.id()).collect::<Vec<_>>().join(", ")
        );

        Self {
            targets,
            format: cli.ext.map(OutputFormat::from).unwrap_or(cfg.ext),
            output: cli.output.clone().unwrap_or_else(|| PathBuf::from(&cfg.output)),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?.unwrap_or_default();
    let settings = Settings::merge(cli, cfg);

    let document = FsLoader
        .load(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;

    let augmented = augment(&document, &settings.targets, &HttpSnippet::new())
        .context("failed to generate code samples")?;

    write::write(&augmented, &settings.output, settings.format)
        .with_context(|| format!("failed to write {}", settings.output.display()))?;
    Ok(())
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(explicit: Option<&Path>) -> Result<Option<OsnipConfig>> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            Ok(config::load_config(path)?)
        }
        None => Ok(config::load_config(Path::new(CONFIG_FILE_NAME))?),
    }
}
