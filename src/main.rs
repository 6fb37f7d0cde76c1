use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use docscope::analysis::AnalyzerStrategy;
use docscope::config::DiscoveryConfig;
use docscope::discovery::{ComponentDiscovery, ComponentFilter, SampleDiscovery};
use docscope::export::{export, ExportData, ExportFormat};

#[derive(Parser)]
#[command(name = "docscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version = "0.1.0")]
#[command(about = "Component discovery and static analysis for UI library documentation", long_about = None)]
struct Cli {
    /// Project root containing the components and the version registry
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// TOML config file (overrides --root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Sample directory (defaults to ../playground/src/samples)
    #[arg(long, global = true)]
    samples_dir: Option<PathBuf>,

    /// Analyzer strategy: syntax-tree or heuristic
    #[arg(long, global = true)]
    analyzer: Option<AnalyzerStrategy>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List published components
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
        /// Include observed props
        #[arg(long)]
        props: bool,
        /// Include observed variants
        #[arg(long)]
        variants: bool,
    },
    /// Search components by relevance
    Search {
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one component
    Show { name: String },
    /// Props observed on a component in its sample
    Props { name: String },
    /// Variants observed on a component in its sample
    Variants { name: String },
    /// Suggest components for a use case
    Suggest {
        use_case: String,
        /// Requirement such as "accessibility" or "mobile" (repeatable)
        #[arg(short = 'q', long = "requirement")]
        requirements: Vec<String>,
    },
    /// Component or sample statistics
    Stats {
        /// Report on samples instead of components
        #[arg(long)]
        samples: bool,
    },
    /// List samples, or search them when a query is given
    Samples { query: Option<String> },
    /// Analyze the sample for a component
    Analyze { name: String },
    /// Usage patterns across all samples
    Patterns,
    /// Export the catalog
    Export {
        /// json, csv or markdown
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<DiscoveryConfig> {
    let mut config = match &cli.config {
        Some(path) => DiscoveryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DiscoveryConfig::for_root(&cli.root),
    };
    if let Some(dir) = &cli.samples_dir {
        config = config.with_samples_dir(dir);
    }
    if let Some(analyzer) = cli.analyzer {
        config = config.with_analyzer(analyzer);
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn project_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "workspace".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("docscope - component discovery for UI library documentation");
        println!("Run 'docscope list' to list published components");
        println!("Run 'docscope --help' for more information");
        return Ok(());
    };
    let config = load_config(&cli)?;

    match command {
        Commands::Version => {
            println!("docscope v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::List {
            category,
            status,
            limit,
            props,
            variants,
        } => {
            let filter = ComponentFilter {
                category: category.clone(),
                status: status.clone(),
                limit: *limit,
                include_props: *props,
                include_variants: *variants,
            };
            let components = ComponentDiscovery::new(config)?;
            print_json(&components.list_components(&filter).await?)?;
        }
        Commands::Search {
            query,
            limit,
            category,
        } => {
            let filter = ComponentFilter {
                category: category.clone(),
                limit: *limit,
                ..ComponentFilter::default()
            };
            let components = ComponentDiscovery::new(config)?;
            print_json(&components.search_components(query, &filter).await?)?;
        }
        Commands::Show { name } => {
            let components = ComponentDiscovery::new(config)?;
            match components.get_component_by_name(name).await? {
                Some(component) => print_json(&component)?,
                None => bail!("component '{}' not found", name),
            }
        }
        Commands::Props { name } => {
            let components = ComponentDiscovery::new(config)?;
            print_json(&components.get_component_props(name).await?)?;
        }
        Commands::Variants { name } => {
            let components = ComponentDiscovery::new(config)?;
            print_json(&components.get_component_variants(name).await?)?;
        }
        Commands::Suggest {
            use_case,
            requirements,
        } => {
            let components = ComponentDiscovery::new(config)?;
            print_json(&components.suggest_components(use_case, requirements).await?)?;
        }
        Commands::Stats { samples: false } => {
            let components = ComponentDiscovery::new(config)?;
            print_json(&components.get_statistics().await?)?;
        }
        Commands::Stats { samples: true } => {
            let samples = SampleDiscovery::new(config)?;
            print_json(&samples.get_sample_statistics().await?)?;
        }
        Commands::Samples { query } => {
            let samples = SampleDiscovery::new(config)?;
            let found = match query {
                Some(query) => samples.search_samples(query).await?,
                None => samples.discover_samples().await?,
            };
            print_json(&found)?;
        }
        Commands::Analyze { name } => {
            let samples = SampleDiscovery::new(config)?;
            print_json(&samples.get_sample_analysis(name).await?)?;
        }
        Commands::Patterns => {
            let samples = SampleDiscovery::new(config)?;
            let all = samples.discover_samples().await?;
            print_json(&samples.extract_usage_patterns(&all).await?)?;
        }
        Commands::Export { format, output } => {
            let name = project_name(&config.root);
            let components = ComponentDiscovery::new(config.clone())?;
            let samples = SampleDiscovery::new(config)?;

            let filter = ComponentFilter::default().with_props().with_variants();
            let records = components.list_components(&filter).await?;
            let statistics = components.get_statistics().await?;
            let all_samples = samples.discover_samples().await?;
            let patterns = samples.extract_usage_patterns(&all_samples).await?;
            let data = ExportData::new(name, records, statistics, patterns);

            match output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    export(*format, &data, &mut writer)?;
                    writer.flush()?;
                    eprintln!("Exported {} to {}", format, path.display());
                }
                None => {
                    let stdout = io::stdout();
                    export(*format, &data, &mut stdout.lock())?;
                }
            }
        }
    }

    Ok(())
}
