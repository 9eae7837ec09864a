use anyhow::Context;
use bench_common::db::core::InstanceSpec;
use bench_common::db::writer::bookshelf::{BookshelfWriter, Header, LogProgress};
use bench_common::util::config::Config;
use bench_common::util::generator::{self, GenerationReport};
use bench_common::util::logger;
use bench_common::util::preset::SizePreset;
use bench_common::util::target::OutputTarget;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Base directory for generated suites (overrides `output.base_dir`)
    #[arg(long, global = true, value_name = "DIR")]
    out: Option<PathBuf>,

    /// RNG seed (overrides `generator.seed`)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one preset size
    Generate {
        #[arg(long, default_value = "medium")]
        size: String,
        /// Output basename (default: example_<size>)
        #[arg(long)]
        name: Option<String>,
    },
    /// Generate small, medium, large and xlarge
    GenerateAll,
    /// Generate an instance with explicit counts
    Custom {
        #[arg(long)]
        nodes: usize,
        #[arg(long, default_value_t = 0)]
        terminals: usize,
        #[arg(long)]
        nets: usize,
        #[arg(long)]
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.generator.seed = Some(seed);
    }
    let base_dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.base_dir));

    let writer = BookshelfWriter::new(Header {
        created: generator::created_stamp(),
        user: config.generator.user.clone(),
    })
    .with_batch_sizes(
        config.generator.node_batch_size,
        config.generator.net_batch_size,
    );

    let command = args
        .command
        .unwrap_or(Commands::Generate {
            size: "medium".to_string(),
            name: None,
        });

    match command {
        Commands::Generate { size, name } => {
            let preset = SizePreset::resolve(&size);
            let basename = name.unwrap_or_else(|| preset.default_basename());
            run_instance(preset.spec(), &base_dir, &basename, &writer, &config)?;
        }
        Commands::GenerateAll => {
            log::info!("Generating all benchmark sizes...");
            let mut failed = Vec::new();
            for preset in SizePreset::STANDARD {
                log::info!("=== Generating {} benchmark ===", preset.name().to_uppercase());
                let basename = preset.default_basename();
                if let Err(e) = run_instance(preset.spec(), &base_dir, &basename, &writer, &config)
                {
                    log::error!("{:#}", e);
                    failed.push(preset.name());
                }
            }
            if !failed.is_empty() {
                return Err(anyhow::anyhow!(
                    "Failed to generate sizes: {}",
                    failed.join(", ")
                ));
            }
            log::info!("All benchmarks generated successfully!");
        }
        Commands::Custom {
            nodes,
            terminals,
            nets,
            name,
        } => {
            let spec = InstanceSpec::new(nodes, terminals, nets);
            run_instance(spec, &base_dir, &name, &writer, &config)?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            path
        );
        return Ok(Config::default());
    }
    log::info!("Loading configuration from {:?}", path);
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
    toml::from_str(&config_str).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
}

fn run_instance(
    spec: InstanceSpec,
    base_dir: &Path,
    basename: &str,
    writer: &BookshelfWriter,
    config: &Config,
) -> anyhow::Result<GenerationReport> {
    let target = OutputTarget::in_base_dir(base_dir, basename);
    let rng = generator::rng_from_seed(config.generator.seed);

    let report = generator::generate_benchmark(spec, &target, writer, rng, &mut LogProgress)
        .with_context(|| format!("Failed to generate benchmark '{}'", basename))?;

    log::info!(
        "Wrote {} nodes ({} terminals) and {} nets to {:?} in {:.1}s",
        report.nodes_written,
        report.spec.terminal_count,
        report.nets_written,
        report.target.dir,
        report.elapsed.as_secs_f64()
    );
    Ok(report)
}
