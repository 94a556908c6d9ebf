use biodivine_algo_bn_dynamics::attractor::analyze;
use biodivine_algo_bn_dynamics::dataset::Dataset;
use biodivine_algo_bn_dynamics::generator::{GeneratorKind, NetworkConfig, generate};
use biodivine_algo_bn_dynamics::learner::{CommandLearner, LearnerClient};
use biodivine_algo_bn_dynamics::network::NetworkDefinition;
use biodivine_algo_bn_dynamics::pipeline::{PipelineConfig, PipelineInput, run_pipeline};
use biodivine_algo_bn_dynamics::sampler::{SamplerConfig, SamplerContext, sample};
use biodivine_algo_bn_dynamics::symbolic::{SymbolicConfig, symbolic_attractors};
use biodivine_algo_bn_dynamics::transition::{TransitionRelation, UpdateMode, build_relation};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bn_dynamics")]
#[command(about = "Explicit-state dynamics, attractors and trajectory datasets of Boolean networks")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging verbosity (use -v for info, or -v=LEVEL for a specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true, global = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the SCCs and attractors of a network definition (.json)
    Analyze {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, default_value = "async", require_equals = true)]
        mode: Mode,

        /// Also compute asynchronous attractors symbolically and compare
        #[arg(long)]
        symbolic: bool,
    },
    /// Sample trajectories with a given attractor ratio into a dataset file
    Sample {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, default_value = "async", require_equals = true)]
        mode: Mode,

        #[arg(long, default_value_t = 0.5, require_equals = true)]
        ratio: f64,

        #[arg(long, default_value_t = 0.1, require_equals = true)]
        tolerance: f64,

        #[arg(long, default_value_t = 10, require_equals = true)]
        size: usize,

        #[arg(long, default_value_t = 10, require_equals = true)]
        length: usize,

        #[arg(long, default_value_t = 1, require_equals = true)]
        period: usize,

        #[arg(long, default_value_t = 0, require_equals = true)]
        seed: u64,

        #[arg(long, short = 'o', require_equals = true)]
        output: PathBuf,
    },
    /// Generate a random network and write its definition (.json)
    Generate {
        #[arg(long, default_value = "attractor-targeted", require_equals = true)]
        kind: Kind,

        #[arg(long, default_value_t = 7, require_equals = true)]
        vars: usize,

        #[arg(long, default_value_t = 0, require_equals = true)]
        seed: u64,

        #[arg(long, short = 'o', require_equals = true)]
        output: PathBuf,
    },
    /// Run the batch pipeline described by a JSON configuration
    Pipeline {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Mode {
    Sync,
    Async,
}

impl From<Mode> for UpdateMode {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Sync => UpdateMode::Synchronous,
            Mode::Async => UpdateMode::Asynchronous,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Kind {
    #[value(name = "attractor-targeted")]
    AttractorTargeted,
    #[value(name = "dependency-limited")]
    DependencyLimited,
    #[value(name = "simple")]
    Simple,
}

impl From<Kind> for GeneratorKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::AttractorTargeted => GeneratorKind::AttractorTargeted,
            Kind::DependencyLimited => GeneratorKind::DependencyLimited,
            Kind::Simple => GeneratorKind::Simple,
        }
    }
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
        }
    }
}

/// Print the error and exit.
fn fail<E: std::fmt::Display>(context: &str, error: E) -> ! {
    eprintln!("{context}: {error}");
    std::process::exit(1);
}

fn load_definition(path: &Path) -> NetworkDefinition {
    let json = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Failed to read {}", path.display()), e));
    NetworkDefinition::from_json(&json)
        .unwrap_or_else(|e| fail(&format!("Failed to load {}", path.display()), e))
}

/// The relation of a definition in `mode`. Rules take precedence over a listing.
fn load_relation(definition: &NetworkDefinition, mode: UpdateMode) -> TransitionRelation {
    let network = definition
        .network()
        .unwrap_or_else(|e| fail("Invalid network", e));
    match network {
        Some(network) => {
            build_relation(&network, mode).unwrap_or_else(|e| fail("Cannot build relation", e))
        }
        None => {
            let relation = definition
                .relation()
                .unwrap_or_else(|e| fail("Invalid transitions", e))
                .unwrap_or_else(|| fail("Invalid network", "no dynamics"));
            if relation.mode() != mode {
                println!("Note: the definition only lists {} transitions.", relation.mode());
            }
            relation
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = match args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    match args.command {
        Command::Analyze {
            file,
            mode,
            symbolic,
        } => {
            let definition = load_definition(&file);
            let relation = load_relation(&definition, mode.into());
            println!(
                "Loaded {} relation with {} states and {} transitions.",
                relation.mode(),
                relation.num_states(),
                relation.num_edges()
            );
            let classification =
                analyze(relation).unwrap_or_else(|e| fail("Analysis cancelled", e));
            println!("SCCs: {}", classification.sccs().len());
            for (i, attractor) in classification.attractors().enumerate() {
                let states: Vec<String> = attractor.iter().map(|it| it.to_string()).collect();
                println!("Attractor #{}: {} states [{}]", i + 1, states.len(), states.join(", "));
            }
            println!("Fixed points: {}", classification.fixed_points().len());

            if symbolic {
                let network = definition
                    .network()
                    .unwrap_or_else(|e| fail("Invalid network", e))
                    .unwrap_or_else(|| fail("Symbolic analysis", "the definition has no rules"));
                let config = SymbolicConfig::try_from(&network)
                    .unwrap_or_else(|e| fail("Symbolic analysis", e));
                let attractors = symbolic_attractors(&config)
                    .unwrap_or_else(|e| fail("Symbolic analysis cancelled", e));
                println!("Symbolic asynchronous attractors: {}", attractors.len());
            }
        }
        Command::Sample {
            file,
            mode,
            ratio,
            tolerance,
            size,
            length,
            period,
            seed,
            output,
        } => {
            let definition = load_definition(&file);
            let relation = Arc::new(load_relation(&definition, mode.into()));
            let attractors = analyze(relation.clone())
                .unwrap_or_else(|e| fail("Analysis cancelled", e))
                .attractor_states();
            let config = SamplerConfig {
                period,
                length,
                target_ratio: ratio,
                tolerance,
                size,
                seed,
                ..Default::default()
            };
            let context = SamplerContext::new(relation, &attractors, config)
                .unwrap_or_else(|e| fail("Invalid sampling parameters", e));
            let report = sample(&context).unwrap_or_else(|e| fail("Sampling cancelled", e));
            println!(
                "Sampled {}/{} trajectories in {} attempts.",
                report.trajectories.len(),
                report.requested,
                report.attempts
            );
            let variables = definition
                .variable_order()
                .unwrap_or_else(|e| fail("Invalid network", e));
            Dataset::new(variables, &report.trajectories)
                .unwrap_or_else(|e| fail("Invalid dataset", e))
                .write_file(&output)
                .unwrap_or_else(|e| fail("Cannot write dataset", e));
        }
        Command::Generate {
            kind,
            vars,
            seed,
            output,
        } => {
            let config = NetworkConfig::new(kind.into(), vars, seed);
            let generated = generate(&config).unwrap_or_else(|e| fail("Generation failed", e));
            println!(
                "Generated {} states, {} SCCs, {} attractors.",
                generated.report.num_states,
                generated.report.num_sccs,
                generated.report.num_attractors
            );
            for shortfall in generated.report.shortfalls(&config) {
                println!("Shortfall: {shortfall}");
            }
            let name = output
                .file_stem()
                .map(|it| it.to_string_lossy().into_owned())
                .unwrap_or_else(|| "generated".to_string());
            let json = generated
                .to_definition(&name)
                .to_json()
                .unwrap_or_else(|e| fail("Cannot serialize network", e));
            std::fs::write(&output, json).unwrap_or_else(|e| fail("Cannot write network", e));
        }
        Command::Pipeline { config, files } => {
            let json = std::fs::read_to_string(&config)
                .unwrap_or_else(|e| fail(&format!("Failed to read {}", config.display()), e));
            let config: PipelineConfig =
                serde_json::from_str(&json).unwrap_or_else(|e| fail("Invalid configuration", e));
            let inputs: Vec<PipelineInput> = files
                .iter()
                .filter_map(|path| match PipelineInput::load(path) {
                    Ok(input) => Some(input),
                    Err(e) => {
                        eprintln!("Skipping {}: {e}", path.display());
                        None
                    }
                })
                .collect();
            let learner: Option<CommandLearner> = config.learner.clone();
            let report = run_pipeline(
                &config,
                &inputs,
                learner.as_ref().map(|it| it as &dyn LearnerClient),
            );
            for network in &report.networks {
                println!(
                    "{}: {}/{} datasets, {}/{} learned models.",
                    network.name,
                    network.datasets_written(),
                    network.datasets.len(),
                    network.models_learned(),
                    network.learned.len()
                );
            }
            for (name, error) in &report.failures {
                println!("{name}: FAILED ({error})");
            }
            let json = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| fail("Cannot serialize report", e));
            let path = config.output_dir.join("pipeline_report.json");
            std::fs::create_dir_all(&config.output_dir)
                .and_then(|_| std::fs::write(&path, json))
                .unwrap_or_else(|e| fail("Cannot write report", e));
        }
    }
}
