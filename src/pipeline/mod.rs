//! Batch driver: from network definitions to datasets, learned models and evaluations.
//!
//! For every network and every update mode, the pipeline:
//!
//! 1. builds the transition relation and finds its attractors,
//! 2. builds one [`TrajectoryPool`](crate::sampler::TrajectoryPool) per `(period, length)`
//!    pair (in parallel),
//! 3. selects a dataset for every `(ratio, size)` pair and writes it when the pool has
//!    enough matching trajectories,
//! 4. optionally runs the learner on every written dataset (for every scoring criterion)
//!    and evaluates the learned model against the ground truth.
//!
//! Networks are processed in parallel and in isolation: a failure is recorded in the
//! [`PipelineReport`] and the remaining networks continue.


use crate::attractor::analyze;
use crate::dataset::{Dataset, DatasetName};
use crate::error::{FormatError, PipelineError};
use crate::evaluation::{Evaluation, GroundTruth, evaluate};
use crate::learned::LearnedModel;
use crate::learner::{CommandLearner, LearnerClient, ScoringCriterion, learned_model_path};
use crate::network::NetworkDefinition;
use crate::sampler::{SamplerConfig, SamplerContext, build_pools};
use crate::transition::{UpdateMode, build_relation};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub modes: Vec<UpdateMode>,
    pub periods: Vec<usize>,
    pub lengths: Vec<usize>,
    pub ratios: Vec<f64>,
    pub sizes: Vec<usize>,
    pub tolerance: f64,
    /// Number of trajectories simulated per `(period, length)` pair.
    pub pool_size: usize,
    pub seed: u64,
    pub criteria: Vec<ScoringCriterion>,
    /// No learning (and no evaluation) takes place when missing.
    pub learner: Option<CommandLearner>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            output_dir: PathBuf::from("results"),
            modes: vec![UpdateMode::Synchronous, UpdateMode::Asynchronous],
            periods: vec![1],
            lengths: vec![10],
            ratios: vec![0.3, 0.5, 0.7],
            sizes: vec![10],
            tolerance: 0.05,
            pool_size: 10_000,
            seed: 0,
            criteria: vec![ScoringCriterion::Mdl, ScoringCriterion::Bde],
            learner: None,
        }
    }
}

impl PipelineConfig {
    fn pairs(&self) -> Vec<(usize, usize)> {
        self.periods
            .iter()
            .flat_map(|period| self.lengths.iter().map(move |length| (*period, *length)))
            .collect()
    }
}

/// A named network definition.
#[derive(Clone, Debug)]
pub struct PipelineInput {
    pub name: String,
    pub definition: NetworkDefinition,
}

impl PipelineInput {
    /// Load a JSON definition. The name defaults to the file stem.
    pub fn load(path: &Path) -> Result<PipelineInput, PipelineError> {
        let definition = NetworkDefinition::from_json(&std::fs::read_to_string(path)?)?;
        let name = match &definition.name {
            Some(name) => name.clone(),
            None => path
                .file_stem()
                .map(|it| it.to_string_lossy().into_owned())
                .ok_or_else(|| FormatError::Config(format!("no name for `{}`", path.display())))?,
        };
        Ok(PipelineInput { name, definition })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatasetStatus {
    Success,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetRecord {
    pub mode: UpdateMode,
    pub period: usize,
    pub length: usize,
    pub target_ratio: f64,
    pub size: usize,
    /// Matching trajectories in the pool.
    pub matching: usize,
    pub file: String,
    pub status: DatasetStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LearnedRecord {
    pub dataset: String,
    pub criterion: ScoringCriterion,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkReport {
    pub name: String,
    pub datasets: Vec<DatasetRecord>,
    pub learned: Vec<LearnedRecord>,
}

impl NetworkReport {
    pub fn datasets_written(&self) -> usize {
        self.datasets
            .iter()
            .filter(|it| it.status == DatasetStatus::Success)
            .count()
    }

    pub fn models_learned(&self) -> usize {
        self.learned.iter().filter(|it| it.error.is_none()).count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub networks: Vec<NetworkReport>,
    /// Networks that failed entirely, with the reason.
    pub failures: BTreeMap<String, String>,
}

/// Run the whole pipeline on all `inputs`.
pub fn run_pipeline(
    config: &PipelineConfig,
    inputs: &[PipelineInput],
    learner: Option<&dyn LearnerClient>,
) -> PipelineReport {
    info!("Running pipeline on {} networks.", inputs.len());
    let results: Vec<(String, Result<NetworkReport, PipelineError>)> = inputs
        .par_iter()
        .enumerate()
        .map(|(index, input)| (input.name.clone(), run_network(config, index, input, learner)))
        .collect();

    let mut report = PipelineReport::default();
    for (name, result) in results {
        match result {
            Ok(network) => report.networks.push(network),
            Err(error) => {
                warn!("Network `{name}` failed: {error}");
                report.failures.insert(name, error.to_string());
            }
        }
    }
    info!(
        "Pipeline finished: {}/{} networks succeeded.",
        report.networks.len(),
        inputs.len()
    );
    report
}

/// Run the pipeline for a single network. `index` determines the seeds of this network.
pub fn run_network(
    config: &PipelineConfig,
    index: usize,
    input: &PipelineInput,
    learner: Option<&dyn LearnerClient>,
) -> Result<NetworkReport, PipelineError> {
    let name = &input.name;
    info!("Processing network `{name}`.");
    let variables = input.definition.variable_order()?;
    let network = input.definition.network()?;
    let listed = input.definition.relation()?;
    let truth = match (&network, &listed) {
        (Some(network), _) => GroundTruth::from_network(network)?,
        (None, Some(relation)) => GroundTruth::from_relation(relation, &variables)?,
        (None, None) => {
            return Err(FormatError::Network(format!("`{name}` has no dynamics")).into());
        }
    };

    let dir = config.output_dir.join(name);
    std::fs::create_dir_all(&dir)?;
    let pairs = config.pairs();
    // Every (network, mode) gets a block of seeds: one per pool and one for selection.
    let block = pairs.len() as u64 + 1;

    let mut datasets = Vec::new();
    for (mode_index, mode) in config.modes.iter().enumerate() {
        let relation = match (&network, &listed) {
            (Some(network), _) => build_relation(network, *mode)?,
            (None, Some(relation)) if relation.mode() == *mode => relation.clone(),
            _ => {
                warn!("Network `{name}` has no {mode} dynamics; skipped.");
                continue;
            }
        };
        let relation = Arc::new(relation);
        let attractors = analyze(relation.clone())?.attractor_states();
        let sampler = SamplerConfig {
            tolerance: config.tolerance,
            ..Default::default()
        };
        let context = SamplerContext::new(relation, &attractors, sampler)?;

        let slot = (index * config.modes.len() + mode_index) as u64;
        let base_seed = config.seed.wrapping_add(slot.wrapping_mul(block));
        let pools = build_pools(&context, &pairs, config.pool_size, base_seed)?;
        let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(block - 1));
        for pool in &pools {
            for ratio in &config.ratios {
                for size in &config.sizes {
                    let dataset_name = DatasetName {
                        network: name.clone(),
                        mode: *mode,
                        period: pool.period,
                        size: *size,
                        length: pool.length,
                        ratio: *ratio,
                    };
                    let sample = pool.select(*ratio, config.tolerance, *size, &mut rng);
                    let status = if sample.is_complete() {
                        Dataset::new(variables.clone(), &sample.trajectories)?
                            .write_file(&dir.join(dataset_name.file_name()))?;
                        DatasetStatus::Success
                    } else {
                        DatasetStatus::Failed
                    };
                    datasets.push(DatasetRecord {
                        mode: *mode,
                        period: pool.period,
                        length: pool.length,
                        target_ratio: *ratio,
                        size: *size,
                        matching: sample.matching,
                        file: dataset_name.file_name(),
                        status,
                    });
                }
            }
        }
    }

    let written = datasets
        .iter()
        .filter(|it| it.status == DatasetStatus::Success)
        .count();
    info!(
        "Network `{name}`: wrote {written}/{} datasets.",
        datasets.len()
    );
    let report_path = dir.join(format!("{name}_generation_report.json"));
    std::fs::write(
        report_path,
        serde_json::to_string_pretty(&datasets).map_err(FormatError::from)?,
    )?;

    let learned = match learner {
        Some(learner) => learn_all(config, &dir, &datasets, &truth, learner),
        None => Vec::new(),
    };
    Ok(NetworkReport {
        name: name.clone(),
        datasets,
        learned,
    })
}

fn learn_all(
    config: &PipelineConfig,
    dir: &Path,
    datasets: &[DatasetRecord],
    truth: &GroundTruth,
    learner: &dyn LearnerClient,
) -> Vec<LearnedRecord> {
    let jobs: Vec<(&DatasetRecord, ScoringCriterion)> = datasets
        .iter()
        .filter(|it| it.status == DatasetStatus::Success)
        .flat_map(|it| config.criteria.iter().map(move |c| (it, *c)))
        .collect();
    let learned_dir = dir.join("learned");
    let records: Vec<LearnedRecord> = jobs
        .par_iter()
        .map(|(dataset, criterion)| {
            let input = dir.join(&dataset.file);
            let output = learned_model_path(&input, *criterion, &learned_dir);
            let outcome = learn_one(learner, &input, *criterion, &output, truth, dataset.mode);
            if let Err(error) = &outcome {
                warn!("Learning from `{}` ({criterion}) failed: {error}", dataset.file);
            }
            LearnedRecord {
                dataset: dataset.file.clone(),
                criterion: *criterion,
                file: output.display().to_string(),
                error: outcome.as_ref().err().map(|it| it.to_string()),
                evaluation: outcome.ok(),
            }
        })
        .collect();
    let succeeded = records.iter().filter(|it| it.error.is_none()).count();
    info!("Learned {succeeded}/{} models.", records.len());
    records
}

fn learn_one(
    learner: &dyn LearnerClient,
    input: &Path,
    criterion: ScoringCriterion,
    output: &Path,
    truth: &GroundTruth,
    mode: UpdateMode,
) -> Result<Evaluation, PipelineError> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // A model left over from an earlier run must not pass for the output of this one.
    match std::fs::remove_file(output) {
        Err(error) if error.kind() != std::io::ErrorKind::NotFound => return Err(error.into()),
        _ => {}
    }
    learner.learn(input, criterion, output)?;
    let model = LearnedModel::parse(&std::fs::read_to_string(output)?)?;
    evaluate(truth, &model, mode)
}
