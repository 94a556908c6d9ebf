//! The boundary to the external structure-learning tool.
//!
//! A [`LearnerClient`] turns a dataset file into a learned-model file. The provided
//! [`CommandLearner`] runs a BNFinder-compatible executable:
//!
//! ```text
//! bnf -e <dataset> -s <MDL|BDE> -l <max parents> [-g] -v -b <output>.bif
//! ```
//!
//! Invocations are not retried. A failed invocation is reported as a [`LearnerError`].

use crate::error::LearnerError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Scoring function used by the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScoringCriterion {
    /// Minimal description length.
    Mdl,
    /// Bayesian-Dirichlet equivalence.
    Bde,
}

impl ScoringCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringCriterion::Mdl => "MDL",
            ScoringCriterion::Bde => "BDE",
        }
    }
}

impl Display for ScoringCriterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can learn a model from a dataset file.
pub trait LearnerClient: Send + Sync {
    /// Learn a model from `dataset` and write it to `output`.
    fn learn(
        &self,
        dataset: &Path,
        criterion: ScoringCriterion,
        output: &Path,
    ) -> Result<(), LearnerError>;
}

/// Output path of the model learned from `dataset`: `{dir}/{stem}_scr{criterion}.bif`.
pub fn learned_model_path(dataset: &Path, criterion: ScoringCriterion, dir: &Path) -> PathBuf {
    let stem = dataset
        .file_stem()
        .map(|it| it.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{stem}_scr{criterion}.bif"))
}

/// Runs the learner as an external process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandLearner {
    /// The executable.
    pub program: String,
    /// Arguments placed before the generated ones (e.g. `["run", "-n", "env", "bnf"]`
    /// when the executable is a wrapper).
    pub prefix_args: Vec<String>,
    pub max_parents: usize,
    /// Allow a variable to regulate itself.
    pub self_regulation: bool,
}

impl Default for CommandLearner {
    fn default() -> Self {
        CommandLearner {
            program: "bnf".to_string(),
            prefix_args: Vec::new(),
            max_parents: 3,
            self_regulation: true,
        }
    }
}

impl CommandLearner {
    pub fn new(program: &str) -> CommandLearner {
        CommandLearner {
            program: program.to_string(),
            ..Default::default()
        }
    }

    /// The full argument list of one invocation.
    pub fn arguments(
        &self,
        dataset: &Path,
        criterion: ScoringCriterion,
        output: &Path,
    ) -> Vec<String> {
        let mut args = self.prefix_args.clone();
        args.push("-e".to_string());
        args.push(dataset.to_string_lossy().into_owned());
        args.push("-s".to_string());
        args.push(criterion.to_string());
        args.push("-l".to_string());
        args.push(self.max_parents.to_string());
        if self.self_regulation {
            args.push("-g".to_string());
        }
        args.push("-v".to_string());
        args.push("-b".to_string());
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

impl LearnerClient for CommandLearner {
    fn learn(
        &self,
        dataset: &Path,
        criterion: ScoringCriterion,
        output: &Path,
    ) -> Result<(), LearnerError> {
        let args = self.arguments(dataset, criterion, output);
        debug!("Running `{} {}`.", self.program, args.join(" "));
        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| LearnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !result.status.success() {
            return Err(LearnerError::ExitStatus {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        if !output.exists() {
            return Err(LearnerError::MissingOutput(output.display().to_string()));
        }
        info!("Learned `{}` ({criterion}).", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::LearnerError;
    use crate::learner::{CommandLearner, LearnerClient, ScoringCriterion, learned_model_path};
    use std::path::Path;

    #[test]
    fn test_arguments() {
        let learner = CommandLearner::default();
        let args = learner.arguments(
            Path::new("data/net_sync_f1_s5_l10_at0.5.txt"),
            ScoringCriterion::Mdl,
            Path::new("out/net_sync_f1_s5_l10_at0.5_scrMDL.bif"),
        );
        assert_eq!(
            args.join(" "),
            "-e data/net_sync_f1_s5_l10_at0.5.txt -s MDL -l 3 -g -v -b out/net_sync_f1_s5_l10_at0.5_scrMDL.bif"
        );

        let learner = CommandLearner {
            prefix_args: vec!["run".to_string(), "bnf".to_string()],
            self_regulation: false,
            max_parents: 2,
            ..CommandLearner::new("conda")
        };
        let args = learner.arguments(Path::new("a.txt"), ScoringCriterion::Bde, Path::new("a.bif"));
        assert_eq!(args.join(" "), "run bnf -e a.txt -s BDE -l 2 -v -b a.bif");
    }

    #[test]
    fn test_output_path() {
        let path = learned_model_path(
            Path::new("data/7d_000_async_f1_s5_l10_at0.5.txt"),
            ScoringCriterion::Bde,
            Path::new("results"),
        );
        assert_eq!(path, Path::new("results/7d_000_async_f1_s5_l10_at0.5_scrBDE.bif"));
    }

    #[test]
    fn test_missing_program() {
        let learner = CommandLearner::new("this-learner-does-not-exist");
        let result = learner.learn(Path::new("a.txt"), ScoringCriterion::Mdl, Path::new("a.bif"));
        assert!(matches!(result, Err(LearnerError::Spawn { .. })));
    }

    #[test]
    fn test_criterion_serde() {
        let criteria: Vec<ScoringCriterion> = serde_json::from_str(r#"["MDL", "BDE"]"#).unwrap();
        assert_eq!(criteria, vec![ScoringCriterion::Mdl, ScoringCriterion::Bde]);
    }
}
