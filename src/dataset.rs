//! Trajectory datasets in the layout of the BNFinder structure learner.
//!
//! ```text
//! #discrete x1 0 1
//! #discrete x2 0 1
//! BNProject S0:0 S0:1 S1:0 S1:1
//! x1 0 1 1 1
//! x2 0 0 0 1
//! ```
//!
//! Every column is one time point `t` of trajectory `i` (`S<i>:<t>`), every row (after the
//! header) holds the values of one variable.

use crate::error::FormatError;
use crate::sampler::Trajectory;
use crate::state::State;
use crate::transition::UpdateMode;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// A set of equally long trajectories over named variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    pub variables: Vec<String>,
    pub trajectories: Vec<Vec<State>>,
}

impl Dataset {
    pub fn new(
        variables: Vec<String>,
        trajectories: &[Trajectory],
    ) -> Result<Dataset, FormatError> {
        let dataset = Dataset {
            variables,
            trajectories: trajectories.iter().map(|it| it.states.clone()).collect(),
        };
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), FormatError> {
        for state in self.trajectories.iter().flatten() {
            if state.width() != self.variables.len() {
                return Err(FormatError::StateWidth {
                    state: state.to_string(),
                    found: state.width(),
                    expected: self.variables.len(),
                });
            }
        }
        Ok(())
    }

    pub fn num_samples(&self) -> usize {
        self.trajectories.iter().map(|it| it.len()).sum()
    }

    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        write!(writer, "{self}")?;
        writer.flush()
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.write(std::io::BufWriter::new(std::fs::File::create(path)?))
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for name in &self.variables {
            writeln!(f, "#discrete {name} 0 1")?;
        }
        f.write_str("BNProject")?;
        for (i, trajectory) in self.trajectories.iter().enumerate() {
            for t in 0..trajectory.len() {
                write!(f, " S{i}:{t}")?;
            }
        }
        writeln!(f)?;
        for (var, name) in self.variables.iter().enumerate() {
            f.write_str(name)?;
            for state in self.trajectories.iter().flatten() {
                write!(f, " {}", u8::from(state.get(var)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Dataset {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| FormatError::Config(format!("invalid dataset: {reason}"));
        let mut variables = Vec::new();
        let mut columns: Vec<(usize, usize)> = Vec::new();
        let mut rows: Vec<Vec<bool>> = Vec::new();
        for line in s.lines().map(str::trim).filter(|it| !it.is_empty()) {
            let mut tokens = line.split_whitespace();
            let Some(head) = tokens.next() else {
                continue;
            };
            if head == "#discrete" {
                let name = tokens.next().ok_or_else(|| invalid("unnamed variable".into()))?;
                variables.push(name.to_string());
            } else if head == "BNProject" {
                for token in tokens {
                    let sample = token
                        .strip_prefix('S')
                        .and_then(|it| it.split_once(':'))
                        .and_then(|(i, t)| Some((i.parse().ok()?, t.parse().ok()?)))
                        .ok_or_else(|| invalid(format!("bad sample `{token}`")))?;
                    columns.push(sample);
                }
            } else {
                let var = rows.len();
                if variables.get(var).map(String::as_str) != Some(head) {
                    return Err(invalid(format!("unexpected row `{head}`")));
                }
                let values = tokens
                    .map(|it| match it {
                        "0" => Ok(false),
                        "1" => Ok(true),
                        _ => Err(invalid(format!("bad value `{it}` of `{head}`"))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if values.len() != columns.len() {
                    return Err(invalid(format!("row `{head}` has {} values", values.len())));
                }
                rows.push(values);
            }
        }
        if rows.len() != variables.len() {
            return Err(invalid("missing variable rows".into()));
        }

        let mut trajectories: Vec<Vec<State>> = Vec::new();
        for (column, (i, t)) in columns.iter().enumerate() {
            if *i == trajectories.len() && *t == 0 {
                trajectories.push(Vec::new());
            }
            let count = trajectories.len();
            let trajectory = match trajectories.last_mut() {
                Some(it) if *i + 1 == count && it.len() == *t => it,
                _ => return Err(invalid(format!("sample S{i}:{t} is out of order"))),
            };
            let values: Vec<bool> = rows.iter().map(|row| row[column]).collect();
            trajectory.push(State::from_values(&values));
        }
        Ok(Dataset {
            variables,
            trajectories,
        })
    }
}

/// Parameters of one dataset, encoded in its file name as
/// `{network}_{mode}_f{period}_s{size}_l{length}_at{ratio}.txt`.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetName {
    pub network: String,
    pub mode: UpdateMode,
    pub period: usize,
    pub size: usize,
    pub length: usize,
    pub ratio: f64,
}

impl DatasetName {
    /// File name of the learned model for this dataset and scoring criterion.
    pub fn learned_file_name(&self, criterion: &str) -> String {
        format!("{}_scr{criterion}.bif", self.stem())
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.stem())
    }

    fn stem(&self) -> String {
        format!(
            "{}_{}_f{}_s{}_l{}_at{:?}",
            self.network,
            self.mode.short_name(),
            self.period,
            self.size,
            self.length,
            self.ratio
        )
    }

    /// Parse a dataset (`.txt`) or learned model (`_scr<criterion>.bif`) file name.
    /// Returns the name together with the scoring criterion, if any.
    pub fn parse(file_name: &str) -> Result<(DatasetName, Option<String>), FormatError> {
        let invalid = || FormatError::Config(format!("unrecognized file name `{file_name}`"));
        let (stem, criterion) = if let Some(stem) = file_name.strip_suffix(".txt") {
            (stem, None)
        } else if let Some(stem) = file_name.strip_suffix(".bif") {
            let (stem, criterion) = stem.rsplit_once("_scr").ok_or_else(invalid)?;
            (stem, Some(criterion.to_string()))
        } else {
            return Err(invalid());
        };

        // The network name may itself contain underscores.
        let parts: Vec<&str> = stem.rsplitn(6, '_').collect();
        let &[ratio, length, size, period, mode, network] = parts.as_slice() else {
            return Err(invalid());
        };
        let mode = match mode {
            "sync" => UpdateMode::Synchronous,
            "async" => UpdateMode::Asynchronous,
            _ => return Err(invalid()),
        };
        let name = DatasetName {
            network: network.to_string(),
            mode,
            period: period
                .strip_prefix("f")
                .ok_or_else(invalid)?
                .parse()
                .map_err(|_| invalid())?,
            size: size
                .strip_prefix("s")
                .ok_or_else(invalid)?
                .parse()
                .map_err(|_| invalid())?,
            length: length
                .strip_prefix("l")
                .ok_or_else(invalid)?
                .parse()
                .map_err(|_| invalid())?,
            ratio: ratio
                .strip_prefix("at")
                .ok_or_else(invalid)?
                .parse()
                .map_err(|_| invalid())?,
        };
        Ok((name, criterion))
    }
}

impl Display for DatasetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name())
    }
}
