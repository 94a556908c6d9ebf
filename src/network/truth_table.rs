use crate::error::FormatError;
use crate::state::State;
use std::fmt::{Display, Formatter};

/// The largest number of inputs of a single truth table.
pub const MAX_TABLE_INPUTS: usize = 20;

/// A (possibly partial) truth table over a restricted set of input variables.
///
/// Row `r` corresponds to the input combination whose binary encoding is `r`, with the
/// first input being the most significant bit. A `None` row is an undefined combination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruthTable {
    inputs: Vec<usize>,
    outputs: Vec<Option<bool>>,
}

impl TruthTable {
    /// Create a table with all rows undefined.
    pub fn new(inputs: Vec<usize>) -> Result<TruthTable, FormatError> {
        if inputs.len() > MAX_TABLE_INPUTS {
            return Err(FormatError::Network(format!(
                "truth table with {} inputs is too large",
                inputs.len()
            )));
        }
        let mut sorted = inputs.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != inputs.len() {
            return Err(FormatError::Network(
                "truth table inputs must be distinct".to_string(),
            ));
        }
        Ok(TruthTable {
            outputs: vec![None; 1 << inputs.len()],
            inputs,
        })
    }

    /// Create a fully defined table.
    pub fn from_outputs(inputs: Vec<usize>, outputs: Vec<bool>) -> Result<TruthTable, FormatError> {
        let mut table = TruthTable::new(inputs)?;
        if outputs.len() != table.outputs.len() {
            return Err(FormatError::Network(format!(
                "truth table over {} inputs needs {} rows, got {}",
                table.inputs.len(),
                table.outputs.len(),
                outputs.len()
            )));
        }
        table.outputs = outputs.into_iter().map(Some).collect();
        Ok(table)
    }

    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    pub fn num_rows(&self) -> usize {
        self.outputs.len()
    }

    pub fn row(&self, row: usize) -> Option<bool> {
        self.outputs.get(row).copied().flatten()
    }

    pub fn set_row(&mut self, row: usize, value: bool) -> Result<(), FormatError> {
        let slot = self.outputs.get_mut(row).ok_or_else(|| {
            FormatError::Network(format!("truth table has no row #{row}"))
        })?;
        *slot = Some(value);
        Ok(())
    }

    /// Set the row given by its input bit string (e.g. `"101"`).
    pub fn set_row_bits(&mut self, bits: &str, value: bool) -> Result<(), FormatError> {
        let row = if self.inputs.is_empty() && bits.is_empty() {
            0
        } else {
            State::parse_with_width(bits, self.inputs.len())?.index()
        };
        self.set_row(row, value)
    }

    /// Number of defined rows.
    pub fn defined_rows(&self) -> usize {
        self.outputs.iter().filter(|it| it.is_some()).count()
    }

    /// Rows that evaluate to `true`.
    pub fn minterms(&self) -> Vec<u64> {
        self.outputs
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == Some(true))
            .map(|(row, _)| row as u64)
            .collect()
    }

    pub fn evaluate(&self, state: State) -> Option<bool> {
        self.row(state.project(&self.inputs) as usize)
    }
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "table{:?}[", self.inputs)?;
        for value in &self.outputs {
            f.write_str(match value {
                Some(true) => "1",
                Some(false) => "0",
                None => "-",
            })?;
        }
        f.write_str("]")
    }
}
