//! Fixed-width Boolean states.
//!
//! A [`State`] packs up to 64 variable values into a `u64`. Character `i` of the canonical
//! `'0'/'1'` string is variable `x_{i+1}` and is stored as bit `width - 1 - i`, so the numeric
//! order of states is the lexicographic order of their canonical strings.

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The widest state that fits into the packed representation.
pub const MAX_STATE_WIDTH: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct State {
    width: u8,
    bits: u64,
}

impl State {
    /// Create a state of the given `width` from its numeric encoding. Bits above `width`
    /// are discarded.
    pub fn from_bits(bits: u64, width: usize) -> State {
        debug_assert!(width <= MAX_STATE_WIDTH);
        State {
            width: width as u8,
            bits: bits & mask_of_width(width),
        }
    }

    /// Create a state from a sequence of values (first value is variable `x1`).
    pub fn from_values(values: &[bool]) -> State {
        let mut bits = 0u64;
        for value in values {
            bits = (bits << 1) | u64::from(*value);
        }
        State::from_bits(bits, values.len())
    }

    /// Parse a state and check that it has the `expected` width.
    pub fn parse_with_width(value: &str, expected: usize) -> Result<State, FormatError> {
        let state = State::from_str(value)?;
        if state.width() != expected {
            return Err(FormatError::StateWidth {
                state: value.to_string(),
                found: state.width(),
                expected,
            });
        }
        Ok(state)
    }

    /// Iterate over all `2^width` states in ascending order.
    pub fn all(width: usize) -> impl Iterator<Item = State> {
        let count = 1u64 << width;
        (0..count).map(move |bits| State::from_bits(bits, width))
    }

    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Position of this state in the ascending enumeration of its state space.
    pub fn index(&self) -> usize {
        self.bits as usize
    }

    /// The value of variable `variable` (zero-based, `0` is `x1`).
    pub fn get(&self, variable: usize) -> bool {
        self.bits & self.mask(variable) != 0
    }

    pub fn set(&self, variable: usize, value: bool) -> State {
        let mask = self.mask(variable);
        let bits = if value {
            self.bits | mask
        } else {
            self.bits & !mask
        };
        State {
            width: self.width,
            bits,
        }
    }

    pub fn flip(&self, variable: usize) -> State {
        State {
            width: self.width,
            bits: self.bits ^ self.mask(variable),
        }
    }

    pub fn hamming_distance(&self, other: &State) -> u32 {
        (self.bits ^ other.bits).count_ones()
    }

    /// All states at Hamming distance one, ordered by the flipped variable.
    pub fn hamming_neighbors(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.width()).map(|var| self.flip(var))
    }

    /// Values of all variables, first value is variable `x1`.
    pub fn values(&self) -> Vec<bool> {
        (0..self.width()).map(|var| self.get(var)).collect()
    }

    /// Project this state onto the given variables; the first listed variable becomes
    /// the most significant bit of the result.
    pub fn project(&self, variables: &[usize]) -> u64 {
        variables
            .iter()
            .fold(0u64, |acc, var| (acc << 1) | u64::from(self.get(*var)))
    }

    fn mask(&self, variable: usize) -> u64 {
        debug_assert!(variable < self.width());
        1u64 << (self.width() - 1 - variable)
    }
}

fn mask_of_width(width: usize) -> u64 {
    if width >= MAX_STATE_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for var in 0..self.width() {
            f.write_str(if self.get(var) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for State {
    type Err = FormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| FormatError::InvalidState {
            state: value.to_string(),
            reason: reason.to_string(),
        };
        if value.is_empty() {
            return Err(invalid("empty state"));
        }
        if value.len() > MAX_STATE_WIDTH {
            return Err(invalid("more than 64 variables"));
        }
        let mut bits = 0u64;
        for c in value.chars() {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                _ => return Err(invalid("only `0` and `1` are allowed")),
            };
            bits = (bits << 1) | bit;
        }
        Ok(State::from_bits(bits, value.len()))
    }
}

impl TryFrom<String> for State {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        State::from_str(&value)
    }
}

impl From<State> for String {
    fn from(value: State) -> Self {
        value.to_string()
    }
}
