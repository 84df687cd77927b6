// Copyright (c) 2017-2021 Fabian Schuiki

//! Circuit descriptions
//!
//! A circuit is described as a JSON document listing its gates in index
//! order. Each gate gives its inputs, initial value, and logic function,
//! along with its timing either explicitly or as a delay and a transition
//! factor:
//!
//! ```json
//! {
//!   "until": "40",
//!   "gates": [
//!     { "label": "P", "inputs": [1, 2], "initial": true, "function": "or",
//!       "lag": "3/2", "rise": 1, "fall": 1 },
//!     { "label": "Q", "inputs": [2], "function": "copy",
//!       "delay": "1/2", "factor": "101/100" },
//!     { "label": "R", "inputs": [0, 1], "function": "xor",
//!       "lag": "2.5" }
//!   ]
//! }
//! ```
//!
//! Times are given as integers or as strings holding an integer, decimal, or
//! fraction. Omitted rise and fall times default to zero.

use crate::{
    error::{Error, Result},
    gate::{Gate, Logic},
    ratio::{parse_ratio, zero, Ratio},
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A description of a gate network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Circuit {
    /// The gates of the network, in index order.
    pub gates: Vec<GateDesc>,
    /// The time to simulate until, if the circuit suggests one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<Literal>,
    /// The gates whose waveforms are of interest, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Vec<usize>>,
}

/// A description of a single gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct GateDesc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub inputs: Vec<i64>,
    #[serde(default)]
    pub initial: bool,
    pub function: Logic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lag: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rise: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<Literal>,
}

/// A rational number as written in a circuit description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// A plain JSON integer.
    Int(i64),
    /// An integer, decimal, or fraction in a string.
    Text(String),
}

impl Literal {
    /// Convert the literal into an exact rational.
    pub fn to_ratio(&self) -> Result<Ratio> {
        match self {
            Literal::Int(v) => Ok(Ratio::from_integer((*v).into())),
            Literal::Text(s) => parse_ratio(s)
                .ok_or_else(|| Error::InvalidCircuit(format!("`{}` is not a rational number", s))),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Circuit {
    /// Parse a circuit description from JSON.
    pub fn from_json(input: &str) -> Result<Circuit> {
        serde_json::from_str(input).map_err(|e| Error::InvalidCircuit(format!("{}", e)))
    }

    /// Render the circuit description as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Build the gates of the circuit.
    ///
    /// Fails if any gate has invalid timing, or refers to an input that does
    /// not exist.
    pub fn build(&self) -> Result<Vec<Gate>> {
        let count = self.gates.len();
        if count == 0 {
            return Err(Error::InvalidCircuit("circuit has no gates".to_string()));
        }
        self.gates
            .iter()
            .enumerate()
            .map(|(index, desc)| {
                let name = match desc.label {
                    Some(ref label) => label.clone(),
                    None => format!("g{}", index),
                };
                desc.build(count).map_err(|e| e.in_gate(name))
            })
            .collect()
    }

    /// The time to simulate until, if given.
    pub fn until(&self) -> Result<Option<Ratio>> {
        self.until.as_ref().map(Literal::to_ratio).transpose()
    }

    /// The gates to display, checked against the number of gates.
    pub fn display(&self) -> Result<Option<Vec<usize>>> {
        if let Some(ref display) = self.display {
            if let Some(&bad) = display.iter().find(|&&g| g >= self.gates.len()) {
                return Err(Error::InvalidCircuit(format!(
                    "cannot display gate {}, there are only {} gates",
                    bad,
                    self.gates.len()
                )));
            }
        }
        Ok(self.display.clone())
    }
}

impl GateDesc {
    fn build(&self, count: usize) -> Result<Gate> {
        let mut inputs = Vec::with_capacity(self.inputs.len());
        for &input in &self.inputs {
            if input < 0 {
                return Err(Error::timing(format!("input index {} is negative", input)));
            }
            if input as usize >= count {
                return Err(Error::timing(format!(
                    "input index {} refers beyond the {} gates",
                    input, count
                )));
            }
            inputs.push(input as usize);
        }
        let explicit = self.lag.is_some() || self.rise.is_some() || self.fall.is_some();
        let relative = self.delay.is_some() || self.factor.is_some();
        let ratio_or_zero = |lit: &Option<Literal>| match lit {
            Some(lit) => lit.to_ratio(),
            None => Ok(zero()),
        };
        let gate = match (explicit, relative, &self.delay, &self.factor) {
            (true, true, _, _) => {
                return Err(Error::timing(
                    "give either lag/rise/fall or delay/factor, not both",
                ))
            }
            (true, false, _, _) => {
                let lag = match self.lag {
                    Some(ref lag) => lag.to_ratio()?,
                    None => return Err(Error::timing("missing lag time")),
                };
                Gate::new(
                    inputs,
                    self.initial,
                    lag,
                    ratio_or_zero(&self.rise)?,
                    ratio_or_zero(&self.fall)?,
                    self.function,
                )?
            }
            (false, true, Some(delay), Some(factor)) => Gate::with_delay(
                inputs,
                self.initial,
                delay.to_ratio()?,
                factor.to_ratio()?,
                self.function,
            )?,
            (false, true, _, _) => {
                return Err(Error::timing("delay and factor must be given together"))
            }
            (false, false, _, _) => return Err(Error::timing("missing timing")),
        };
        Ok(match self.label {
            Some(ref label) => gate.labeled(label.clone()),
            None => gate,
        })
    }
}
