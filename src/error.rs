// Copyright (c) 2017-2021 Fabian Schuiki

//! Errors reported to users of the simulator.
//!
//! Only configuration and usage mistakes are reported as errors. Violations
//! of the engine's internal invariants are bugs and panic instead.

use crate::ratio::Ratio;
use std::fmt::Display;

/// An error raised while building or driving a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A gate was configured with impossible timing, or reads from a
    /// negative input index.
    InvalidTiming {
        /// The index or label of the offending gate, if known.
        gate: Option<String>,
        /// What is wrong with it.
        message: String,
    },
    /// Truncation was requested before every gate could have settled.
    InvalidTruncation {
        /// The requested end time.
        time: Ratio,
        /// The earliest admissible end time, the largest lag of any gate.
        floor: Ratio,
    },
    /// A circuit description could not be understood, or a gate is wired to
    /// a number of inputs its function does not accept.
    InvalidCircuit(String),
}

impl Error {
    pub(crate) fn timing(message: impl Into<String>) -> Self {
        Error::InvalidTiming {
            gate: None,
            message: message.into(),
        }
    }

    /// Attach the name of the offending gate to a timing or wiring error.
    pub(crate) fn in_gate(self, gate: impl Into<String>) -> Self {
        match self {
            Error::InvalidTiming { gate: None, message } => Error::InvalidTiming {
                gate: Some(gate.into()),
                message,
            },
            Error::InvalidCircuit(message) => {
                Error::InvalidCircuit(format!("gate {}: {}", gate.into(), message))
            }
            other => other,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidTiming { gate, message } => {
                write!(f, "invalid timing")?;
                if let Some(gate) = gate {
                    write!(f, " in gate {}", gate)?;
                }
                write!(f, ": {}", message)
            }
            Error::InvalidTruncation { time, floor } => write!(
                f,
                "cannot truncate at {}; every gate needs until {} to settle",
                time, floor
            ),
            Error::InvalidCircuit(message) => write!(f, "invalid circuit: {}", message),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` for simulator operations.
pub type Result<T> = std::result::Result<T, Error>;
