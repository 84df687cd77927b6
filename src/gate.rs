// Copyright (c) 2017-2021 Fabian Schuiki

//! Gate definitions
//!
//! A gate is the immutable description of one node in the simulated network:
//! which gates feed it, what it computes from them, and how quickly its output
//! responds.

use crate::{
    error::{Error, Result},
    ratio::Ratio,
};
use num::traits::*;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A combinational function evaluated over a gate's ordered inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    /// Pass the single input through.
    Copy,
    /// Invert the single input.
    Not,
    /// True if all inputs are true.
    And,
    /// True if any input is true.
    Or,
    /// True if an odd number of inputs are true.
    Xor,
    /// Inverted `And`.
    Nand,
    /// Inverted `Or`.
    Nor,
    /// Inverted `Xor`.
    Xnor,
}

impl Logic {
    /// The number of inputs this function requires, if it is fixed.
    pub fn arity(self) -> Option<usize> {
        match self {
            Logic::Copy | Logic::Not => Some(1),
            _ => None,
        }
    }

    /// Evaluate the function over a list of input values.
    ///
    /// Panics if the function has a fixed arity that `inputs` does not match.
    pub fn evaluate(self, inputs: &[bool]) -> bool {
        if let Some(arity) = self.arity() {
            assert_eq!(inputs.len(), arity, "`{}` takes {} input(s)", self, arity);
        }
        let all = || inputs.iter().all(|&b| b);
        let any = || inputs.iter().any(|&b| b);
        let odd = || inputs.iter().fold(false, |acc, &b| acc ^ b);
        match self {
            Logic::Copy => inputs[0],
            Logic::Not => !inputs[0],
            Logic::And => all(),
            Logic::Or => any(),
            Logic::Xor => odd(),
            Logic::Nand => !all(),
            Logic::Nor => !any(),
            Logic::Xnor => !odd(),
        }
    }
}

impl Display for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Logic::Copy => "copy",
            Logic::Not => "not",
            Logic::And => "and",
            Logic::Or => "or",
            Logic::Xor => "xor",
            Logic::Nand => "nand",
            Logic::Nor => "nor",
            Logic::Xnor => "xnor",
        };
        write!(f, "{}", name)
    }
}

/// A logic gate with finite lag and slew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    inputs: Vec<usize>,
    initial_value: bool,
    lag_time: Ratio,
    rise_time: Ratio,
    fall_time: Ratio,
    function: Logic,
    label: Option<String>,
}

impl Gate {
    /// Create a new gate from explicit lag, rise, and fall times.
    ///
    /// The lag must be strictly positive and the rise and fall times must not
    /// be negative, or `InvalidTiming` is returned. A gate without inputs, or
    /// with a number of inputs `function` does not accept, is an
    /// `InvalidCircuit`.
    pub fn new(
        inputs: Vec<usize>,
        initial_value: bool,
        lag_time: Ratio,
        rise_time: Ratio,
        fall_time: Ratio,
        function: Logic,
    ) -> Result<Gate> {
        if !lag_time.is_positive() {
            return Err(Error::timing(format!(
                "lag time must be positive, got {}",
                lag_time
            )));
        }
        if rise_time.is_negative() {
            return Err(Error::timing(format!(
                "rise time must not be negative, got {}",
                rise_time
            )));
        }
        if fall_time.is_negative() {
            return Err(Error::timing(format!(
                "fall time must not be negative, got {}",
                fall_time
            )));
        }
        if inputs.is_empty() {
            return Err(Error::InvalidCircuit(
                "gate needs at least one input".to_string(),
            ));
        }
        if let Some(arity) = function.arity() {
            if inputs.len() != arity {
                return Err(Error::InvalidCircuit(format!(
                    "`{}` takes {} input(s), got {}",
                    function,
                    arity,
                    inputs.len()
                )));
            }
        }
        Ok(Gate {
            inputs,
            initial_value,
            lag_time,
            rise_time,
            fall_time,
            function,
            label: None,
        })
    }

    /// Create a new gate from a propagation delay and a transition factor.
    ///
    /// The transition takes `delay * factor` in both directions, and the lag
    /// is chosen such that the nominal `delay` falls on the midpoint of the
    /// ramp.
    pub fn with_delay(
        inputs: Vec<usize>,
        initial_value: bool,
        delay: Ratio,
        factor: Ratio,
        function: Logic,
    ) -> Result<Gate> {
        if !delay.is_positive() || !factor.is_positive() {
            return Err(Error::timing(format!(
                "delay and transition factor must be positive, got {} and {}",
                delay, factor
            )));
        }
        let transition_time = &delay * factor;
        let lag_time = delay - &transition_time / Ratio::from_integer(2.into());
        Gate::new(
            inputs,
            initial_value,
            lag_time,
            transition_time.clone(),
            transition_time,
            function,
        )
    }

    /// Attach a human-readable label to the gate.
    pub fn labeled(mut self, label: impl Into<String>) -> Gate {
        self.label = Some(label.into());
        self
    }

    /// The gates feeding this gate, in argument order.
    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    /// The output value at time zero.
    pub fn initial_value(&self) -> bool {
        self.initial_value
    }

    /// The minimum time between an input change and an output response.
    pub fn lag_time(&self) -> &Ratio {
        &self.lag_time
    }

    /// The time a full ramp from low to high takes.
    pub fn rise_time(&self) -> &Ratio {
        &self.rise_time
    }

    /// The time a full ramp from high to low takes.
    pub fn fall_time(&self) -> &Ratio {
        &self.fall_time
    }

    /// The combinational function of the gate.
    pub fn function(&self) -> Logic {
        self.function
    }

    /// The label of the gate, if one was given.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Evaluate the gate's function over its input values.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        self.function.evaluate(inputs)
    }
}
