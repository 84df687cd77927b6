// Copyright (c) 2017-2021 Fabian Schuiki

//! Exact timing simulation of logic gates with finite lag and slew. This
//! library computes the piecewise-linear output waveform of every gate in a
//! network, with all transition times and levels kept as exact rationals.

#[macro_use]
extern crate log;

pub mod circuit;
pub mod engine;
mod error;
pub mod gate;
pub mod path;
pub mod ratio;
pub mod tracer;

pub use crate::{
    circuit::Circuit,
    engine::Engine,
    error::*,
    gate::{Gate, Logic},
    path::{Path, Point},
    ratio::Ratio,
};
