// Copyright (c) 2017-2021 Fabian Schuiki

//! Consumers of the simulated waveforms.

use crate::engine::Engine;
use std::io::Result;

/// A simulation tracer that can operate on the waveforms as they are being
/// generated.
pub trait Tracer {
    /// Called once before the first step.
    fn init(&mut self, engine: &Engine) -> Result<()>;

    /// Called by the engine after each step it is asked to run.
    fn step(&mut self, _engine: &Engine) {}

    /// Called once when the simulation is done.
    fn finish(&mut self, engine: &Engine) -> Result<()>;
}

/// A null tracer that does nothing.
pub struct NullTracer;

impl Tracer for NullTracer {
    fn init(&mut self, _: &Engine) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, _: &Engine) -> Result<()> {
        Ok(())
    }
}

mod dump;
pub use dump::*;
