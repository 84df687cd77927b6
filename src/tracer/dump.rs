// Copyright (c) 2017-2021 Fabian Schuiki

//! A simple tracer for debugging, regression testing, and rendering.

use crate::{engine::Engine, ratio::Decimal, tracer::Tracer};
use std::io::Result;

/// A tracer that emits the final waveforms as a human-readable point dump.
///
/// Each gate is introduced by its name on a line of its own, followed by one
/// indented `t v` line per vertex of its path, in exact rational notation.
/// Optionally each line also carries the decimal approximation as a comment.
pub struct DumpTracer<T> {
    writer: T,
    decimal: bool,
    only: Option<Vec<usize>>,
}

impl<T> DumpTracer<T>
where
    T: std::io::Write,
{
    /// Create a new dump tracer which will write its dump to `writer`.
    pub fn new(writer: T) -> Self {
        DumpTracer {
            writer,
            decimal: false,
            only: None,
        }
    }

    /// Also emit decimal approximations of each vertex.
    pub fn with_decimal(mut self, decimal: bool) -> Self {
        self.decimal = decimal;
        self
    }

    /// Only dump the given gates, in the given order.
    pub fn with_gates(mut self, gates: Vec<usize>) -> Self {
        self.only = Some(gates);
        self
    }

    /// Consume the tracer and return the underlying writer.
    pub fn into_inner(self) -> T {
        self.writer
    }

    fn write_gate(&mut self, engine: &Engine, gate: usize) -> Result<()> {
        writeln!(self.writer, "{}:", engine.gate_name(gate))?;
        for (t, v) in engine.get_path(gate) {
            write!(self.writer, "  {} {}", t, v)?;
            if self.decimal {
                write!(self.writer, "  # {} {}", Decimal(t), Decimal(v))?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

impl<T> Tracer for DumpTracer<T>
where
    T: std::io::Write,
{
    fn init(&mut self, engine: &Engine) -> Result<()> {
        writeln!(self.writer, "# {} gates", engine.get_size())
    }

    fn finish(&mut self, engine: &Engine) -> Result<()> {
        writeln!(self.writer, "# until {}", engine.get_time())?;
        let gates = match self.only {
            Some(ref only) => only.clone(),
            None => (0..engine.get_size()).collect(),
        };
        for gate in gates {
            self.write_gate(engine, gate)?;
        }
        self.writer.flush()
    }
}
