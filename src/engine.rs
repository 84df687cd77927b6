// Copyright (c) 2017-2021 Fabian Schuiki

//! Waveform simulation engine
//!
//! The engine advances the output paths of all gates together. Every path is
//! known up to its last vertex; the smallest of these end times is the
//! *frontier*, up to which the whole network is causally determined. Each
//! step extends the paths that end exactly at the frontier by reading their
//! inputs one lag time in the past, which always lies strictly behind the
//! frontier.

use crate::{
    error::{Error, Result},
    gate::Gate,
    path::{Path, Point, Reading},
    ratio::{level, zero, Ratio},
    tracer::Tracer,
};
use num::traits::*;
use rayon::prelude::*;

/// The simulation engine for a network of gates.
pub struct Engine {
    gates: Vec<Gate>,
    paths: Vec<Path>,
    parallelize: bool,
    steps: usize,
}

impl Engine {
    /// Create a new engine for a network of gates.
    ///
    /// Every gate's output starts out flat at its initial value until its lag
    /// time has passed. Panics if `gates` is empty or a gate refers to an
    /// input beyond the end of `gates`.
    pub fn new(gates: Vec<Gate>) -> Engine {
        assert!(!gates.is_empty(), "cannot simulate an empty network");
        for (index, gate) in gates.iter().enumerate() {
            for &input in gate.inputs() {
                assert!(
                    input < gates.len(),
                    "gate {} reads from gate {}, but there are only {} gates",
                    index,
                    input,
                    gates.len()
                );
            }
        }
        let paths = gates
            .iter()
            .map(|gate| Path::new(gate.initial_value(), gate.lag_time().clone()))
            .collect();
        Engine {
            gates,
            paths,
            parallelize: false,
            steps: 0,
        }
    }

    /// Enable or disable computing the gates of one step in parallel.
    pub fn set_parallel(&mut self, parallelize: bool) {
        self.parallelize = parallelize;
    }

    /// Builder-style variant of `set_parallel`.
    pub fn parallel(mut self, parallelize: bool) -> Engine {
        self.set_parallel(parallelize);
        self
    }

    /// The gates being simulated.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// The number of gates being simulated.
    pub fn get_size(&self) -> usize {
        self.gates.len()
    }

    /// The frontier, up to which all paths are known.
    pub fn get_time(&self) -> Ratio {
        self.paths
            .iter()
            .map(|path| path.last_time())
            .min()
            .cloned()
            .unwrap_or_else(zero)
    }

    /// The vertices of a gate's output path.
    pub fn get_path(&self, gate: usize) -> &[Point] {
        self.paths[gate].points()
    }

    /// The number of steps performed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// A human-readable name for a gate: its label, or its index.
    pub fn gate_name(&self, gate: usize) -> String {
        match self.gates[gate].label() {
            Some(label) => label.to_string(),
            None => format!("g{}", gate),
        }
    }

    /// Perform a fixed number of steps, reporting each to a tracer.
    pub fn run(&mut self, tracer: &mut dyn Tracer, steps: usize) {
        for _ in 0..steps {
            self.step();
            tracer.step(self);
        }
    }

    /// Extend every path that ends at the frontier by its next segment.
    ///
    /// Gates are processed in index order, each seeing the segments appended
    /// by the gates before it. In parallel mode all segments are computed
    /// from the paths as they were before the step, and appended afterwards.
    pub fn step(&mut self) {
        let time = self.get_time();
        self.steps += 1;
        debug!("Step {} at {}", self.steps, time);
        let ready: Vec<usize> = (0..self.paths.len())
            .filter(|&g| self.paths[g].last_time() == &time)
            .collect();
        if self.parallelize {
            let segments: Vec<_> = ready
                .par_iter()
                .map(|&g| (g, self.next_segment(g, &time)))
                .collect();
            for (g, points) in segments {
                self.append(g, points);
            }
        } else {
            for g in ready {
                let points = self.next_segment(g, &time);
                self.append(g, points);
            }
        }
    }

    /// Simulate until `time` and clip all paths to end exactly there.
    ///
    /// Fails without touching the simulation if `time` lies before the lag
    /// time of any gate. Truncating again at a later time resumes the
    /// simulation from the clipped paths.
    pub fn truncate_at(&mut self, time: Ratio) -> Result<()> {
        let floor = self
            .gates
            .iter()
            .map(|gate| gate.lag_time())
            .max()
            .cloned()
            .unwrap_or_else(zero);
        if time < floor {
            return Err(Error::InvalidTruncation { time, floor });
        }
        while self.get_time() < time {
            self.step();
        }
        for path in &mut self.paths {
            path.truncate(&time);
        }
        info!(
            "Truncated {} paths at {} after {} steps",
            self.paths.len(),
            time,
            self.steps
        );
        Ok(())
    }

    fn append(&mut self, g: usize, points: Vec<Point>) {
        for (t, v) in &points {
            trace!("{} += ({}, {})", self.gate_name(g), t, v);
        }
        self.paths[g].append(points);
    }

    /// Compute the next segment of gate `g`, whose path ends at `time`.
    fn next_segment(&self, g: usize, time: &Ratio) -> Vec<Point> {
        let gate = &self.gates[g];
        let (output_t, target) = self.compute_output_segment(gate, time);
        let current = self.paths[g].last_value();
        debug!(
            "{} targets {} from {} until {}",
            self.gate_name(g),
            target,
            time,
            output_t
        );
        let target_v = level(target);
        if &target_v == current {
            return vec![(output_t, target_v)];
        }
        let (distance, slew) = if target {
            (&target_v - current, gate.rise_time())
        } else {
            (current - &target_v, gate.fall_time())
        };

        // Ramp towards the target at a constant rate. If the rail is not
        // reached before `output_t`, the segment ends mid-ramp.
        if !slew.is_zero() {
            let travel = (&output_t - time) / slew;
            if travel <= distance {
                let end_v = if target {
                    current + travel
                } else {
                    current - travel
                };
                return vec![(output_t, end_v)];
            }
        }
        let rail_t = time + distance * slew;
        vec![(rail_t, target_v.clone()), (output_t, target_v)]
    }

    /// Determine the target output of `gate` at `time`, and until when it
    /// holds.
    ///
    /// Returns `(t, b)` such that the gate's inputs, read one lag time in the
    /// past, consistently ask for output `b` from `time` until `t`.
    fn compute_output_segment(&self, gate: &Gate, time: &Ratio) -> (Ratio, bool) {
        let t0 = time - gate.lag_time();
        let mut horizon: Option<Ratio> = None;
        let mut values = Vec::with_capacity(gate.inputs().len());
        for &input in gate.inputs() {
            let (t, b) = self.compute_input_segment(input, &t0);
            values.push(b);
            horizon = Some(match horizon {
                Some(h) if h <= t => h,
                _ => t,
            });
        }
        let horizon = match horizon {
            Some(h) => h,
            None => panic!("gate without inputs"),
        };
        (horizon + gate.lag_time(), gate.evaluate(&values))
    }

    /// Determine how long gate `g` reads as the same logic value from `t0`.
    ///
    /// Returns `(t, b)` such that the output of `g` reads as `b` from `t0`
    /// until `t`, where `t` is the earliest time the reading changes or the
    /// end of the known path. Panics if the path does not reach past `t0`.
    fn compute_input_segment(&self, g: usize, t0: &Ratio) -> (Ratio, bool) {
        let path = &self.paths[g];
        let first = path.segment_at(t0);
        let mut t = t0.clone();
        let mut b = None;

        for (start, end) in path.segments().skip(first) {
            let reading = Reading::of(start, end);
            match reading.crossing() {
                Some(crossing) if t0 >= crossing => {
                    b = Some(reading.end());
                    t = end.0.clone();
                }
                crossing => {
                    if &start.0 > t0 && b != Some(reading.start()) {
                        break;
                    }
                    b = Some(reading.start());
                    match crossing {
                        Some(crossing) => {
                            t = crossing.clone();
                            break;
                        }
                        None => t = end.0.clone(),
                    }
                }
            }
        }

        match b {
            Some(b) if &t > t0 => (t, b),
            _ => panic!(
                "{} has no stable reading at {} (path ends at {})",
                self.gate_name(g),
                t0,
                path.last_time()
            ),
        }
    }
}
