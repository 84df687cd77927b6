// Copyright (c) 2017-2021 Fabian Schuiki

//! The gatewave simulator driver

#![deny(missing_docs)]

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use anyhow::{anyhow, bail, Context, Result};
use clap::Arg;
use gatewave::{
    ratio::parse_ratio,
    tracer::{DumpTracer, Tracer},
    Circuit, Engine,
};
use std::{
    fs::File,
    io::{prelude::*, BufWriter},
};

fn main() -> Result<()> {
    let matches = app_from_crate!()
        .about("Simulates the analog output waveforms of a gate network.")
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help(HELP_VERBOSITY.lines().next().unwrap())
                .long_help(HELP_VERBOSITY),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("The circuit description to simulate; `-` for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Dump the waveforms into a file; stdout if omitted"),
        )
        .arg(
            Arg::with_name("until")
                .short("T")
                .long("until")
                .takes_value(true)
                .value_name("TIME")
                .help("Simulate until a time, given as integer, decimal, or fraction"),
        )
        .arg(
            Arg::with_name("num-steps")
                .short("N")
                .takes_value(true)
                .help("Perform a fixed number of steps instead of truncating"),
        )
        .arg(
            Arg::with_name("sequential")
                .short("s")
                .long("sequential")
                .help("Disable parallelization"),
        )
        .arg(
            Arg::with_name("decimal")
                .short("d")
                .long("decimal")
                .help("Annotate the dump with decimal approximations"),
        )
        .arg(
            Arg::with_name("time-passes")
                .short("t")
                .long("time")
                .help("Print execution time statistics"),
        )
        .get_matches();

    // Configure the logger.
    let verbose = std::cmp::max(1, matches.occurrences_of("verbosity") as usize) - 1;
    let quiet = !matches.is_present("verbosity");
    stderrlog::new()
        .module(module_path!())
        .module("gatewave")
        .quiet(quiet)
        .verbosity(verbose)
        .init()
        .context("failed to initialize logging")?;

    let tinit = time::precise_time_ns();

    // Load the circuit description.
    let path = matches.value_of("INPUT").unwrap();
    let circuit = {
        let mut contents = String::new();
        if path == "-" {
            std::io::stdin()
                .read_to_string(&mut contents)
                .context("failed to read input from stdin")?;
        } else {
            File::open(path)
                .and_then(|mut f| f.read_to_string(&mut contents))
                .with_context(|| format!("failed to read input from {}", path))?;
        }
        Circuit::from_json(&contents).with_context(|| format!("failed to parse {}", path))?
    };
    let gates = circuit
        .build()
        .with_context(|| format!("failed to build circuit from {}", path))?;
    info!("Loaded {} gates from {}", gates.len(), path);
    let t_load = time::precise_time_ns();

    // Determine how far to simulate.
    let until = match matches.value_of("until") {
        Some(s) => Some(parse_ratio(s).ok_or_else(|| anyhow!("`{}` is not a valid time", s))?),
        None => circuit.until()?,
    };
    let num_steps = match matches.value_of("num-steps") {
        Some(s) => Some(
            s.parse::<usize>()
                .with_context(|| format!("`{}` is not a valid step count", s))?,
        ),
        None => None,
    };

    // Create a new tracer that dumps the resulting waveforms.
    let writer: Box<dyn Write> = match matches.value_of("OUTPUT") {
        Some(out) => {
            let file = File::create(out)
                .with_context(|| format!("failed to create output at {}", out))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };
    let mut tracer = DumpTracer::new(writer).with_decimal(matches.is_present("decimal"));
    if let Some(display) = circuit.display()? {
        tracer = tracer.with_gates(display);
    }

    // Run the simulation.
    let mut engine = Engine::new(gates).parallel(!matches.is_present("sequential"));
    tracer.init(&engine).context("failed to write output")?;
    match (num_steps, until) {
        (Some(n), _) => engine.run(&mut tracer, n),
        (None, Some(until)) => engine
            .truncate_at(until)
            .context("failed to simulate circuit")?,
        (None, None) => bail!("no end time given; use `-T` or `-N`, or set `until` in the circuit"),
    }
    tracer.finish(&engine).context("failed to write output")?;
    let t_sim = time::precise_time_ns();

    if matches.is_present("time-passes") {
        eprintln!("Execution Time Statistics:");
        eprintln!("  {:10}  {:8.3} ms", "load:", (t_load - tinit) as f64 * 1.0e-6);
        eprintln!("  {:10}  {:8.3} ms", "simulate:", (t_sim - t_load) as f64 * 1.0e-6);
        eprintln!("  {:10}  {:8}", "steps:", engine.steps());
        eprintln!("  {:10}  {}", "frontier:", engine.get_time());
    }
    info!("Used {} rayon worker threads", rayon::current_num_threads());

    Ok(())
}

static HELP_VERBOSITY: &str = "Increase message verbosity

This option can be specified multiple times to increase the level of verbosity \
in the output:

-v      Only print errors
-vv     Also print warnings
-vvv    Also print info messages
-vvvv   Also print debug messages
-vvvvv  Also print detailed tracing messages
";
