//! Automaton inspection: validation, step-by-step simulation and DOT export.
//!
//! Run with:
//!   cargo run --example automaton -- --file dfa.json ab abab a
//!   cargo run --example automaton -- --file dfa.json --dot dfa.dot
//!   dot -Tpng dfa.dot -o dfa.png
//!
//! Without a file, a built-in ε-NFA for `a*b` is used.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::eyre;

use pumping_rs::automaton::{AutomatonDescription, AutomatonSpec};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Automaton JSON file.
    #[arg(long, short, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Input strings to simulate.
    #[arg(value_name = "STRING")]
    inputs: Vec<String>,

    /// Write the automaton in GraphViz DOT format.
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Print the description back as JSON.
    #[arg(long)]
    json: bool,
}

fn builtin() -> AutomatonDescription {
    AutomatonDescription::new("q0")
        .state("q1")
        .state("q2")
        .accept("q2")
        .transition("q0", "eps", "q1")
        .transition("q1", "a", "q0")
        .transition("q1", "b", "q2")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let desc = match &args.file {
        Some(path) => AutomatonDescription::from_json(&fs::read_to_string(path)?)
            .map_err(|errors| eyre!("invalid automaton:\n{}", errors))?,
        None => builtin(),
    };
    if args.json {
        println!("{}", desc.to_json()?);
    }

    let spec = AutomatonSpec::new(&desc).map_err(|errors| eyre!("invalid automaton:\n{}", errors))?;
    println!(
        "states = {}, deterministic = {}, epsilon = {}, alphabet = {:?}",
        spec.num_states(),
        spec.is_deterministic(),
        spec.has_epsilon(),
        spec.alphabet()
    );

    for input in &args.inputs {
        println!("----------------------------------");
        println!("input = {:?}", input);
        let trace = spec.trace(input);
        for (k, set) in trace.iter().enumerate() {
            let names: Vec<&str> = set.iter().map(|q| spec.state_name(q)).collect();
            let consumed: String = input.chars().take(k).collect();
            println!("  after {:?}: {{{}}}", consumed, names.join(", "));
        }
        println!("  accepted = {}", spec.simulate(input));
    }

    if let Some(path) = &args.dot {
        fs::write(path, spec.to_dot()?)?;
        println!("DOT written to {}", path.display());
    }

    Ok(())
}
