//! Pumping-lemma contradiction search from the command line.
//!
//! Run with:
//!   cargo run --example pump -- --template anbn aabb
//!   cargo run --example pump -- --regex 'a*' aaaa -p 4
//!   cargo run --example pump -- --automaton dfa.json abab
//!   cargo run --example pump -- --script lang.rhai aabb -p 2 --faults abort

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser, ValueEnum};
use color_eyre::eyre::eyre;

use pumping_rs::decomposition::decomposition_count;
use pumping_rs::oracle::{build_oracle_with_config, LanguageDescription, Membership, MembershipOracle, OracleConfig};
use pumping_rs::script::templates;
use pumping_rs::search::{ContradictionSearch, FaultPolicy, SearchConfig};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Template {
    Anbn,
    Anbncn,
    Abab,
    Emoji,
}

impl Template {
    fn source(self) -> &'static str {
        match self {
            Template::Anbn => templates::AN_BN,
            Template::Anbncn => templates::AN_BN_CN,
            Template::Abab => templates::AB_STAR,
            Template::Emoji => templates::EMOJI,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Faults {
    Inconclusive,
    Reject,
    Abort,
}

impl From<Faults> for FaultPolicy {
    fn from(value: Faults) -> Self {
        match value {
            Faults::Inconclusive => FaultPolicy::Inconclusive,
            Faults::Reject => FaultPolicy::CountAsRejection,
            Faults::Abort => FaultPolicy::Abort,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version)]
#[command(group(ArgGroup::new("language").required(true).args(["regex", "automaton", "script", "template"])))]
struct Cli {
    /// Candidate string `s`.
    #[arg(value_name = "STRING")]
    s: String,

    /// Pumping length (defaults to the automaton's suggestion, or |s|).
    #[arg(short = 'p', long = "pumping-length", value_name = "INT")]
    p: Option<usize>,

    /// Language as a full-match regular expression.
    #[arg(long, value_name = "PATTERN")]
    regex: Option<String>,

    /// Language as an automaton JSON file.
    #[arg(long, value_name = "FILE")]
    automaton: Option<PathBuf>,

    /// Language as a rhai predicate file.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Language as a built-in predicate template.
    #[arg(long, value_enum)]
    template: Option<Template>,

    /// Pump counts to try, in order.
    #[arg(long, value_name = "INT", value_delimiter = ',', default_value = "0,2,3")]
    pump_counts: Vec<usize>,

    /// How to treat predicate errors and timeouts.
    #[arg(long, value_enum, default_value = "inconclusive")]
    faults: Faults,

    /// Time budget per predicate call, in milliseconds.
    #[arg(long, value_name = "MS", default_value = "300")]
    timeout: u64,

    /// Refuse to search when `s` itself is not in the language.
    #[arg(long)]
    check_candidate: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let description = if let Some(pattern) = &args.regex {
        LanguageDescription::Regex(pattern.clone())
    } else if let Some(path) = &args.automaton {
        LanguageDescription::AutomatonJson(fs::read_to_string(path)?)
    } else if let Some(path) = &args.script {
        LanguageDescription::Custom(fs::read_to_string(path)?)
    } else if let Some(template) = args.template {
        LanguageDescription::Custom(template.source().to_string())
    } else {
        return Err(eyre!("no language given"));
    };

    let config = OracleConfig {
        timeout: Duration::from_millis(args.timeout),
    };
    let oracle = build_oracle_with_config(&description, &config)?;
    let meta = oracle.meta();
    println!("{}", meta);
    match &oracle {
        MembershipOracle::Automaton(automaton) => println!("alphabet = {:?}", automaton.spec().alphabet()),
        MembershipOracle::Custom(custom) => println!("timeout = {:?}", custom.timeout()),
        MembershipOracle::Regex(_) => {}
    }

    let p = args
        .p
        .or_else(|| meta.suggested_pumping_length())
        .unwrap_or_else(|| args.s.chars().count());
    println!(
        "s = {:?}, p = {}, decompositions = {}",
        args.s,
        p,
        decomposition_count(args.s.chars().count(), p)
    );

    let search = ContradictionSearch::new(&oracle).with_config(SearchConfig {
        pump_counts: args.pump_counts.clone(),
        fault_policy: args.faults.into(),
        check_candidate: args.check_candidate,
    });
    let outcome = search.run(&args.s, p);
    println!("{}", outcome);
    if outcome.proof().is_none() {
        println!("trials = {}", outcome.trials());
    }

    let time_total = time_total.elapsed();
    println!("\nAll done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
