use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use readsieve::*;

#[derive(Parser, Debug)]
#[command(
    name = "readsieve",
    about = "Filter sequencing reads matching adapters, homopolymer tails, ambiguous bases, or low-complexity content"
)]
struct Cli {
    /// Input file for single-end reads.
    #[arg(short = 'i', long, conflicts_with_all = ["reads1", "reads2"])]
    input: Option<PathBuf>,

    /// First input file for paired reads.
    #[arg(short = '1', long, requires = "reads2")]
    reads1: Option<PathBuf>,

    /// Second input file for paired reads.
    #[arg(short = '2', long, requires = "reads1")]
    reads2: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// File with adapter kmers, one per line.
    #[arg(short, long)]
    adapters: PathBuf,

    /// Length of polyG/polyC tails to filter (0 disables).
    #[arg(short = 'p', long = "poly-g", default_value_t = 13)]
    poly_g: usize,

    /// Minimum length cutoff (0 disables).
    #[arg(short, long, default_value_t = 50)]
    length: usize,

    /// Window size for the dust filter.
    #[arg(short = 'k', long, default_value_t = 4)]
    dust_k: usize,

    /// Cutoff by dust score (0 disables).
    #[arg(short = 'c', long, default_value_t = 0.0)]
    dust_cutoff: f64,

    /// Maximum error count in an adapter match; possible values are 0, 1, 2.
    #[arg(short, long, default_value_t = 0)]
    errors: u8,

    /// Filter reads containing ambiguous bases (N).
    #[arg(short = 'N', long)]
    filter_n: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let errors = ErrorBudget::new(cli.errors)?;
    let patterns = PatternSet::from_adapter_file(&cli.adapters, cli.filter_n, cli.poly_g)
        .with_context(|| format!("failed to load adapters from {}", cli.adapters.display()))?;
    info!(patterns = patterns.len(), "loaded pattern set");

    let automaton = Automaton::build(patterns, errors);
    let classifier = Classifier::new(automaton, cli.length, cli.dust_k, cli.dust_cutoff)?;
    let names = ClassNames::new(cli.length, cli.poly_g, cli.dust_cutoff);

    match (&cli.input, &cli.reads1, &cli.reads2) {
        (Some(input), None, None) => run_single(input, &cli.out_dir, &classifier, &names),
        (None, Some(reads1), Some(reads2)) => {
            run_paired(reads1, reads2, &cli.out_dir, &classifier, &names)
        }
        _ => bail!("specify either a single-end input (-i) or paired inputs (-1 and -2)"),
    }
}

fn run_single(
    input: &Path,
    out_dir: &Path,
    classifier: &Classifier,
    names: &ClassNames,
) -> Result<()> {
    let stem = source_stem(input);
    let mut source = FastqSource::open(input)?;
    let mut ok = FastqSink::create(output_path(out_dir, &stem, "ok"))?;
    let mut filtered = FastqSink::create(output_path(out_dir, &stem, "filtered"))?;
    let mut stats = Stats::new(input.display().to_string(), names.clone());

    filter_single(
        &mut source,
        classifier,
        names,
        &mut stats,
        &mut ok,
        &mut filtered,
    )?;
    info!(reads = stats.total(), "finished filtering");

    print!("{}", stats);
    Ok(())
}

fn run_paired(
    reads1: &Path,
    reads2: &Path,
    out_dir: &Path,
    classifier: &Classifier,
    names: &ClassNames,
) -> Result<()> {
    let stem1 = source_stem(reads1);
    let stem2 = source_stem(reads2);
    let mut source1 = FastqSource::open(reads1)?;
    let mut source2 = FastqSource::open(reads2)?;
    let mut sinks = PairedSinks {
        ok1: FastqSink::create(output_path(out_dir, &stem1, "ok"))?,
        ok2: FastqSink::create(output_path(out_dir, &stem2, "ok"))?,
        se1: FastqSink::create(output_path(out_dir, &stem1, "se"))?,
        se2: FastqSink::create(output_path(out_dir, &stem2, "se"))?,
        filtered1: FastqSink::create(output_path(out_dir, &stem1, "filtered"))?,
        filtered2: FastqSink::create(output_path(out_dir, &stem2, "filtered"))?,
    };
    let mut stats1 = Stats::new(reads1.display().to_string(), names.clone());
    let mut stats2 = Stats::new(reads2.display().to_string(), names.clone());

    filter_paired(
        &mut source1,
        &mut source2,
        classifier,
        names,
        &mut stats1,
        &mut stats2,
        &mut sinks,
    )?;
    info!(
        reads = stats1.total() + stats2.total(),
        "finished filtering"
    );

    print!("{}", stats1);
    print!("{}", stats2);
    Ok(())
}
