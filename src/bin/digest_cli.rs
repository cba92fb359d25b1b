use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use restriction_digest::{
    Analysis, AnalysisConfig, EnzymeSpec, UniqueFragment, dna_sequence::DNAsequence,
};
use serde::Serialize;
use std::{fs, path::PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "digest_cli",
    version,
    about = "Restriction digest: cut sites and fragments"
)]
struct Cli {
    /// JSON analysis configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Cut a sequence and print the unique fragments
    Cut {
        /// Sequence, or @file (FASTA header lines are skipped)
        #[arg(long)]
        sequence: String,
        /// Catalog name, or a cut pattern such as G^AATTC
        #[arg(long = "enzyme", required = true)]
        enzymes: Vec<String>,
        /// Apply every cut at once instead of considering all orderings
        #[arg(long)]
        no_permutations: bool,
    },
    /// List every recognition site found in a sequence
    Sites {
        #[arg(long)]
        sequence: String,
        #[arg(long = "enzyme", required = true)]
        enzymes: Vec<String>,
    },
    /// List the enzyme catalog
    Enzymes,
}

#[derive(Serialize)]
struct CutSummary<'a> {
    sequence_length: usize,
    fragment_count: usize,
    fragments: Vec<FragmentSummary<'a>>,
}

#[derive(Serialize)]
struct FragmentSummary<'a> {
    primary: &'a str,
    complement: &'a str,
    primary_length: usize,
    complement_length: usize,
}

#[derive(Serialize)]
struct SiteSummary {
    enzyme: String,
    offset: usize,
    forward_strand: bool,
    cuts: Vec<[Option<usize>; 2]>,
}

#[derive(Serialize)]
struct EnzymeSummary<'a> {
    name: &'a str,
    sequence: &'a str,
    cut: isize,
    overlap: isize,
    palindromic: bool,
    note: Option<&'a str>,
}

fn load_sequence_arg(value: &str) -> Result<String> {
    match value.strip_prefix('@') {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Could not read sequence file '{path}'"))?;
            Ok(text
                .lines()
                .filter(|line| !line.starts_with('>'))
                .collect::<Vec<_>>()
                .concat())
        }
        None => Ok(value.to_string()),
    }
}

fn enzyme_specs(args: &[String]) -> Vec<EnzymeSpec> {
    args.iter()
        .map(|arg| {
            if arg.contains(['^', '_']) {
                EnzymeSpec::Pattern(arg.to_string())
            } else {
                EnzymeSpec::Name(arg.to_string())
            }
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text =
        serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn fragment_summary(f: &UniqueFragment) -> FragmentSummary<'_> {
    FragmentSummary {
        primary: &f.primary,
        complement: &f.complement,
        primary_length: f.primary_stripped().len(),
        complement_length: f.complement_stripped().len(),
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let analysis = Analysis::new(config)?;

    match cli.command {
        Commands::Cut {
            sequence,
            enzymes,
            no_permutations,
        } => {
            let sequence = load_sequence_arg(&sequence)?;
            let specs = enzyme_specs(&enzymes);
            let fragments = if no_permutations {
                analysis.cut_without_permutations(&sequence, &specs)?
            } else {
                analysis.cut(&sequence, &specs)?
            };
            print_json(&CutSummary {
                sequence_length: DNAsequence::from_sequence(&sequence)?.len(),
                fragment_count: fragments.len(),
                fragments: fragments.iter().map(fragment_summary).collect(),
            })
        }
        Commands::Sites { sequence, enzymes } => {
            let seq = DNAsequence::try_from(load_sequence_arg(&sequence)?)?;
            let sites = analysis
                .find_sites(&seq, &enzyme_specs(&enzymes))?
                .into_iter()
                .map(|site| {
                    let cuts = site
                        .cut_positions()?
                        .iter()
                        .map(|pair| [pair.primary(), pair.complement()])
                        .collect();
                    Ok(SiteSummary {
                        enzyme: site.enzyme.name,
                        offset: site.offset,
                        forward_strand: site.forward_strand,
                        cuts,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&sites)
        }
        Commands::Enzymes => {
            let enzymes: Vec<EnzymeSummary> = analysis
                .enzymes()
                .restriction_enzymes()
                .iter()
                .map(|re| EnzymeSummary {
                    name: &re.name,
                    sequence: &re.sequence,
                    cut: re.cut,
                    overlap: re.overlap,
                    palindromic: re.is_palindromic(),
                    note: re.note.as_deref(),
                })
                .collect();
            print_json(&enzymes)
        }
    }
}
