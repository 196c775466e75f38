//! Binary that reads graph commands (or a `.gr` graph), computes a minimum vertex cover by SAT and
//! the two greedy covers, and writes them to standard out.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use sat_cover::{
    cnf::ClauseSet,
    commands::{read_commands, write_commands},
    config::{SolveConfig, DEFAULT_TIMEOUT},
    exact_search::MinimumCoverSearch,
    generate::random_graph,
    graph::UGraph,
    oracle::OracleKind,
    session::{compute_report, Session},
};

#[derive(Parser)]
#[command(name = "cover")]
#[command(author, version, about = "Minimum vertex covers by SAT, compared with greedy approximations", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute covers for every edge batch of the input (default)
    Solve(SolveArgs),
    /// Write the CNF encoding for one cover size in DIMACS format
    Encode(EncodeArgs),
    /// Print a random graph as commands
    Generate(GenerateArgs),
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
enum InputFormat {
    /// `V <n>` / `E {<a,b>,...}` lines
    Commands,
    /// PACE `.gr` graph
    Gr,
}

#[derive(Args)]
struct SolveArgs {
    /// Input file, standard in if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = InputFormat::Commands)]
    format: InputFormat,

    /// Seconds per SAT attempt, 0 for no limit
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    #[arg(long, value_enum, default_value_t = OracleKind::Varisat)]
    oracle: OracleKind,

    /// Append covers and execution times to this file
    #[arg(long)]
    record: Option<PathBuf>,
}

impl Default for SolveArgs {
    fn default() -> Self {
        SolveArgs {
            input: None,
            format: InputFormat::Commands,
            timeout: DEFAULT_TIMEOUT.as_secs(),
            oracle: OracleKind::default(),
            record: None,
        }
    }
}

#[derive(Args)]
struct EncodeArgs {
    /// Input file, standard in if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = InputFormat::Commands)]
    format: InputFormat,

    /// Cover size to encode
    #[arg(short)]
    k: usize,

    /// Output file, standard out if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    vertices: usize,

    #[arg(long)]
    edges: usize,

    /// Seed for reproducible graphs
    #[arg(long)]
    seed: Option<u64>,
}

fn open_input(input: &Option<PathBuf>) -> anyhow::Result<Box<dyn BufRead>> {
    match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        },
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn read_graph(input: &Option<PathBuf>, format: InputFormat) -> anyhow::Result<UGraph> {
    let reader = open_input(input)?;
    let graph = match format {
        InputFormat::Commands => read_commands(reader)?,
        InputFormat::Gr => UGraph::read_gr(reader)?,
    };
    Ok(graph)
}

fn solve(args: SolveArgs) -> anyhow::Result<()> {
    let config = SolveConfig::default()
        .with_timeout_secs(args.timeout)
        .with_oracle(args.oracle)
        .with_record(args.record.clone());
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    match args.format {
        InputFormat::Commands => {
            let mut session = Session::new(&config)?;
            session.run(open_input(&args.input)?, &mut stdout)?;
        },
        InputFormat::Gr => {
            let graph = read_graph(&args.input, args.format)?;
            let search = MinimumCoverSearch::from_config(&config);
            for line in compute_report(&graph, &search) {
                tracing::info!("{} took {:?}", line.algorithm.label(), line.elapsed);
                writeln!(stdout, "{}", line)?;
            }
        },
    }
    Ok(())
}

fn encode(args: EncodeArgs) -> anyhow::Result<()> {
    let graph = read_graph(&args.input, args.format)?;
    let clauses = ClauseSet::encode(&graph, args.k);
    tracing::info!("{} variables, {} clauses", clauses.num_vars(), clauses.num_clauses());
    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            clauses.write_dimacs(io::BufWriter::new(file))?;
        },
        None => clauses.write_dimacs(io::stdout().lock())?,
    }
    Ok(())
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let graph = random_graph(args.vertices, args.edges, &mut rng);
    write_commands(&graph, io::stdout().lock())?;
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    match cli.command.unwrap_or_else(|| Commands::Solve(SolveArgs::default())) {
        Commands::Solve(args) => solve(args),
        Commands::Encode(args) => encode(args),
        Commands::Generate(args) => generate(args),
    }
}
