//! matbench - dense matrix multiplication benchmarks.
//!
//! ## Commands
//!
//! - `matbench dot [ROWS] [COLS]` - time A * B (COLS defaults to ROWS)
//! - `matbench atb [ROWS] [COLS]` - time transpose(A) * B
//! - `matbench xtx [ROWS] [COLS]` - time transpose(X) * X
//! - `matbench vector [LEN]` - time fill, sum and norm of a random vector

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mb_bench::{
    BenchConfig, BenchError, MatrixBenchmarkRunner, OperationKind, DEFAULT_VECTOR_LEN,
};
use mb_tensor::{BackendKind, MatrixSpec};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Times a single dense matrix product on random data
#[derive(Parser, Debug)]
#[command(name = "matbench")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed for matrix generation (random when omitted)
    #[arg(long, global = true, env = "MATBENCH_SEED")]
    seed: Option<u64>,

    /// Compute backend: cpu (reference loops) or gemm (blocked kernel)
    #[arg(
        long,
        global = true,
        env = "MATBENCH_BACKEND",
        default_value_t = BackendKind::default()
    )]
    backend: BackendKind,

    /// Print the result as JSON instead of a sentence
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// A * B for two random matrices of one shape (default 10 x 10)
    Dot {
        /// Rows of A and B
        rows: Option<usize>,

        /// Columns of A and B (defaults to ROWS)
        cols: Option<usize>,

        /// Shape of A and B as ROWSxCOLS
        #[arg(long, conflicts_with_all = ["rows", "cols"])]
        shape: Option<String>,
    },

    /// transpose(A) * B for random A and B (default 6000 x 4000 each)
    Atb {
        /// Rows of A, the shared contraction dimension
        rows: Option<usize>,

        /// Columns of A
        cols: Option<usize>,

        /// Shape of A as ROWSxCOLS
        #[arg(long, conflicts_with_all = ["rows", "cols"])]
        shape: Option<String>,

        /// Rows of B (defaults to the rows of A)
        #[arg(long)]
        b_rows: Option<usize>,

        /// Columns of B (defaults to the columns of A)
        #[arg(long)]
        b_cols: Option<usize>,

        /// Shape of B as ROWSxCOLS
        #[arg(long, conflicts_with_all = ["b_rows", "b_cols"])]
        b_shape: Option<String>,
    },

    /// transpose(X) * X for a random X (default 1000 x 10000)
    Xtx {
        /// Rows of X
        rows: Option<usize>,

        /// Columns of X, the side of the result
        cols: Option<usize>,

        /// Shape of X as ROWSxCOLS
        #[arg(long, conflicts_with_all = ["rows", "cols"])]
        shape: Option<String>,
    },

    /// Fill, sum and norm of a random vector (default 10000000 elements)
    Vector {
        /// Number of elements
        len: Option<usize>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Bench(#[from] BenchError),
    #[error("cannot serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Bench(BenchError::ShapeMismatch { .. }) => 2,
            CliError::Bench(BenchError::Allocation { .. }) => 3,
            CliError::Json(_) => 1,
        }
    }
}

/// What a subcommand asks the runner to do.
#[derive(Debug, PartialEq)]
enum Request {
    Matrix(OperationKind, Vec<MatrixSpec>),
    Vector(usize),
}

/// Builds a shape from either `ROWSxCOLS` text or separate dimensions,
/// falling back to `default` for anything missing.
///
/// Zero dimensions and malformed text surface as `ShapeMismatchError`.
fn shape_arg(
    text: Option<&str>,
    rows: Option<usize>,
    cols: Option<usize>,
    default: MatrixSpec,
) -> Result<MatrixSpec, BenchError> {
    let spec = match text {
        Some(text) => text.parse::<MatrixSpec>()?,
        None => MatrixSpec::new(
            rows.unwrap_or(default.rows()),
            cols.unwrap_or(default.cols()),
        )?,
    };
    Ok(spec)
}

/// Fills missing dimensions from the operation's named defaults.
fn resolve(command: &Commands) -> Result<Request, BenchError> {
    let request = match command {
        Commands::Dot { rows, cols, shape } => {
            let op = OperationKind::DotProduct;
            let default = op.default_inputs()?[0];
            // A lone ROWS means a square matrix.
            let cols = cols.or(*rows);
            let spec = shape_arg(shape.as_deref(), *rows, cols, default)?;
            Request::Matrix(op, vec![spec])
        }
        Commands::Atb {
            rows,
            cols,
            shape,
            b_rows,
            b_cols,
            b_shape,
        } => {
            let op = OperationKind::TransposeMultiplyAb;
            let default = op.default_inputs()?[0];
            let a = shape_arg(shape.as_deref(), *rows, *cols, default)?;
            let b = shape_arg(b_shape.as_deref(), *b_rows, *b_cols, a)?;
            Request::Matrix(op, vec![a, b])
        }
        Commands::Xtx { rows, cols, shape } => {
            let op = OperationKind::TransposeMultiplyXx;
            let default = op.default_inputs()?[0];
            let x = shape_arg(shape.as_deref(), *rows, *cols, default)?;
            Request::Matrix(op, vec![x])
        }
        Commands::Vector { len } => Request::Vector(len.unwrap_or(DEFAULT_VECTOR_LEN)),
    };
    Ok(request)
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = BenchConfig::new()
        .with_seed(cli.seed)
        .with_backend(cli.backend);
    tracing::debug!(?config, "resolved configuration");
    let runner = MatrixBenchmarkRunner::new(config);

    let output = match resolve(&cli.command)? {
        Request::Matrix(op, inputs) => {
            let result = runner.run(op, &inputs)?;
            if cli.json {
                serde_json::to_string_pretty(&result)?
            } else {
                result.to_string()
            }
        }
        Request::Vector(len) => {
            let result = runner.run_vector(len)?;
            if cli.json {
                serde_json::to_string_pretty(&result)?
            } else {
                result.to_string()
            }
        }
    };
    Ok(output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the result.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
