//! foobc CLI - compiles FOOBAR programs to native executables.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use foobc_drv::{compile, Artifacts, Config};
use foobc_util::Handler;

/// FOOBAR compiler - transpiles .foob files to native executables.
#[derive(Parser, Debug)]
#[command(name = "foobc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "FOOBAR compiler - transpiles .foob files to native executables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a .foob program to a native executable
    Compile(CompileCommand),
}

/// Arguments for the compile subcommand.
#[derive(Args, Debug)]
struct CompileCommand {
    /// Input .foob file
    input: PathBuf,

    /// Output executable name (default: input path without its suffix)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep the generated C file
    #[arg(long = "keep-c")]
    keep_c: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile(args) => {
            init_tracing(args.verbose);

            let config = Config {
                input: args.input,
                output: args.output,
                keep_c: args.keep_c,
                verbose: args.verbose,
            };

            let handler = Handler::new();
            match run_compile(&config, &handler) {
                Ok(artifacts) => {
                    println!(
                        "✓ Successfully compiled to {}",
                        artifacts.executable.display()
                    );
                    ExitCode::SUCCESS
                },
                Err(err) => {
                    handler.print_to_stderr();
                    eprintln!("error: {:#}", err);
                    ExitCode::FAILURE
                },
            }
        },
    }
}

fn run_compile(config: &Config, handler: &Handler) -> anyhow::Result<Artifacts> {
    compile(config, handler)
        .with_context(|| format!("failed to compile {}", config.input.display()))
}

/// Installs the tracing subscriber; `--verbose` raises the default level
/// to `info`, and `RUST_LOG` overrides everything.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
