use std::fs;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use pytoasm::cli::{Cli, Commands, USAGE, version_string};
use pytoasm::driver::{self, Output, RunOptions};
use pytoasm::limits::CompilerLimits;
use pytoasm::playground::Playground;

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help goes to stdout, everything else to stderr
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    if cli.version {
        println!("{}", version_string());
        return ExitCode::SUCCESS;
    }

    let limits = match CompilerLimits::load(cli.config.as_deref()) {
        Ok(limits) => limits,
        Err(e) => {
            eprintln!("PyToASM: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = RunOptions {
        color: cli.color_mode(),
        is_tty: io::stderr().is_terminal(),
        ..RunOptions::default()
    };

    let result = if cli.playground {
        let mut playground = Playground::new(&limits, options);
        playground
            .run(io::stdin().lock(), &mut io::stdout(), &mut io::stderr())
            .map(|()| true)
    } else {
        match &cli.command {
            Some(Commands::Tokens(args)) => run_file(&args.file, &limits, RunOptions {
                output: Output::Tokens,
                ..options
            }),
            Some(Commands::Parse(args)) => run_file(&args.file, &limits, RunOptions {
                output: Output::Ast,
                ..options
            }),
            None => {
                print!("{USAGE}");
                Ok(true)
            }
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("PyToASM: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &std::path::Path, limits: &CompilerLimits, options: RunOptions) -> io::Result<bool> {
    let text = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("failed to read {}: {e}", path.display())))?;
    let name = path.display().to_string();

    driver::run_unit(&text, &name, limits, options, &mut io::stdout(), &mut io::stderr())
}

/// Install a subscriber only when RUST_LOG asks for output
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    }
}
