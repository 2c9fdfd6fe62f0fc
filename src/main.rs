#![deny(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

use std::io::{self, Write};
use std::process::ExitCode;

use ucd_tablegen::cli::{Cli, Command};
use ucd_tablegen::error::{Error, Result};
use ucd_tablegen::logging::init_logging;
use ucd_tablegen::pipeline;

fn main() -> ExitCode {
    run_with_args(std::env::args().skip(1))
}

fn run_with_args<I, S>(args: I) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn try_main<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let cli = Cli::parse_from(args)?;
    match cli.command {
        Command::Help => {
            println!("{}", Cli::usage());
            Ok(())
        }
        Command::Version => {
            println!("ucd-tablegen {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Generate(config) => {
            init_logging(cli.log_options);
            let report = pipeline::run(&config).inspect_err(|err| {
                tracing::error!(
                    target: "pipeline",
                    stage = "tablegen.run.complete",
                    status = "error",
                    kind = err.kind(),
                    error = %err
                );
            })?;
            println!("{}", report.summary());
            Ok(())
        }
    }
}

fn report_error(err: &Error) {
    let _ = writeln!(io::stderr(), "error: {err}");
}
