//! pdfjoin - Concatenate PDF files into a single document.

use std::process::ExitCode;

use tracing::debug;

use pdfjoin::cli::{Invocation, USAGE, parse_args};
use pdfjoin::engine::LopdfEngine;
use pdfjoin::io::TerminalPrompter;
use pdfjoin::output::OutputFormatter;
use pdfjoin::{logging, run};

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(Invocation::Usage) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Merge(cli)) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: {err:#}");
    }

    let formatter = OutputFormatter::new(cli.quiet);
    let result = cli.to_config().and_then(|config| {
        run(
            &config,
            &LopdfEngine::new(),
            &mut TerminalPrompter::new(),
            &formatter,
        )
    });

    match result {
        Ok(outcome) => {
            debug!(?outcome, "finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            formatter.error(&err.to_string());
            ExitCode::from(err.exit_code())
        }
    }
}
