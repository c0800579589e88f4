use std::process::ExitCode;

use expo_version::cli;

fn main() -> ExitCode {
    ExitCode::from(cli::run_from(std::env::args_os()))
}
