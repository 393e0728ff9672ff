#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    velada_cli::main_entry()
}
