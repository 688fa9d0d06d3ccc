//! `cavil` — standalone binary entry point.
//!
//! A thin wrapper around [`cavil_cli::run_cli`]; all argument parsing and
//! dispatch logic lives in the library crate.

fn main() -> std::process::ExitCode {
    env_logger::init();
    cavil_cli::run_cli()
}
