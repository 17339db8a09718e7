/*
 * Responsibility
 * - call app::run() (no logic here)
 * - map the result to an exit status; errors go to stderr
 */
use std::process::ExitCode;

fn main() -> ExitCode {
    match solid_dpop::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
