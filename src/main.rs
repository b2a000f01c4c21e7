use recordkit::{Outcome, core::output};
use std::process::ExitCode;

fn main() -> ExitCode {
    match recordkit::run() {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::Findings) => ExitCode::from(1),
        Err(e) => {
            output::failure(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
