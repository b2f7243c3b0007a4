use std::process::ExitCode;

fn main() -> ExitCode {
    parlor_cli::run()
}
