//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use courier_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match courier_cli::run() {
        Ok(()) => {}
        // Help and version requests arrive as clap errors and exit with clap's own code.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("courier: {err}");
            std::process::exit(1);
        }
    }
}
