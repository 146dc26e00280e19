//! Fleet CLI entry point
//!
//! Every failure ends up here: it is printed once and mapped to an exit code.

use fleet_cli::output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = fleet_cli::run().await {
        print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
