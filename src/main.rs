use clap::Parser;

use stockledger::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(err) = cli::run(cli).await {
        cli::output::report(&err);
        std::process::exit(1);
    }
}
