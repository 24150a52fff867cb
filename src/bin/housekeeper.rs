//! Run the housekeeping chores on a Trello board
//!
//! Set the RUST_LOG environment variable to display more info about the run.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use trello_housekeeper::client::Client;
use trello_housekeeper::config::{Chores, Settings};
use trello_housekeeper::{BoardSession, Housekeeper};
use trello_housekeeper::utils::print_board;

#[derive(Parser)]
#[command(name = "trello-housekeeper", about = "Scheduled housekeeping chores for a Trello board", version)]
struct Cli {
    /// JSON settings file (default settings are used when omitted)
    #[arg(long, short = 'c', env = "HOUSEKEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Only run this chore (shopping, replay or reminders). Can be repeated
    #[arg(long = "only", value_name = "CHORE")]
    only: Vec<Chores>,

    /// Name of the board, overrides the settings file
    #[arg(long, short = 'b')]
    board: Option<String>,

    /// Print the open lists and cards of the board, then exit without running any chore
    #[arg(long)]
    print: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => (),
        Ok(false) => {
            log::error!("Housekeeping finished with errors");
            std::process::exit(1);
        },
        Err(err) => {
            log::error!("{}", err);
            eprintln!("Error: {}", err);
            std::process::exit(2);
        },
    }
}

async fn run(cli: Cli) -> Result<bool, Box<dyn Error>> {
    let mut settings = match &cli.config {
        None => Settings::default(),
        Some(path) => Settings::from_file(path)?,
    };
    if let Some(board) = cli.board {
        settings.board_name = board;
    }
    if cli.only.is_empty() == false {
        settings.chores = cli.only.iter().fold(Chores::empty(), |acc, chore| acc | *chore);
    }

    let (key, token) = settings.credentials()?;
    let client = Client::new(&settings.api_url, key, token)?;
    let session = BoardSession::open(client, &settings.board_name).await?;

    if cli.print {
        print_board(&session).await?;
        return Ok(true);
    }

    let mut housekeeper = Housekeeper::new(session, settings);
    Ok(housekeeper.run().await)
}
