use clap::Parser;
use log::info;
use server::dictionary::Dictionary;
use server::game::{parse_turn_cap, GameRules};
use server::matchmaker::Matchmaker;
use server::network::Server;
use std::sync::Arc;

/// Main-method of the application.
/// Parses command-line arguments, loads the word list, then runs the accept loop.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value_t = shared::DEFAULT_PORT)]
        port: u16,
        /// Newline-delimited word list
        #[clap(short, long, default_value = "words_alpha.txt")]
        words: String,
        /// Total turns per match, shared by both players (positive and even)
        #[clap(short = 't', long, default_value_t = shared::MAX_TURNS, value_parser = parse_turn_cap)]
        max_turns: u32,
        /// A rejected word passes the turn instead of re-prompting
        #[clap(long)]
        rejected_word_ends_turn: bool,
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let dictionary = Arc::new(Dictionary::load(&args.words));
    let rules = GameRules {
        max_turns: args.max_turns,
        rejected_word_ends_turn: args.rejected_word_ends_turn,
    };
    let matchmaker = Arc::new(Matchmaker::new(dictionary, rules));

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, matchmaker).await?;

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
