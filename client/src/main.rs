use clap::Parser;
use client::input::InputReader;
use client::network::{Client, SessionEnd};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:12345")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let mut input = InputReader::stdin();

    println!("Please enter your name: ");
    let Some(name) = input.read_name().await? else {
        println!("Invalid name. Exiting...");
        return Ok(());
    };

    let mut client = Client::connect(&args.server).await?;
    println!("Connected to the game server.");
    client.send_line(&name).await?;

    let mut stdout = tokio::io::stdout();
    match client.run(&mut input, &mut stdout).await? {
        SessionEnd::Finished(result) => info!("Game over: {:?}", result),
        SessionEnd::Closed => info!("Server closed the connection"),
    }

    Ok(())
}
