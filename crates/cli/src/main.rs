use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sanchari_agents::{AgentSettings, TravelAgent};
use sanchari_core::{Transcript, GREETING_MESSAGE};
use sanchari_observability::{init_tracing, AppMetrics};
use sanchari_services::{
    HttpCollaborators, NominatimGeocoder, OpenMeteoWeather, OverpassPlaces, ServiceConfig,
};

type HttpAgent = TravelAgent<NominatimGeocoder, OpenMeteoWeather, OverpassPlaces>;

#[derive(Debug, Parser)]
#[command(name = "sanchari")]
#[command(about = "Weather and places-to-visit chat for any city")]
struct Cli {
    /// Maximum number of attractions listed per reply.
    #[arg(long)]
    attraction_cap: Option<usize>,

    /// Attraction search radius around the city, in meters.
    #[arg(long)]
    radius: Option<u32>,

    /// Print the turn counters as JSON on exit.
    #[arg(long)]
    stats: bool,

    /// Print the session transcript as JSON on exit.
    #[arg(long)]
    dump_transcript: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat (default).
    Chat,
    /// Answer a single message and exit.
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("sanchari_cli");
    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env();
    if let Some(cap) = cli.attraction_cap {
        config.attraction_cap = cap;
    }
    if let Some(radius) = cli.radius {
        config.places_radius_meters = radius;
    }
    config.validate().context("invalid service configuration")?;

    let agent = build_agent(&config)?;
    let mut transcript = Transcript::new();

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&agent, &mut transcript).await?,
        Command::Ask { text } => {
            let reply = agent.respond(&mut transcript, &text.join(" ")).await;
            println!("{}", reply.text);
        }
    }

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&agent.metrics().snapshot())?);
    }
    if cli.dump_transcript {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    }

    Ok(())
}

async fn run_chat(agent: &HttpAgent, transcript: &mut Transcript) -> Result<()> {
    println!("Sanchari AI - type 'exit' to quit.");
    println!("{GREETING_MESSAGE}");
    transcript.push_assistant(GREETING_MESSAGE);

    loop {
        print!("\nUser Input: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }

        if message.is_empty() {
            continue;
        }

        let reply = agent.respond(transcript, message).await;
        println!("Output:");
        println!("{}", reply.text);
    }

    Ok(())
}

fn build_agent(config: &ServiceConfig) -> Result<HttpAgent> {
    let collaborators = HttpCollaborators::from_config(config)?;

    Ok(TravelAgent::new(
        Arc::new(collaborators.geocoder),
        Arc::new(collaborators.weather),
        Arc::new(collaborators.places),
        AgentSettings::from(config),
        AppMetrics::shared(),
    ))
}
