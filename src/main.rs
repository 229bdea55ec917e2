use clap::Parser;
use referee_roster::utils::{logger, validation::Validate};
use referee_roster::{
    CliArgs, FilterState, HttpGateway, PageHandle, RosterController, TerminalRenderer,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  search <text>          type into the search box (empty text lists everyone)
  filter <all|head|assistant>
  schedule <id>          book a referee for a match
  toggle <id>            show or hide the rating form
  team1 <id> <name>      type the home team
  team2 <id> <name>      type the away team
  rating <id> <1-5>      type the referee rating
  cancel <id>            discard a half-filled rating form
  refresh                reload the page
  help
  quit";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting referee roster");

    let config = args.load_config()?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::info!("📡 Referee service: {}", config.api.base_url);

    let gateway = Arc::new(HttpGateway::new(&config)?);
    let mut controller =
        RosterController::from_config(gateway, Arc::new(TerminalRenderer::new()), &config);
    let page = controller.start().await;

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !dispatch(&controller, &page, line.trim()).await {
            break;
        }
    }

    controller.shutdown().await;
    tracing::info!("👋 Roster closed");
    Ok(())
}

/// Runs one command line; returns `false` when the user quits.
async fn dispatch(controller: &RosterController, page: &PageHandle, line: &str) -> bool {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

    match command {
        "" => {}
        "quit" | "exit" => return false,
        "help" => println!("{}", HELP),
        "refresh" => controller.refresh().await,
        "search" => page.type_search(rest),
        "filter" => match rest.parse::<FilterState>() {
            Ok(filter) => page.select_filter(filter),
            Err(e) => eprintln!("{}", e),
        },
        "schedule" | "toggle" | "team1" | "team2" | "rating" | "cancel" => {
            let (id, value) = rest.split_once(' ').unwrap_or((rest, ""));
            let Ok(id) = id.trim().parse::<u64>() else {
                eprintln!("Expected a referee id, got '{}'", id);
                return true;
            };
            let Some(card) = controller.card(id).await else {
                eprintln!("Referee {} is not on the page", id);
                return true;
            };
            match command {
                "schedule" => card.schedule(),
                "toggle" => card.toggle_form(),
                "team1" => card.type_team1(value),
                "team2" => card.type_team2(value),
                "rating" => card.type_rating(value),
                _ => card.cancel_form(),
            }
        }
        other => eprintln!("Unknown command '{}', type 'help'", other),
    }

    true
}
