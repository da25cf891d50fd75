use std::{io, path::Path};

use clap::Parser;
use database::{DatabaseConnectionInfo, PgDatabase};
use model::{location::Location, WithId};
use navigation::{
    database::Database,
    lookup::Campus,
    memory::{Fixture, MemoryDatabase},
    narration::{NarrationEvent, Narrator},
    playback::PlaybackController,
    Client, RequestError,
};
use tokio::{
    io::{AsyncBufRead, BufReader},
    sync::mpsc::{self, UnboundedSender},
};

use cli::Args;
use console::{Console, Exit};
use narrator::CommandNarrator;

mod cli;
mod console;
mod narrator;

#[derive(Debug, thiserror::Error)]
enum KioskError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("could not read the fixture: {0}")]
    Fixture(#[from] serde_json::Error),
    #[error("expected database connection info in env")]
    MissingDatabaseConfig,
    #[error("could not connect to database: {0}")]
    Database(String),
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    if let Err(why) = run(args).await {
        log::error!("{}", why);
        eprintln!("{}", why);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), KioskError> {
    match &args.fixture {
        Some(path) => walk(Client::new(load_fixture(path).await?), &args).await,
        None => {
            let info = DatabaseConnectionInfo::from_env().ok_or(KioskError::MissingDatabaseConfig)?;
            let database = PgDatabase::connect(info)
                .await
                .map_err(|why| KioskError::Database(why.to_string()))?;
            walk(Client::new(database), &args).await
        }
    }
}

async fn load_fixture(path: &Path) -> Result<MemoryDatabase, KioskError> {
    let json = tokio::fs::read_to_string(path).await?;
    let fixture: Fixture = serde_json::from_str(&json)?;
    log::info!("Loaded campus from {}", path.display());
    Ok(MemoryDatabase::from_fixture(fixture))
}

/// One visit: choose a start (unless given), then destinations and their
/// routes until the visitor quits the destination picker.
async fn walk<D: Database>(client: Client<D>, args: &Args) -> Result<(), KioskError> {
    let campus = client.load_campus().await?;
    let mut console = Console::new(BufReader::new(tokio::io::stdin()), io::stdout());

    let deep_link = args
        .start
        .as_ref()
        .and_then(|slug| campus.resolve_deep_link(&format!("/navigate/{}", slug)));
    if let (Some(slug), None) = (&args.start, deep_link) {
        console.say(&format!("There is no location called '{}'.", slug))?;
    }

    let start = match deep_link {
        Some(start) => start.clone(),
        None => {
            let starts = campus.start_locations().into_iter().cloned().collect();
            match console
                .pick("Where are you?", "No routes configured.", starts)
                .await?
            {
                Some(start) => start,
                None => return Ok(()),
            }
        }
    };

    let speech = !args.mute && CommandNarrator::is_available(&args.speech_command).await;
    guide(&mut console, &campus, &start, |events| {
        speech.then(|| CommandNarrator::new(&args.speech_command, events))
    })
    .await
}

/// Offers the destinations reachable from `start` and plays the chosen
/// route, coming back to the destinations afterwards or when a route is
/// missing. Ends when the visitor quits the picker or the input ends.
async fn guide<R, W, N, F>(
    console: &mut Console<R, W>,
    campus: &Campus,
    start: &WithId<Location>,
    mut narrator: F,
) -> Result<(), KioskError>
where
    R: AsyncBufRead + Unpin,
    W: io::Write,
    N: Narrator,
    F: FnMut(UnboundedSender<NarrationEvent>) -> Option<N>,
{
    let destinations = campus
        .destinations_from(&start.content.name)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    loop {
        let Some(destination) = console
            .pick(
                &format!("You are at {}. Where do you want to go?", start.content.name),
                "No destinations found.",
                destinations.clone(),
            )
            .await?
        else {
            return Ok(());
        };

        let route = match campus.resolve_route(&start.content.name, &destination.content.name) {
            Ok(route) => route.clone(),
            Err(why) => {
                console.say(&why.to_string())?;
                continue;
            }
        };

        // A fresh channel per route keeps events of the last narrator out.
        let (events, mut received) = mpsc::unbounded_channel();
        let mut playback = PlaybackController::new(route, narrator(events));
        if console.play(&mut playback, &mut received).await? == Exit::EndOfInput {
            return Ok(());
        }
    }
}
