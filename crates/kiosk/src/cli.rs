use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "kiosk")]
#[command(author, version, about)]
#[command(long_about = "Walks visitors through the campus in the terminal.\n\n\
    Pick where you are and where you want to go, then follow the route step \
    by step. Steps can be read aloud.\n\n\
    Examples:\n  \
    kiosk                             Choose a start location\n  \
    kiosk --start main-office         Start where a QR code was scanned\n  \
    kiosk --fixture campus.json       Use a JSON file instead of the database")]
pub struct Args {
    /// Slug of the start location, as printed on the QR code at that spot
    #[arg(long)]
    pub start: Option<String>,

    /// Seed an in-memory store from this JSON file instead of connecting to
    /// the database
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Program that reads its first argument aloud
    #[arg(long, default_value = "espeak")]
    pub speech_command: String,

    /// Never read steps aloud
    #[arg(long)]
    pub mute: bool,
}
