//! Command-line front end: one subcommand per screen of the app.

mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::run;

#[derive(Parser)]
#[command(name = "event-countdown", version)]
#[command(about = "Count down to your events and public holidays")]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new event
    Add {
        /// Event title
        title: String,

        /// When the event happens (e.g. "2025-03-20 15:00" or "2025-03-20")
        #[arg(short, long)]
        at: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Display color as hex (#RRGGBB)
        #[arg(long)]
        color: Option<String>,

        /// Background image to copy into the app
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Change an existing event
    Edit {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        at: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete an event and its pending notification
    Delete { id: i64 },
    /// List upcoming events, or past ones with --past
    List {
        #[arg(long)]
        past: bool,
    },
    /// Show the countdown for one event
    Show { id: i64 },
    /// Fetch public holidays and add them as events
    Holidays {
        /// Year to fetch (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// ISO 3166-1 alpha-2 country code (defaults to the configured one)
        #[arg(long)]
        country: Option<String>,

        /// Also print each fetched holiday
        #[arg(long)]
        list: bool,
    },
    /// Live countdowns; delivers notifications as events come due
    Watch,
    /// View or change preferences
    Settings {
        /// LIGHT, DARK or SYSTEM
        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        onboarding_completed: Option<bool>,

        /// Restore every preference to its default
        #[arg(long, conflicts_with_all = ["theme", "language", "onboarding_completed"])]
        reset: bool,
    },
    /// Show a test notification
    NotifyTest,
}
