use clap::{Parser, Subcommand};

/// xemphim - terminal client for the anime storefront
#[derive(Parser)]
#[command(name = "xemphim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL for this run
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print the diagnostic event log after the command
    #[arg(long, global = true)]
    pub diagnostics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: Option<String>,
        /// Repeat of the password; prompted when omitted
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Check the stored token against the backend
    Whoami,

    /// Show the home page: hero, film list and top views
    #[command(alias = "ls")]
    Home,

    /// Show one film with its episodes, related titles and reviews
    #[command(alias = "info")]
    Show { id: String },

    /// Toggle a film in your favorites
    #[command(alias = "fav")]
    Favorite {
        id: String,
        /// Skip the removal confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Rate a film from 1 to 5 (half steps allowed)
    Rate { id: String, value: f32 },

    /// Show your profile, favorites, watch history and ratings
    Profile {
        /// Add a film to favorites from the profile page
        #[arg(long, value_name = "FILM_ID")]
        favorite: Option<String>,
        /// Remove a film from favorites
        #[arg(long, value_name = "FILM_ID")]
        unfavorite: Option<String>,
        #[arg(long, short)]
        yes: bool,
    },

    /// Update profile fields
    EditProfile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Update the account record instead; requires signing in again
        #[arg(long)]
        account: bool,
    },

    /// Resume an entry from your watch history (index as listed by `profile`)
    Resume {
        index: usize,
        /// Seconds of playback to simulate after the seek
        #[arg(long, default_value = "60")]
        seconds: u32,
    },

    /// Play a film, reporting progress as playback advances
    Watch {
        id: String,
        /// Episode number; first episode when omitted
        #[arg(long)]
        episode: Option<u32>,
        /// Start position in seconds
        #[arg(long, default_value = "0")]
        from: u32,
        /// Seconds of playback to simulate
        #[arg(long, default_value = "60")]
        seconds: u32,
        /// Continue with the next episode afterwards
        #[arg(long)]
        next: bool,
    },

    /// Run the request gate and rating proxy
    ServeGate {
        /// Overrides `[server] bind`
        #[arg(long)]
        bind: Option<String>,
    },
}
