//! Subcommand handlers. Each one drives a page controller and renders
//! what it produced.

mod auth;
mod browse;
mod profile;
mod watch;

use std::io::{self, BufRead, Write};

use xemphim_api::ApiClient;
use xemphim_core::pages::Services;

use crate::cli::Commands;
use crate::error::CliError;

pub type Svc = Services<ApiClient>;

pub async fn run(command: Commands, svc: &Svc) -> Result<(), CliError> {
    match command {
        Commands::Login { username, password } => auth::login(svc, username, password).await,
        Commands::Logout => auth::logout(svc),
        Commands::Register {
            username,
            email,
            password,
            confirm,
        } => auth::register(svc, username, email, password, confirm).await,
        Commands::Whoami => auth::whoami(svc).await,
        Commands::Home => browse::home(svc).await,
        Commands::Show { id } => browse::show(svc, &id).await,
        Commands::Favorite { id, yes } => browse::favorite(svc, &id, yes).await,
        Commands::Rate { id, value } => browse::rate(svc, &id, value).await,
        Commands::Profile {
            favorite,
            unfavorite,
            yes,
        } => profile::show(svc, favorite, unfavorite, yes).await,
        Commands::EditProfile {
            username,
            email,
            bio,
            account,
        } => profile::edit(svc, username, email, bio, account).await,
        Commands::Resume { index, seconds } => watch::resume(svc, index, seconds).await,
        Commands::Watch {
            id,
            episode,
            from,
            seconds,
            next,
        } => watch::watch(svc, &id, episode, from, seconds, next).await,
        Commands::ServeGate { bind } => {
            let mut server = svc.config.server.clone();
            if let Some(bind) = bind {
                server.bind = bind;
            }
            println!("Gate listening on {}", server.bind);
            xemphim_server::run(&server).await?;
            Ok(())
        }
    }
}

/// Read one line from stdin after printing `label`.
fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> io::Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
