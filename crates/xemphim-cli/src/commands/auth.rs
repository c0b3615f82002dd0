use xemphim_core::pages::register::Field;
use xemphim_core::pages::{Login, Register};

use super::{prompt, Svc};
use crate::error::CliError;
use crate::render;

pub async fn login(svc: &Svc, username: String, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };
    let mut form = Login::with_credentials(username, password);
    let action = form.submit(svc).await;

    for error in [&form.username_error, &form.password_error].into_iter().flatten() {
        println!("{error}");
    }
    if let Some(route) = render::action(action) {
        let name = svc.session.username().unwrap_or_default();
        println!("Signed in as {name}. Continue at {route}");
    }
    Ok(())
}

pub fn logout(svc: &Svc) -> Result<(), CliError> {
    if !svc.session.is_logged_in() {
        println!("Not signed in.");
        return Ok(());
    }
    let route = svc.session.logout();
    println!("Signed out. Continue at {route}");
    Ok(())
}

pub async fn register(
    svc: &Svc,
    username: String,
    email: String,
    password: Option<String>,
    confirm: Option<String>,
) -> Result<(), CliError> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };
    let confirm_password = match confirm {
        Some(c) => c,
        None => prompt("Confirm password: ")?,
    };
    let mut form = Register {
        username,
        email,
        password,
        confirm_password,
        ..Register::new()
    };
    let action = form.submit(svc).await;

    for (field, message) in &form.errors {
        let name = match field {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm",
        };
        println!("{name}: {message}");
    }
    if render::action(action).is_some() {
        println!("Now sign in with: xemphim login <username>");
    }
    Ok(())
}

pub async fn whoami(svc: &Svc) -> Result<(), CliError> {
    if !svc.session.is_logged_in() {
        println!("Not signed in.");
        return Ok(());
    }
    match svc.verify_session().await {
        Some(user) => println!("{} (id {})", user.username, user.id),
        None => println!("Stored session is no longer valid; signed out."),
    }
    Ok(())
}
