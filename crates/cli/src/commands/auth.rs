//! Sign in, sign out, registration.

use copperleaf_core::{LoginCredentials, RegisterCredentials};
use copperleaf_storefront::state::AppState;

use super::Reported;

pub async fn login(
    state: &AppState,
    username: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = LoginCredentials { username, password };
    // Failure is already surfaced by the store's notifier.
    state
        .session()
        .login(&credentials)
        .await
        .map_err(|_| Reported)?;

    if let Some(user) = state.session().user() {
        println!("Signed in as {}.", user.display_name());
    }
    Ok(())
}

pub async fn register(
    state: &AppState,
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = RegisterCredentials {
        username,
        email,
        password,
        first_name,
        last_name,
    };
    state
        .session()
        .register(&credentials)
        .await
        .map_err(|_| Reported)?;

    if let Some(user) = state.session().user() {
        println!("Welcome, {}!", user.display_name());
    }
    Ok(())
}

pub fn logout(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    state.session().logout();
    Ok(())
}

pub fn whoami(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    match state.session().user() {
        Some(user) => {
            println!("{} <{}>", user.display_name(), user.email);
            println!("username: {}  id: {}", user.username, user.id);
        }
        None => println!("Not signed in."),
    }
    Ok(())
}
