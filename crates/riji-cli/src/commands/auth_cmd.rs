use riji_core::api::ApiClient;
use riji_core::session::SessionStore;

use crate::error::CliError;
use crate::session_store::KeychainSessionStore;

pub async fn run_login(
    email: &str,
    password: &str,
    remember: bool,
    api_base: &str,
) -> Result<(), CliError> {
    let api = ApiClient::new(api_base)?;
    let session = api.login(email, password).await?;

    let store = KeychainSessionStore::new();
    if remember {
        store.save(&session)?;
        println!("Signed in as user {} (session saved to keychain)", session.userid);
    } else {
        // Mirror the remember-me checkbox: an unchecked login also drops
        // whatever an earlier checked login left behind.
        store.clear()?;
        println!(
            "Signed in as user {}; session not persisted (pass --remember to keep it)",
            session.userid
        );
    }
    Ok(())
}

pub fn run_status() -> Result<(), CliError> {
    let store = KeychainSessionStore::new();
    match store.load()? {
        Some(session) => println!("Signed in as user {}", session.userid),
        None => println!("Not signed in."),
    }
    Ok(())
}

pub fn run_logout() -> Result<(), CliError> {
    let store = KeychainSessionStore::new();
    store.clear()?;
    println!("Signed out");
    Ok(())
}
