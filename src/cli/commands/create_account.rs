use anyhow::{Context, Result};
use model::entities::profile::Role;
use tracing::info;

use super::initdb::migrate;
use crate::config::{Settings, app_state_with_db};
use crate::directory::{self, NewAccount};

/// Creates an account without going through the HTTP surface. The account has
/// no creator, like a self-registered one.
pub async fn create_account(
    settings: Settings,
    email: &str,
    password: &str,
    fullname: &str,
    role: Role,
) -> Result<()> {
    let db = migrate(&settings.database.url).await?;
    let state = app_state_with_db(db, settings);

    let new = NewAccount {
        email: email.to_string(),
        password: password.to_string(),
        fullname: fullname.to_string(),
        role: Some(role),
    };
    let profile = directory::register_account(&state.db, state.identity.as_ref(), new)
        .await
        .with_context(|| format!("Failed to create account for {}", email))?;

    info!("Created {} account {} for {}", profile.role, profile.id, email);
    println!("{}", profile.id);
    Ok(())
}
