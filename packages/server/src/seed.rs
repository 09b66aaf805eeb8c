use sea_orm::*;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::entity::user;
use crate::utils::hash;

/// Ensure the admin account from the configuration exists.
///
/// Runs on every startup. An existing account is left untouched, so
/// password changes made through other channels survive restarts. When
/// no admin password is configured, seeding is skipped with a warning
/// and only previously created accounts can log in.
pub async fn ensure_admin_user(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(auth.admin_username.as_str()))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    if auth.admin_password.is_empty() {
        warn!(
            username = %auth.admin_username,
            "no admin password configured, skipping admin account seeding"
        );
        return Ok(());
    }

    let password_hash = hash::hash_password(&auth.admin_password)
        .map_err(|e| anyhow::anyhow!("failed to hash admin password: {e}"))?;

    user::ActiveModel {
        username: Set(auth.admin_username.clone()),
        password: Set(password_hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username = %auth.admin_username, "seeded admin account");

    Ok(())
}
