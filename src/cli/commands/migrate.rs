//! Migrate command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    // Connecting applies any pending migrations.
    let store = Store::from_config(&config.general).await?;
    store.ping().await?;

    println!("Database at {} is up to date.", config.general.database_path);
    Ok(())
}
