//! Check-config command handler

use crate::config::Config;

pub fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    println!("Configuration is valid.");
    println!("{:-<50}", "");
    println!("Database:        {}", config.general.database_path);
    println!("Listen address:  {}", config.bind_addr());
    println!(
        "CORS origins:    {}",
        config.server.cors_allowed_origins.join(", ")
    );
    println!("Secure cookies:  {}", config.server.secure_cookies);
    println!(
        "Session timeout: {} min",
        config.server.session_inactivity_minutes
    );
    println!("Metrics:         {}", config.observability.metrics_enabled);
    Ok(())
}
