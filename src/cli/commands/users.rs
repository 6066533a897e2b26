//! Users command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(&config.general).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No accounts registered.");
        return Ok(());
    }

    println!("Accounts ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let jobs = store.count_jobs(user.id).await?;
        println!(
            "[{}] {} <{}> - {} applications, joined {}",
            user.id, user.name, user.email, jobs, user.created_at
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnectionTrait;

    #[tokio::test]
    async fn lists_accounts_from_the_configured_database() {
        let path = std::env::temp_dir().join(format!("jobtracker-users-{}.db", uuid::Uuid::new_v4()));
        let mut config = Config::default();
        config.general.database_path = format!("sqlite://{}", path.display());
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;

        let store = Store::from_config(&config.general).await.unwrap();
        store
            .create_user("Ada", "ada@example.com", "secret1", &config.security)
            .await
            .unwrap()
            .unwrap();

        cmd_list_users(&config).await.unwrap();

        store.conn.execute_unprepared("DROP TABLE job_applications").await.unwrap();
        assert!(cmd_list_users(&config).await.is_err());
    }
}
