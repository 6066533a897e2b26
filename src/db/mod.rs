use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::{GeneralConfig, SecurityConfig};
use crate::domain::{JobId, JobStatus, UserId};
use crate::models::User;
use crate::models::job::{JobApplication, JobChanges, NewJobApplication};

pub mod migrator;
pub mod repositories;

pub use repositories::job::OwnedMutation;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Opens the configured database with the configured pool bounds.
    pub async fn from_config(general: &GeneralConfig) -> Result<Self> {
        Self::with_pool_options(
            &general.database_path,
            general.max_db_connections,
            general.min_db_connections,
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to `:memory:` would see its own empty database.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        conn.execute_unprepared("PRAGMA foreign_keys = ON").await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn job_repo(&self) -> repositories::job::JobRepository {
        repositories::job::JobRepository::new(self.conn.clone())
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(name, email, password, security)
            .await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn verify_user_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn add_job(&self, job: NewJobApplication) -> Result<JobApplication> {
        self.job_repo().insert(job).await
    }

    pub async fn get_job(&self, id: JobId) -> Result<Option<JobApplication>> {
        self.job_repo().get(id).await
    }

    pub async fn update_job(
        &self,
        id: JobId,
        owner: UserId,
        changes: JobChanges,
    ) -> Result<OwnedMutation<JobApplication>> {
        self.job_repo().update_owned(id, owner, changes).await
    }

    pub async fn delete_job(&self, id: JobId, owner: UserId) -> Result<OwnedMutation<()>> {
        self.job_repo().delete_owned(id, owner).await
    }

    pub async fn list_jobs(
        &self,
        owner: UserId,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<JobApplication>> {
        self.job_repo().list_by_owner(owner, page, page_size).await
    }

    pub async fn count_jobs(&self, owner: UserId) -> Result<u64> {
        self.job_repo().count_by_owner(owner).await
    }

    pub async fn jobs_applied_between(
        &self,
        owner: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JobApplication>> {
        self.job_repo().list_applied_between(owner, from, to).await
    }

    pub async fn jobs_by_company(
        &self,
        owner: UserId,
        company_name: &str,
    ) -> Result<Vec<JobApplication>> {
        self.job_repo().list_by_company(owner, company_name).await
    }

    pub async fn jobs_by_status(
        &self,
        owner: UserId,
        status: JobStatus,
    ) -> Result<Vec<JobApplication>> {
        self.job_repo().list_by_status(owner, status).await
    }
}
