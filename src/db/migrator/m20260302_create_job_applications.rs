use crate::entities::users;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only accepts AUTOINCREMENT on an INTEGER key, which is 64-bit anyway.
        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobApplications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::CompanyName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::JobRole)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobApplications::Comment).string_len(500).null())
                    .col(
                        ColumnDef::new(JobApplications::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobApplications::ResumeUsed).string().null())
                    .col(ColumnDef::new(JobApplications::JobPostingId).string().null())
                    .col(ColumnDef::new(JobApplications::AppliedDate).date().not_null())
                    .col(ColumnDef::new(JobApplications::UserId).integer().not_null())
                    .col(ColumnDef::new(JobApplications::CreatedAt).string().not_null())
                    .col(ColumnDef::new(JobApplications::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_user_id")
                            .from(JobApplications::Table, JobApplications::UserId)
                            .to(users::Entity, users::Column::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_user_id")
                    .table(JobApplications::Table)
                    .col(JobApplications::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_applied_date")
                    .table(JobApplications::Table)
                    .col(JobApplications::AppliedDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JobApplications {
    Table,
    Id,
    CompanyName,
    JobRole,
    Comment,
    Status,
    ResumeUsed,
    JobPostingId,
    AppliedDate,
    UserId,
    CreatedAt,
    UpdatedAt,
}
