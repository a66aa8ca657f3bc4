use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_tables::Users;
use crate::m20250301_000002_create_academic_tables::ProjectGroups;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create project_diary table
        manager
            .create_table(
                Table::create()
                    .table(ProjectDiary::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectDiary::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(ProjectDiary::GroupId).string().not_null())
                    .col(ColumnDef::new(ProjectDiary::EntryDate).string().not_null())
                    .col(ColumnDef::new(ProjectDiary::WorkDone).string().not_null())
                    .col(ColumnDef::new(ProjectDiary::IssuesFaced).string().null())
                    .col(ColumnDef::new(ProjectDiary::NextPlan).string().null())
                    .col(ColumnDef::new(ProjectDiary::SubmittedBy).string().null())
                    .col(ColumnDef::new(ProjectDiary::IsReviewed).boolean().not_null().default(false))
                    .col(ColumnDef::new(ProjectDiary::MentorComments).string().null())
                    .col(ColumnDef::new(ProjectDiary::ReviewedAt).big_integer().null())
                    .col(ColumnDef::new(ProjectDiary::ReviewedBy).string().null())
                    .col(ColumnDef::new(ProjectDiary::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ProjectDiary::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_diary_group_id")
                            .from(ProjectDiary::Table, ProjectDiary::GroupId)
                            .to(ProjectGroups::Table, ProjectGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create documents table (metadata only; file bytes live in external storage)
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Documents::GroupId).string().not_null())
                    .col(ColumnDef::new(Documents::PhaseId).string().null())
                    .col(ColumnDef::new(Documents::DocumentType).string().not_null())
                    .col(ColumnDef::new(Documents::Title).string().not_null())
                    .col(ColumnDef::new(Documents::FileName).string().not_null())
                    .col(ColumnDef::new(Documents::FileUrl).string().not_null())
                    .col(ColumnDef::new(Documents::FileSize).big_integer().null())
                    .col(ColumnDef::new(Documents::Version).integer().null())
                    .col(ColumnDef::new(Documents::UploadedBy).string().null())
                    .col(ColumnDef::new(Documents::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_group_id")
                            .from(Documents::Table, Documents::GroupId)
                            .to(ProjectGroups::Table, ProjectGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create meetings table
        manager
            .create_table(
                Table::create()
                    .table(Meetings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meetings::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Meetings::GroupId).string().null())
                    .col(ColumnDef::new(Meetings::Title).string().not_null())
                    .col(ColumnDef::new(Meetings::Description).string().null())
                    .col(ColumnDef::new(Meetings::MeetingType).string().null())
                    .col(ColumnDef::new(Meetings::ScheduledAt).big_integer().not_null())
                    .col(ColumnDef::new(Meetings::Location).string().null())
                    .col(ColumnDef::new(Meetings::CreatedBy).string().null())
                    .col(ColumnDef::new(Meetings::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_group_id")
                            .from(Meetings::Table, Meetings::GroupId)
                            .to(ProjectGroups::Table, ProjectGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notifications::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Notifications::UserId).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).string().not_null())
                    .col(ColumnDef::new(Notifications::NotificationType).string().null())
                    .col(ColumnDef::new(Notifications::Link).string().null())
                    .col(ColumnDef::new(Notifications::IsRead).boolean().not_null().default(false))
                    .col(ColumnDef::new(Notifications::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_id")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meetings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectDiary::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ProjectDiary {
    Table,
    Id,
    GroupId,
    EntryDate,
    WorkDone,
    IssuesFaced,
    NextPlan,
    SubmittedBy,
    IsReviewed,
    MentorComments,
    ReviewedAt,
    ReviewedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    GroupId,
    PhaseId,
    DocumentType,
    Title,
    FileName,
    FileUrl,
    FileSize,
    Version,
    UploadedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Meetings {
    Table,
    Id,
    GroupId,
    Title,
    Description,
    MeetingType,
    ScheduledAt,
    Location,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Message,
    NotificationType,
    Link,
    IsRead,
    CreatedAt,
}
