use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create academic_years table
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AcademicYears::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(AcademicYears::YearName).string().not_null().unique_key())
                    .col(ColumnDef::new(AcademicYears::StartDate).string().not_null())
                    .col(ColumnDef::new(AcademicYears::EndDate).string().not_null())
                    .col(ColumnDef::new(AcademicYears::IsActive).boolean().not_null().default(false))
                    .col(ColumnDef::new(AcademicYears::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Departments::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(ColumnDef::new(Departments::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Departments::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create project_groups table
        manager
            .create_table(
                Table::create()
                    .table(ProjectGroups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectGroups::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(ProjectGroups::GroupId).string().not_null().unique_key())
                    .col(ColumnDef::new(ProjectGroups::ProjectTitle).string().not_null())
                    .col(ColumnDef::new(ProjectGroups::ProjectDescription).string().null())
                    .col(ColumnDef::new(ProjectGroups::Status).string().null())
                    .col(ColumnDef::new(ProjectGroups::MentorId).string().null())
                    .col(ColumnDef::new(ProjectGroups::DepartmentId).string().null())
                    .col(ColumnDef::new(ProjectGroups::AcademicYearId).string().null())
                    .col(ColumnDef::new(ProjectGroups::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ProjectGroups::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_groups_mentor_id")
                            .from(ProjectGroups::Table, ProjectGroups::MentorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_groups_department_id")
                            .from(ProjectGroups::Table, ProjectGroups::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_groups_academic_year_id")
                            .from(ProjectGroups::Table, ProjectGroups::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create group_members table
        manager
            .create_table(
                Table::create()
                    .table(GroupMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupMembers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(GroupMembers::GroupId).string().not_null())
                    .col(ColumnDef::new(GroupMembers::StudentId).string().not_null())
                    .col(ColumnDef::new(GroupMembers::IsLeader).boolean().not_null().default(false))
                    .col(ColumnDef::new(GroupMembers::JoinedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_members_group_id")
                            .from(GroupMembers::Table, GroupMembers::GroupId)
                            .to(ProjectGroups::Table, ProjectGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_members_student_id")
                            .from(GroupMembers::Table, GroupMembers::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_members_group_student")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::GroupId)
                    .col(GroupMembers::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create project_phases table (the phase catalog)
        manager
            .create_table(
                Table::create()
                    .table(ProjectPhases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectPhases::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(ProjectPhases::PhaseNumber).integer().not_null().unique_key())
                    .col(ColumnDef::new(ProjectPhases::PhaseName).string().not_null())
                    .col(ColumnDef::new(ProjectPhases::Description).string().null())
                    .col(ColumnDef::new(ProjectPhases::CompletionPercentage).integer().not_null())
                    .col(ColumnDef::new(ProjectPhases::StartDate).string().null())
                    .col(ColumnDef::new(ProjectPhases::EndDate).string().null())
                    .col(ColumnDef::new(ProjectPhases::IsLocked).boolean().not_null().default(false))
                    .col(ColumnDef::new(ProjectPhases::AcademicYearId).string().null())
                    .col(ColumnDef::new(ProjectPhases::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create group_phase_status table
        // (group_id, phase_id) is intentionally not unique: readers tolerate duplicates
        manager
            .create_table(
                Table::create()
                    .table(GroupPhaseStatus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupPhaseStatus::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(GroupPhaseStatus::GroupId).string().not_null())
                    .col(ColumnDef::new(GroupPhaseStatus::PhaseId).string().not_null())
                    .col(ColumnDef::new(GroupPhaseStatus::Status).string().null())
                    .col(ColumnDef::new(GroupPhaseStatus::SubmissionDate).big_integer().null())
                    .col(ColumnDef::new(GroupPhaseStatus::MentorRemarks).string().null())
                    .col(ColumnDef::new(GroupPhaseStatus::ApprovedAt).big_integer().null())
                    .col(ColumnDef::new(GroupPhaseStatus::ApprovedBy).string().null())
                    .col(ColumnDef::new(GroupPhaseStatus::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(GroupPhaseStatus::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_phase_status_group_id")
                            .from(GroupPhaseStatus::Table, GroupPhaseStatus::GroupId)
                            .to(ProjectGroups::Table, ProjectGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_phase_status_phase_id")
                            .from(GroupPhaseStatus::Table, GroupPhaseStatus::PhaseId)
                            .to(ProjectPhases::Table, ProjectPhases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_phase_status_group_phase")
                    .table(GroupPhaseStatus::Table)
                    .col(GroupPhaseStatus::GroupId)
                    .col(GroupPhaseStatus::PhaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GroupPhaseStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectPhases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AcademicYears {
    Table,
    Id,
    YearName,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    Name,
    Code,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ProjectGroups {
    Table,
    Id,
    GroupId,
    ProjectTitle,
    ProjectDescription,
    Status,
    MentorId,
    DepartmentId,
    AcademicYearId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GroupMembers {
    Table,
    Id,
    GroupId,
    StudentId,
    IsLeader,
    JoinedAt,
}

#[derive(DeriveIden)]
enum ProjectPhases {
    Table,
    Id,
    PhaseNumber,
    PhaseName,
    Description,
    CompletionPercentage,
    StartDate,
    EndDate,
    IsLocked,
    AcademicYearId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupPhaseStatus {
    Table,
    Id,
    GroupId,
    PhaseId,
    Status,
    SubmissionDate,
    MentorRemarks,
    ApprovedAt,
    ApprovedBy,
    CreatedAt,
    UpdatedAt,
}
