//! Create `student` table.
//! Email uniqueness is enforced here so that two racing inserts cannot both win.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(uuid(Student::Id).primary_key())
                    // widths are also enforced by the service validator
                    .col(string_len(Student::Name, 256).not_null())
                    .col(string_len(Student::Email, 320).not_null())
                    .col(string_len(Student::Course, 256).not_null())
                    .col(string_len(Student::Batch, 64).not_null())
                    .col(string_len(Student::Grade, 2).not_null())
                    .col(date(Student::DateOfAdmission).not_null())
                    .col(timestamp_with_time_zone(Student::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Student::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // Emails are lowercased before they reach the table, so a plain unique index suffices
        manager
            .create_index(
                Index::create()
                    .name("uniq_student_email")
                    .table(Student::Table)
                    .col(Student::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Student::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Student {
    Table,
    Id,
    Name,
    Email,
    Course,
    Batch,
    Grade,
    DateOfAdmission,
    CreatedAt,
    UpdatedAt,
}
