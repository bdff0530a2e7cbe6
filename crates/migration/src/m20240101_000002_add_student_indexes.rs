use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_student::Student;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing returns rows in insertion order
        manager
            .create_index(
                Index::create()
                    .name("idx_student_created_at")
                    .table(Student::Table)
                    .col(Student::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_student_created_at").table(Student::Table).to_owned())
            .await
    }
}
