//! Initial schema migration.
//!
//! Creates the three clinic tables:
//!
//! - `patients`: patient registry with optional profile image
//! - `expenses`: clinic expense ledger
//! - `appointments`: scheduled visits referencing a patient
//!
//! `appointments.patient_id` is intentionally left without a foreign key:
//! deleting a patient keeps its appointments, which then list with no
//! patient name.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Patients {
    Table,
    Id,
    Name,
    Dob,
    Gender,
    Age,
    Address,
    ContactDetails,
    City,
    Treatment,
    FeesMinor,
    RegisteredDate,
    AppointmentDate,
    Image,
    DateAdded,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    ExpenseType,
    Description,
    AmountMinor,
    Date,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Appointments {
    Table,
    Id,
    PatientId,
    Date,
    Treatment,
    Status,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Patients::Name).string().not_null())
                    .col(ColumnDef::new(Patients::Dob).date().not_null())
                    .col(ColumnDef::new(Patients::Gender).string().not_null())
                    .col(ColumnDef::new(Patients::Age).integer().not_null())
                    .col(ColumnDef::new(Patients::Address).string().not_null())
                    .col(ColumnDef::new(Patients::ContactDetails).string().not_null())
                    .col(ColumnDef::new(Patients::City).string())
                    .col(ColumnDef::new(Patients::Treatment).string())
                    .col(
                        ColumnDef::new(Patients::FeesMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Patients::RegisteredDate).date().not_null())
                    .col(ColumnDef::new(Patients::AppointmentDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Patients::Image).string())
                    .col(
                        ColumnDef::new(Patients::DateAdded)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::ExpenseType).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Expenses::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Category).string())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-date")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Appointments::PatientId).string().not_null())
                    .col(
                        ColumnDef::new(Appointments::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Appointments::Treatment).string().not_null())
                    .col(ColumnDef::new(Appointments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Appointments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-appointments-patient_id")
                    .table(Appointments::Table)
                    .col(Appointments::PatientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}
