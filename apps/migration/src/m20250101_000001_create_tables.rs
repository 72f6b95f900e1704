//! Users, events and tickets.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Owner,
    Title,
    Description,
    OrganizedBy,
    EventDate,
    EventTime,
    Location,
    Participants,
    Count,
    Income,
    TicketPrice,
    Quantity,
    ImagePath,
    Likes,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    UserId,
    EventId,
    DetailsName,
    DetailsEmail,
    DetailsEventName,
    DetailsEventDate,
    DetailsEventTime,
    DetailsTicketPrice,
    DetailsQr,
    Count,
    CreatedAt,
}

fn timestamp(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn counter(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().default(0).to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Events::Owner).string().not_null())
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).text().not_null())
                    .col(ColumnDef::new(Events::OrganizedBy).string().not_null())
                    .col(
                        ColumnDef::new(Events::EventDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::EventTime).string().not_null())
                    .col(ColumnDef::new(Events::Location).string().not_null())
                    .col(counter(Events::Participants))
                    .col(counter(Events::Count))
                    .col(ColumnDef::new(Events::Income).double().not_null().default(0.0))
                    .col(ColumnDef::new(Events::TicketPrice).double().not_null())
                    .col(counter(Events::Quantity))
                    .col(
                        ColumnDef::new(Events::ImagePath)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(counter(Events::Likes))
                    .col(
                        ColumnDef::new(Events::Comments)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'::text[]")),
                    )
                    .col(timestamp(Events::CreatedAt))
                    .col(timestamp(Events::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tickets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tickets::UserId).string().not_null())
                    .col(ColumnDef::new(Tickets::EventId).string().not_null())
                    .col(ColumnDef::new(Tickets::DetailsName).string().not_null())
                    .col(ColumnDef::new(Tickets::DetailsEmail).string().not_null())
                    .col(ColumnDef::new(Tickets::DetailsEventName).string().not_null())
                    .col(
                        ColumnDef::new(Tickets::DetailsEventDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tickets::DetailsEventTime).string().not_null())
                    .col(ColumnDef::new(Tickets::DetailsTicketPrice).double().not_null())
                    .col(ColumnDef::new(Tickets::DetailsQr).text().not_null())
                    .col(counter(Tickets::Count))
                    .col(timestamp(Tickets::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_user_id")
                    .table(Tickets::Table)
                    .col(Tickets::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_created_at")
                    .table(Events::Table)
                    .col(Events::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
