//! Ticket entity for SeaORM.
//!
//! The details snapshot is flattened into `details_*` columns.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use eventix_core::domain::TicketDetails;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub event_id: String,
    pub details_name: String,
    pub details_email: String,
    pub details_event_name: String,
    pub details_event_date: DateTimeWithTimeZone,
    pub details_event_time: String,
    pub details_ticket_price: f64,
    #[sea_orm(column_type = "Text")]
    pub details_qr: String,
    pub count: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for eventix_core::domain::Ticket {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            event_id: model.event_id,
            details: TicketDetails {
                name: model.details_name,
                email: model.details_email,
                event_name: model.details_event_name,
                event_date: model.details_event_date.into(),
                event_time: model.details_event_time,
                ticket_price: model.details_ticket_price,
                qr_payload: model.details_qr,
            },
            count: model.count,
            created_at: model.created_at.into(),
        }
    }
}

impl From<eventix_core::domain::Ticket> for ActiveModel {
    fn from(ticket: eventix_core::domain::Ticket) -> Self {
        let details = ticket.details;
        Self {
            id: Set(ticket.id),
            user_id: Set(ticket.user_id),
            event_id: Set(ticket.event_id),
            details_name: Set(details.name),
            details_email: Set(details.email),
            details_event_name: Set(details.event_name),
            details_event_date: Set(details.event_date.into()),
            details_event_time: Set(details.event_time),
            details_ticket_price: Set(details.ticket_price),
            details_qr: Set(details.qr_payload),
            count: Set(ticket.count),
            created_at: Set(ticket.created_at.into()),
        }
    }
}
