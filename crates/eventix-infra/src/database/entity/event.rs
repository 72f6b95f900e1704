//! Event entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub organized_by: String,
    pub event_date: DateTimeWithTimeZone,
    pub event_time: String,
    pub location: String,
    pub participants: i64,
    pub count: i64,
    pub income: f64,
    pub ticket_price: f64,
    pub quantity: i64,
    pub image_path: String,
    pub likes: i64,
    pub comments: Vec<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for eventix_core::domain::Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner: model.owner,
            title: model.title,
            description: model.description,
            organized_by: model.organized_by,
            event_date: model.event_date.into(),
            event_time: model.event_time,
            location: model.location,
            participants: model.participants,
            count: model.count,
            income: model.income,
            ticket_price: model.ticket_price,
            quantity: model.quantity,
            image_path: model.image_path,
            likes: model.likes,
            comments: model.comments,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<eventix_core::domain::Event> for ActiveModel {
    fn from(event: eventix_core::domain::Event) -> Self {
        Self {
            id: Set(event.id),
            owner: Set(event.owner),
            title: Set(event.title),
            description: Set(event.description),
            organized_by: Set(event.organized_by),
            event_date: Set(event.event_date.into()),
            event_time: Set(event.event_time),
            location: Set(event.location),
            participants: Set(event.participants),
            count: Set(event.count),
            income: Set(event.income),
            ticket_price: Set(event.ticket_price),
            quantity: Set(event.quantity),
            image_path: Set(event.image_path),
            likes: Set(event.likes),
            comments: Set(event.comments),
            created_at: Set(event.created_at.into()),
            updated_at: Set(event.updated_at.into()),
        }
    }
}
