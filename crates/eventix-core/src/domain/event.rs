use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event entity as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub organized_by: String,
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    pub participants: i64,
    pub count: i64,
    pub income: f64,
    pub ticket_price: f64,
    pub quantity: i64,
    /// Relative path of the uploaded image, empty when none was sent.
    pub image_path: String,
    pub likes: i64,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated event-creation payload.
///
/// Deserialized from the normalized output of the event schema, so every
/// counter is already known to be non-negative.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub organized_by: String,
    pub event_date: DateTime<Utc>,
    pub event_time: String,
    pub location: String,
    pub ticket_price: f64,
    #[serde(default)]
    pub participants: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: Vec<String>,
}

impl Event {
    /// Build a new event from a validated payload and the stored image path.
    pub fn new(data: NewEvent, image_path: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: data.owner,
            title: data.title,
            description: data.description,
            organized_by: data.organized_by,
            event_date: data.event_date,
            event_time: data.event_time,
            location: data.location,
            participants: data.participants,
            count: data.count,
            income: data.income,
            ticket_price: data.ticket_price,
            quantity: data.quantity,
            image_path,
            likes: data.likes,
            comments: data.comments,
            created_at: now,
            updated_at: now,
        }
    }
}
