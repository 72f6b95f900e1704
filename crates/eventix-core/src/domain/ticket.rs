use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of the buyer and event taken when the ticket is issued.
///
/// This is a copy, not a reference: later changes to the event or user
/// are not reflected in tickets already issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    pub name: String,
    pub email: String,
    #[serde(rename = "eventname")]
    pub event_name: String,
    #[serde(rename = "eventdate")]
    pub event_date: DateTime<Utc>,
    #[serde(rename = "eventtime")]
    pub event_time: String,
    #[serde(rename = "ticketprice")]
    pub ticket_price: f64,
    /// Payload encoded into the ticket's QR code.
    #[serde(rename = "qr")]
    pub qr_payload: String,
}

/// Ticket entity.
///
/// `user_id` and `event_id` are opaque strings; no referential integrity
/// with the user or event stores is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "eventid")]
    pub event_id: String,
    #[serde(rename = "ticketDetails")]
    pub details: TicketDetails,
    pub count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Validated ticket-creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTicket {
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "eventid")]
    pub event_id: String,
    #[serde(rename = "ticketDetails")]
    pub details: TicketDetails,
    #[serde(default)]
    pub count: i64,
}

impl Ticket {
    pub fn new(data: NewTicket) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            event_id: data.event_id,
            details: data.details,
            count: data.count,
            created_at: Utc::now(),
        }
    }
}
