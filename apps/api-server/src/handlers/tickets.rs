//! Ticket handlers.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use eventix_core::domain::{NewTicket, Ticket};
use eventix_core::ports::{BaseRepository, TicketRepository};
use eventix_core::validation::CREATE_TICKET;
use eventix_shared::dto::TicketEnvelope;

use super::events::parse_id;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /tickets
pub async fn create(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    let data: NewTicket = CREATE_TICKET.parse(&body)?;

    let ticket = state.tickets.insert(Ticket::new(data)).await?;
    tracing::info!(ticket_id = %ticket.id, event_id = %ticket.event_id, "Ticket issued");

    Ok(HttpResponse::Created().json(TicketEnvelope { ticket }))
}

/// GET /tickets/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, "Invalid ticket id")?;

    let ticket = state
        .tickets
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Ticket not found"))?;

    Ok(HttpResponse::Ok().json(ticket))
}

/// GET /tickets/user/{userId}
pub async fn list_for_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let tickets = state.tickets.find_by_user_id(&path).await?;
    Ok(HttpResponse::Ok().json(tickets))
}

/// DELETE /tickets/{id} - 204 whether or not the ticket existed.
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, "Invalid ticket id")?;

    if state.tickets.delete(id).await? {
        tracing::info!(ticket_id = %id, "Ticket deleted");
    }

    Ok(HttpResponse::NoContent().finish())
}
