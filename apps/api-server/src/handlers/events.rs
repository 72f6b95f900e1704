//! Event handlers: creation with image upload, listing, lookup and likes.

use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpResponse, web};
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use serde_json::{Map, Value};
use uuid::Uuid;

use eventix_core::domain::{Event, NewEvent};
use eventix_core::ports::{BaseRepository, BlobStore, EventRepository};
use eventix_core::upload::{UploadError, UploadPolicy};
use eventix_core::validation::CREATE_EVENT;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the event image.
const IMAGE_FIELD: &str = "image";

/// Form fields collected into a list even when sent once.
const LIST_FIELDS: &[&str] = &["comments"];

/// Ceiling for a single text field.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

struct ImageUpload {
    file_name: String,
    body: Bytes,
}

struct EventForm {
    fields: Map<String, Value>,
    image: Option<ImageUpload>,
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed form data: {err}"))
}

pub(crate) fn parse_id(raw: &str, message: &'static str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(message.to_string()))
}

/// Add a text field; `name[]` and list fields accumulate into an array.
fn insert_form_value(fields: &mut Map<String, Value>, name: &str, value: String) {
    let (key, is_list) = match name.strip_suffix("[]") {
        Some(base) => (base, true),
        None => (name, LIST_FIELDS.contains(&name)),
    };

    if !is_list {
        fields.insert(key.to_string(), Value::String(value));
        return;
    }

    match fields
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(items) => items.push(Value::String(value)),
        other => *other = Value::Array(vec![other.take(), Value::String(value)]),
    }
}

/// Read the whole form, enforcing the upload policy while the image streams in.
///
/// Nothing is written anywhere until the form has been fully read.
async fn read_event_form(payload: &mut Multipart, policy: UploadPolicy) -> AppResult<EventForm> {
    let mut fields = Map::new();
    let mut image = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        if name == IMAGE_FIELD {
            // An empty file input arrives with `filename=""`; a part without a
            // filename carries no file at all.
            if file_name.as_deref().is_none_or(str::is_empty) {
                while field.try_next().await.map_err(multipart_error)?.is_some() {}
                continue;
            }
            if image.is_some() {
                return Err(UploadError::TooManyFiles.into());
            }
            let content_type = field
                .content_type()
                .map(|mime| mime.essence_str().to_string())
                .unwrap_or_default();
            policy.check_content_type(&content_type)?;

            let mut body = BytesMut::new();
            while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
                policy.check_size(body.len() + chunk.len())?;
                body.extend_from_slice(&chunk);
            }

            image = Some(ImageUpload {
                file_name: file_name.unwrap_or_else(|| IMAGE_FIELD.to_string()),
                body: body.freeze(),
            });
            continue;
        }

        if file_name.is_some() {
            return Err(AppError::BadRequest(format!(
                "Unexpected file in field \"{name}\""
            )));
        }

        let mut text = BytesMut::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if text.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                return Err(AppError::BadRequest(format!("\"{name}\" is too large")));
            }
            text.extend_from_slice(&chunk);
        }
        let value = String::from_utf8(text.to_vec())
            .map_err(|_| AppError::BadRequest(format!("\"{name}\" must be valid UTF-8")))?;

        insert_form_value(&mut fields, &name, value);
    }

    Ok(EventForm { fields, image })
}

/// POST /createEvent (multipart)
pub async fn create(state: web::Data<AppState>, mut payload: Multipart) -> AppResult<HttpResponse> {
    let form = read_event_form(&mut payload, UploadPolicy::EVENT_IMAGE).await?;
    let data: NewEvent = CREATE_EVENT.parse(&Value::Object(form.fields))?;

    let stored = match form.image {
        Some(image) => Some(state.blobs.put(&image.file_name, image.body).await?),
        None => None,
    };
    let image_path = stored
        .as_ref()
        .map(|blob| blob.relative_path.clone())
        .unwrap_or_default();

    match state.events.insert(Event::new(data, image_path)).await {
        Ok(event) => {
            tracing::info!(event_id = %event.id, "Event created");
            Ok(HttpResponse::Created().json(event))
        }
        Err(e) => {
            if let Some(blob) = &stored {
                if let Err(cleanup) = state.blobs.remove(blob).await {
                    tracing::warn!(path = %blob.relative_path, error = %cleanup, "Orphaned upload");
                }
            }
            Err(e.into())
        }
    }
}

/// GET /createEvent, GET /events
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let events = state.events.list_all().await?;
    Ok(HttpResponse::Ok().json(events))
}

/// GET /event/{id} and its order/payment summary aliases.
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, "Invalid event id")?;

    let event = state
        .events
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Event not found"))?;

    Ok(HttpResponse::Ok().json(event))
}

/// POST /event/{eventId} - add one like.
pub async fn like(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, "Invalid event id")?;

    let event = state
        .events
        .increment_likes(id)
        .await?
        .ok_or(AppError::NotFound("Event not found"))?;

    Ok(HttpResponse::Ok().json(event))
}
