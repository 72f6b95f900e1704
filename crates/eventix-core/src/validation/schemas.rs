//! Request schemas, one per mutating route.

use super::{CharClass, FieldKind, FieldRule, Schema};

const NON_NEGATIVE_INT: FieldKind = FieldKind::Integer { min: 0 };
const NON_NEGATIVE_NUMBER: FieldKind = FieldKind::Number { min: 0.0 };

/// POST /register
pub static REGISTER: Schema = Schema::new(&[
    FieldRule::required("name", FieldKind::text_between(2, 100)),
    FieldRule::required("email", FieldKind::Email),
    FieldRule::required(
        "password",
        FieldKind::Text {
            min: 8,
            max: Some(128),
            classes: &[
                CharClass::Uppercase,
                CharClass::Lowercase,
                CharClass::Digit,
                CharClass::Symbol,
            ],
        },
    ),
]);

/// POST /login
pub static LOGIN: Schema = Schema::new(&[
    FieldRule::required("email", FieldKind::Email),
    FieldRule::required("password", FieldKind::text_between(6, 128)),
]);

/// POST /createEvent (multipart text fields)
pub static CREATE_EVENT: Schema = Schema::new(&[
    FieldRule::required("owner", FieldKind::text()),
    FieldRule::required("title", FieldKind::text_between(3, 150)),
    FieldRule::required("description", FieldKind::text_at_least(10)),
    FieldRule::required("organizedBy", FieldKind::text()),
    FieldRule::required("eventDate", FieldKind::IsoDate),
    FieldRule::required("eventTime", FieldKind::text()),
    FieldRule::required("location", FieldKind::text()),
    FieldRule::optional("participants", NON_NEGATIVE_INT),
    FieldRule::optional("count", NON_NEGATIVE_INT),
    FieldRule::optional("income", NON_NEGATIVE_NUMBER),
    FieldRule::required("ticketPrice", NON_NEGATIVE_NUMBER),
    FieldRule::optional("quantity", NON_NEGATIVE_INT),
    FieldRule::optional("likes", NON_NEGATIVE_INT),
    FieldRule::optional("comments", FieldKind::TextList),
]);

/// `ticketDetails` sub-object of a ticket request.
pub static TICKET_DETAILS: Schema = Schema::new(&[
    FieldRule::required("name", FieldKind::text()),
    FieldRule::required("email", FieldKind::Email),
    FieldRule::required("eventname", FieldKind::text()),
    FieldRule::required("eventdate", FieldKind::IsoDate),
    FieldRule::required("eventtime", FieldKind::text()),
    FieldRule::required("ticketprice", NON_NEGATIVE_NUMBER),
    FieldRule::required("qr", FieldKind::text()),
]);

/// POST /tickets
pub static CREATE_TICKET: Schema = Schema::new(&[
    FieldRule::required("userid", FieldKind::text()),
    FieldRule::required("eventid", FieldKind::text()),
    FieldRule::required("ticketDetails", FieldKind::Object(&TICKET_DETAILS)),
    FieldRule::optional("count", NON_NEGATIVE_INT).with_default(0),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewEvent, NewTicket};
    use serde_json::json;

    fn valid_registration() -> serde_json::Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "Engine#1843"
        })
    }

    #[test]
    fn test_register_accepts_valid_payload() {
        assert!(REGISTER.validate(&valid_registration()).is_ok());
    }

    #[test]
    fn test_register_requires_every_field() {
        for field in ["name", "email", "password"] {
            let mut payload = valid_registration();
            payload.as_object_mut().unwrap().remove(field);
            let err = REGISTER.validate(&payload).unwrap_err();
            assert_eq!(err.path, field);
            assert_eq!(err.reason, "is required");
        }
    }

    #[test]
    fn test_register_password_complexity() {
        let cases = [
            ("engine#1843", "must contain at least one uppercase letter"),
            ("ENGINE#1843", "must contain at least one lowercase letter"),
            ("Engine#abcd", "must contain at least one digit"),
            ("Engine18430", "must contain at least one symbol"),
            ("En#1", "length must be at least 8 characters long"),
        ];
        for (password, reason) in cases {
            let mut payload = valid_registration();
            payload["password"] = json!(password);
            let err = REGISTER.validate(&payload).unwrap_err();
            assert_eq!(err.reason, reason, "password {password}");
        }
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let mut payload = valid_registration();
        payload["email"] = json!("not-an-email");
        let err = REGISTER.validate(&payload).unwrap_err();
        assert_eq!(err.to_string(), "\"email\" must be a valid email");
    }

    #[test]
    fn test_login_password_minimum() {
        let err = LOGIN
            .validate(&json!({ "email": "a@b.io", "password": "12345" }))
            .unwrap_err();
        assert_eq!(err.path, "password");
        assert!(LOGIN
            .validate(&json!({ "email": "a@b.io", "password": "123456" }))
            .is_ok());
    }

    #[test]
    fn test_event_form_fields_are_coerced() {
        let event: NewEvent = CREATE_EVENT
            .parse(&json!({
                "owner": "user-1",
                "title": "Rust Meetup",
                "description": "Monthly gathering of Rustaceans.",
                "organizedBy": "Rust Guild",
                "eventDate": "2025-06-01",
                "eventTime": "18:30",
                "location": "Berlin",
                "ticketPrice": "12.5",
                "quantity": "100",
                "comments": ["first!"]
            }))
            .unwrap();

        assert_eq!(event.ticket_price, 12.5);
        assert_eq!(event.quantity, 100);
        assert_eq!(event.likes, 0);
        assert_eq!(event.comments, vec!["first!".to_string()]);
        assert_eq!(event.event_date.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_event_requires_ticket_price() {
        let err = CREATE_EVENT
            .validate(&json!({
                "owner": "user-1",
                "title": "Rust Meetup",
                "description": "Monthly gathering of Rustaceans.",
                "organizedBy": "Rust Guild",
                "eventDate": "2025-06-01",
                "eventTime": "18:30",
                "location": "Berlin"
            }))
            .unwrap_err();
        assert_eq!(err.path, "ticketPrice");
    }

    #[test]
    fn test_ticket_count_defaults_to_zero() {
        let ticket: NewTicket = CREATE_TICKET
            .parse(&json!({
                "userid": "u1",
                "eventid": "e1",
                "ticketDetails": {
                    "name": "Ada",
                    "email": "ada@example.com",
                    "eventname": "Rust Meetup",
                    "eventdate": "2025-06-01T18:30:00Z",
                    "eventtime": "18:30",
                    "ticketprice": 12.5,
                    "qr": "qr-payload"
                }
            }))
            .unwrap();
        assert_eq!(ticket.count, 0);
        assert_eq!(ticket.details.event_name, "Rust Meetup");
    }

    #[test]
    fn test_ticket_details_errors_carry_nested_path() {
        let err = CREATE_TICKET
            .validate(&json!({
                "userid": "u1",
                "eventid": "e1",
                "ticketDetails": {
                    "name": "Ada",
                    "email": "nope",
                    "eventname": "Rust Meetup",
                    "eventdate": "2025-06-01",
                    "eventtime": "18:30",
                    "ticketprice": 1,
                    "qr": "x"
                }
            }))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"ticketDetails.email\" must be a valid email");
    }
}
