//! Domain entities - the core business objects.

mod event;
mod ticket;
mod user;

pub use event::{Event, NewEvent};
pub use ticket::{NewTicket, Ticket, TicketDetails};
pub use user::{User, mask_email};
