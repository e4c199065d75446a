//! sea-orm entities owned by the auth service.

pub mod accounts;
pub mod linked_identities;
pub mod outbox_events;
pub mod password_reset_tickets;
pub mod sessions;
