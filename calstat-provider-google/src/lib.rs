//! Google Calendar as a record source for calstat.

pub mod api;
pub mod app_config;
pub mod auth;
pub mod session;

pub use api::{GoogleApi, fetch_calendars, fetch_event_records};
pub use auth::authenticate;
pub use session::Session;
