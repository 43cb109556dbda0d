pub mod auth;
pub mod calendars;
pub mod categories;
pub mod fetch;
pub mod report;
pub mod week;
