//! Booking inquiries, availability calendars and guest reviews for the Black Forest residences.

pub mod booking;
pub mod calendar;
pub mod config;
pub mod contact;
pub mod error;
pub mod remote;
pub mod residences;
pub mod reviews;
pub mod telemetry;
pub mod validation;
