//! Booking inquiries: per-residence calendar cards, form validation and submission.

pub mod desk;
pub mod form;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use desk::{BookingDesk, BookingSnapshot, ResidenceBooking};
pub use form::{prepare_inquiry, BookingForm};
pub use router::booking_router;
pub use service::{BookingService, InquiryConfirmation};

use crate::remote::RemoteError;
use crate::residences::ResidenceId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("unknown residence '{0}'")]
    UnknownResidence(ResidenceId),
    #[error("booking form invalid: {0}")]
    Validation(FieldErrors),
    #[error("an inquiry for '{0}' is already being submitted")]
    InFlight(ResidenceId),
    #[error("booking inquiry could not be submitted: {0}")]
    Submission(#[from] RemoteError),
}
