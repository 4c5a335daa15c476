//! Boundary to the remote data service that stores inquiries, messages and reviews.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::residences::ResidenceId;
use crate::reviews::{Language, NewReview, RatingSummary, Review, ReviewId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InquiryId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Booking inquiry exactly as the data service receives it.
///
/// `check_in` and `check_out` are `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub check_in: String,
    pub check_out: String,
    pub room_type: String,
    pub guests: u32,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub language: Language,
}

/// Failure reported by (or while reaching) the data service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("data service unavailable: {0}")]
    Unavailable(String),
    #[error("data service rejected the request: {0}")]
    Rejected(String),
    #[error("record not found")]
    NotFound,
}

/// Asynchronous procedure-call interface of the data service.
#[async_trait]
pub trait DataService: Send + Sync {
    async fn submit_booking_inquiry(&self, inquiry: BookingInquiry)
        -> Result<InquiryId, RemoteError>;

    async fn submit_contact_message(&self, message: ContactMessage)
        -> Result<MessageId, RemoteError>;

    async fn add_review(&self, review: NewReview) -> Result<ReviewId, RemoteError>;

    async fn get_all_reviews(&self) -> Result<Vec<Review>, RemoteError>;

    async fn get_reviews_by_residence(
        &self,
        residence: &ResidenceId,
    ) -> Result<Vec<Review>, RemoteError>;

    async fn get_rating_summary_by_residence(
        &self,
        residence: &ResidenceId,
    ) -> Result<RatingSummary, RemoteError>;

    async fn delete_review(&self, review: &ReviewId) -> Result<(), RemoteError>;
}
