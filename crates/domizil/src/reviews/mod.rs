//! Guest reviews: rating aggregation, session-local optimistic reviews and HTTP endpoints.

pub mod aggregate;
pub mod board;
pub mod domain;
pub mod router;

pub use aggregate::{merge_reviews, newest_first, summarize, RatingSummary};
pub use board::{validate_review_form, ReviewBoard, ReviewDisplay, ReviewError};
pub use domain::{Language, NewReview, Rating, RatingOutOfRange, Review, ReviewForm, ReviewId};
pub use router::review_router;
