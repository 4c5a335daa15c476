use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::aggregate::{merge_reviews, newest_first, summarize, RatingSummary};
use super::domain::{Language, NewReview, Rating, Review, ReviewForm, ReviewId};
use crate::remote::{DataService, RemoteError};
use crate::residences::{self, ResidenceId};
use crate::validation::{Field, FieldErrors, ValidationError};

/// Reviews ready for rendering together with their summary.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDisplay {
    pub residence_id: ResidenceId,
    pub summary: RatingSummary,
    pub average_label: String,
    pub filled_stars: u8,
    pub reviews: Vec<Review>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("unknown residence '{0}'")]
    UnknownResidence(ResidenceId),
    #[error("review '{review}' does not belong to residence '{residence}'")]
    UnknownReview {
        residence: ResidenceId,
        review: ReviewId,
    },
    #[error("review form invalid: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Checks the review form and returns the chosen rating.
pub fn validate_review_form(form: &ReviewForm) -> Result<Rating, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require(Field::Name, &form.name);
    errors.require_email(&form.email);
    errors.require(Field::StayPeriod, &form.stay_period);
    errors.require(Field::Message, &form.message);

    let rating = Rating::new(form.overall_rating);
    if rating.is_none() {
        errors.insert(Field::Rating, ValidationError::RatingOutOfRange);
    }

    match rating {
        Some(rating) if errors.is_empty() => Ok(rating),
        _ => Err(errors),
    }
}

/// Review submission plus the session-local reviews shown before the next reload.
pub struct ReviewBoard<D> {
    service: Arc<D>,
    language: Language,
    local: Mutex<HashMap<ResidenceId, Vec<Review>>>,
}

impl<D> ReviewBoard<D>
where
    D: DataService + 'static,
{
    pub fn new(service: Arc<D>, language: Language) -> Self {
        Self {
            service,
            language,
            local: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and submit a review, then remember it locally for immediate display.
    pub async fn submit(
        &self,
        residence: &ResidenceId,
        form: ReviewForm,
    ) -> Result<Review, ReviewError> {
        ensure_known(residence)?;
        let rating = validate_review_form(&form).map_err(ReviewError::Validation)?;

        let payload = NewReview {
            author: form.name.trim().to_string(),
            content: form.message.trim().to_string(),
            rating,
            language: self.language,
            residence_id: residence.clone(),
        };

        let id = match self.service.add_review(payload.clone()).await {
            Ok(id) => id,
            Err(err) => {
                warn!(residence = %residence, error = %err, "review submission failed");
                return Err(err.into());
            }
        };

        let review = Review {
            id,
            residence_id: payload.residence_id,
            author: payload.author,
            content: payload.content,
            rating: payload.rating,
            language: payload.language,
            timestamp: Utc::now(),
        };

        self.local
            .lock()
            .expect("review board mutex poisoned")
            .entry(residence.clone())
            .or_default()
            .push(review.clone());

        info!(residence = %residence, review = %review.id, rating = rating.value(), "review added");
        Ok(review)
    }

    /// Delete one of `residence`'s reviews remotely and drop any local copy.
    pub async fn delete(
        &self,
        residence: &ResidenceId,
        review: &ReviewId,
    ) -> Result<(), ReviewError> {
        ensure_known(residence)?;

        let held_locally = self
            .local_reviews(residence)
            .iter()
            .any(|candidate| &candidate.id == review);
        if !held_locally {
            let listed = self.service.get_reviews_by_residence(residence).await?;
            if !listed.iter().any(|candidate| &candidate.id == review) {
                return Err(ReviewError::UnknownReview {
                    residence: residence.clone(),
                    review: review.clone(),
                });
            }
        }

        self.service.delete_review(review).await?;

        if let Some(reviews) = self
            .local
            .lock()
            .expect("review board mutex poisoned")
            .get_mut(residence)
        {
            reviews.retain(|candidate| &candidate.id != review);
        }

        info!(residence = %residence, review = %review, "review removed");
        Ok(())
    }

    pub fn local_reviews(&self, residence: &ResidenceId) -> Vec<Review> {
        self.local
            .lock()
            .expect("review board mutex poisoned")
            .get(residence)
            .cloned()
            .unwrap_or_default()
    }

    /// Merge `server` reviews with the local session and summarize the result.
    pub fn display(&self, residence: &ResidenceId, server: &[Review]) -> ReviewDisplay {
        let local = self.local_reviews(residence);
        let merged = merge_reviews(residence, server, &local);
        let summary = summarize(&merged);

        ReviewDisplay {
            residence_id: residence.clone(),
            summary,
            average_label: summary.display_average(),
            filled_stars: summary.filled_stars(),
            reviews: newest_first(merged),
        }
    }

    /// Fetch the current server reviews and build the display for `residence`.
    pub async fn load(&self, residence: &ResidenceId) -> Result<ReviewDisplay, ReviewError> {
        ensure_known(residence)?;
        let server = self.service.get_all_reviews().await?;
        self.forget_persisted(&server);
        Ok(self.display(residence, &server))
    }

    /// Drop local copies the server now lists itself.
    fn forget_persisted(&self, server: &[Review]) {
        let persisted: HashSet<&ReviewId> = server.iter().map(|review| &review.id).collect();
        let mut local = self.local.lock().expect("review board mutex poisoned");
        for reviews in local.values_mut() {
            reviews.retain(|review| !persisted.contains(&review.id));
        }
        local.retain(|_, reviews| !reviews.is_empty());
    }
}

fn ensure_known(residence: &ResidenceId) -> Result<(), ReviewError> {
    residences::find(residence)
        .map(|_| ())
        .ok_or_else(|| ReviewError::UnknownResidence(residence.clone()))
}
