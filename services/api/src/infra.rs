use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use domizil::calendar::parse_iso_date;
use domizil::remote::{
    BookingInquiry, ContactMessage, DataService, InquiryId, MessageId, RemoteError,
};
use domizil::residences::ResidenceId;
use domizil::reviews::{summarize, NewReview, RatingSummary, Review, ReviewId};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the hosted data service.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDataService {
    inquiries: Arc<Mutex<Vec<(InquiryId, BookingInquiry)>>>,
    messages: Arc<Mutex<Vec<(MessageId, ContactMessage)>>>,
    reviews: Arc<Mutex<Vec<Review>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryDataService {
    fn next_id(&self, prefix: &str) -> String {
        let value = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{value:06}")
    }

    pub(crate) fn inquiries(&self) -> Vec<(InquiryId, BookingInquiry)> {
        self.inquiries
            .lock()
            .expect("inquiry mutex poisoned")
            .clone()
    }

    pub(crate) fn messages(&self) -> Vec<(MessageId, ContactMessage)> {
        self.messages.lock().expect("message mutex poisoned").clone()
    }
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn submit_booking_inquiry(
        &self,
        inquiry: BookingInquiry,
    ) -> Result<InquiryId, RemoteError> {
        let id = InquiryId(self.next_id("inq"));
        let mut guard = self.inquiries.lock().expect("inquiry mutex poisoned");
        guard.push((id.clone(), inquiry));
        Ok(id)
    }

    async fn submit_contact_message(
        &self,
        message: ContactMessage,
    ) -> Result<MessageId, RemoteError> {
        let id = MessageId(self.next_id("msg"));
        let mut guard = self.messages.lock().expect("message mutex poisoned");
        guard.push((id.clone(), message));
        Ok(id)
    }

    async fn add_review(&self, review: NewReview) -> Result<ReviewId, RemoteError> {
        let id = ReviewId(self.next_id("rev"));
        let mut guard = self.reviews.lock().expect("review mutex poisoned");
        guard.push(Review {
            id: id.clone(),
            residence_id: review.residence_id,
            author: review.author,
            content: review.content,
            rating: review.rating,
            language: review.language,
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    async fn get_all_reviews(&self) -> Result<Vec<Review>, RemoteError> {
        Ok(self.reviews.lock().expect("review mutex poisoned").clone())
    }

    async fn get_reviews_by_residence(
        &self,
        residence: &ResidenceId,
    ) -> Result<Vec<Review>, RemoteError> {
        let guard = self.reviews.lock().expect("review mutex poisoned");
        Ok(guard
            .iter()
            .filter(|review| &review.residence_id == residence)
            .cloned()
            .collect())
    }

    async fn get_rating_summary_by_residence(
        &self,
        residence: &ResidenceId,
    ) -> Result<RatingSummary, RemoteError> {
        let reviews = self.get_reviews_by_residence(residence).await?;
        Ok(summarize(&reviews))
    }

    async fn delete_review(&self, review: &ReviewId) -> Result<(), RemoteError> {
        let mut guard = self.reviews.lock().expect("review mutex poisoned");
        let before = guard.len();
        guard.retain(|candidate| &candidate.id != review);
        if guard.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_iso_date(raw.trim()).map_err(|err| err.to_string())
}
