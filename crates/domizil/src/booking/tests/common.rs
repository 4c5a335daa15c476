use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::Notify;

use crate::booking::{BookingForm, BookingService};
use crate::remote::{BookingInquiry, ContactMessage, DataService, InquiryId, MessageId, RemoteError};
use crate::residences::ResidenceId;
use crate::reviews::{summarize, Language, NewReview, RatingSummary, Review, ReviewId};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn tannenhof() -> ResidenceId {
    ResidenceId::new("waldhaus-tannenhof")
}

pub(super) fn fichtenberg() -> ResidenceId {
    ResidenceId::new("domizil-fichtenberg")
}

pub(super) fn filled_form() -> BookingForm {
    BookingForm {
        name: "Jonas Weber".to_string(),
        email: "jonas@example.de".to_string(),
        phone: String::new(),
        guests: "3".to_string(),
        message: "Wir reisen mit Hund an.".to_string(),
    }
}

pub(super) fn build_service() -> (BookingService<RecordingService>, Arc<RecordingService>) {
    let remote = Arc::new(RecordingService::default());
    let service = BookingService::new(remote.clone(), Language::De, date(2024, 7, 1));
    (service, remote)
}

/// Fill range and form for `residence`.
pub(super) fn prepare<D: DataService + 'static>(
    service: &BookingService<D>,
    residence: &ResidenceId,
    start: NaiveDate,
    end: NaiveDate,
) {
    service
        .with_card(residence, |card| {
            card.select_day(start);
            card.select_day(end);
            card.update_form(filled_form());
        })
        .expect("known residence");
}

#[derive(Default)]
pub(super) struct RecordingService {
    inquiries: Mutex<Vec<BookingInquiry>>,
    messages: Mutex<Vec<ContactMessage>>,
    reviews: Mutex<Vec<Review>>,
    pub(super) fail: AtomicBool,
    calls: AtomicUsize,
}

impl RecordingService {
    pub(super) fn failing() -> Self {
        let service = Self::default();
        service.fail.store(true, Ordering::SeqCst);
        service
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn inquiries(&self) -> Vec<BookingInquiry> {
        self.inquiries.lock().expect("inquiry mutex poisoned").clone()
    }

    fn check(&self) -> Result<usize, RemoteError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("connection refused".to_string()));
        }
        Ok(call)
    }
}

#[async_trait]
impl DataService for RecordingService {
    async fn submit_booking_inquiry(
        &self,
        inquiry: BookingInquiry,
    ) -> Result<InquiryId, RemoteError> {
        let call = self.check()?;
        self.inquiries
            .lock()
            .expect("inquiry mutex poisoned")
            .push(inquiry);
        Ok(InquiryId(format!("inq-{call:04}")))
    }

    async fn submit_contact_message(
        &self,
        message: ContactMessage,
    ) -> Result<MessageId, RemoteError> {
        let call = self.check()?;
        self.messages
            .lock()
            .expect("message mutex poisoned")
            .push(message);
        Ok(MessageId(format!("msg-{call:04}")))
    }

    async fn add_review(&self, review: NewReview) -> Result<ReviewId, RemoteError> {
        let call = self.check()?;
        let id = ReviewId(format!("rev-{call:04}"));
        self.reviews
            .lock()
            .expect("review mutex poisoned")
            .push(Review {
                id: id.clone(),
                residence_id: review.residence_id,
                author: review.author,
                content: review.content,
                rating: review.rating,
                language: review.language,
                timestamp: chrono::Utc::now(),
            });
        Ok(id)
    }

    async fn get_all_reviews(&self) -> Result<Vec<Review>, RemoteError> {
        self.check()?;
        Ok(self.reviews.lock().expect("review mutex poisoned").clone())
    }

    async fn get_reviews_by_residence(
        &self,
        residence: &ResidenceId,
    ) -> Result<Vec<Review>, RemoteError> {
        self.check()?;
        Ok(self
            .reviews
            .lock()
            .expect("review mutex poisoned")
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
        self.check()?;
        self.reviews
            .lock()
            .expect("review mutex poisoned")
            .retain(|candidate| &candidate.id != review);
        Ok(())
    }
}

/// Holds booking inquiries for one room type until released.
pub(super) struct GatedService {
    pub(super) held_room: &'static str,
    pub(super) entered: Notify,
    pub(super) release: Notify,
    pub(super) inner: RecordingService,
}

impl GatedService {
    pub(super) fn holding(held_room: &'static str) -> Self {
        Self {
            held_room,
            entered: Notify::new(),
            release: Notify::new(),
            inner: RecordingService::default(),
        }
    }
}

#[async_trait]
impl DataService for GatedService {
    async fn submit_booking_inquiry(
        &self,
        inquiry: BookingInquiry,
    ) -> Result<InquiryId, RemoteError> {
        if inquiry.room_type == self.held_room {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.submit_booking_inquiry(inquiry).await
    }

    async fn submit_contact_message(
        &self,
        message: ContactMessage,
    ) -> Result<MessageId, RemoteError> {
        self.inner.submit_contact_message(message).await
    }

    async fn add_review(&self, review: NewReview) -> Result<ReviewId, RemoteError> {
        self.inner.add_review(review).await
    }

    async fn get_all_reviews(&self) -> Result<Vec<Review>, RemoteError> {
        self.inner.get_all_reviews().await
    }

    async fn get_reviews_by_residence(
        &self,
        residence: &ResidenceId,
    ) -> Result<Vec<Review>, RemoteError> {
        self.inner.get_reviews_by_residence(residence).await
    }

    async fn get_rating_summary_by_residence(
        &self,
        residence: &ResidenceId,
    ) -> Result<RatingSummary, RemoteError> {
        self.inner.get_rating_summary_by_residence(residence).await
    }

    async fn delete_review(&self, review: &ReviewId) -> Result<(), RemoteError> {
        self.inner.delete_review(review).await
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
