use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::desk::{BookingDesk, BookingSnapshot, ResidenceBooking};
use super::BookingError;
use crate::remote::{DataService, InquiryId};
use crate::residences::ResidenceId;
use crate::reviews::Language;

/// Returned once the data service has accepted an inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquiryConfirmation {
    pub inquiry_id: InquiryId,
    pub residence_id: ResidenceId,
    pub check_in: String,
    pub check_out: String,
}

/// Coordinates the booking desk with the data service.
///
/// The desk lock is never held while the remote call is pending, so cards of
/// different residences can submit concurrently.
pub struct BookingService<D> {
    desk: Mutex<BookingDesk>,
    service: Arc<D>,
    language: Language,
}

impl<D> BookingService<D>
where
    D: DataService + 'static,
{
    pub fn new(service: Arc<D>, language: Language, today: NaiveDate) -> Self {
        Self {
            desk: Mutex::new(BookingDesk::new(today)),
            service,
            language,
        }
    }

    fn desk(&self) -> MutexGuard<'_, BookingDesk> {
        self.desk.lock().expect("booking desk mutex poisoned")
    }

    /// Run `action` against one residence's card.
    pub fn with_card<T>(
        &self,
        residence: &ResidenceId,
        action: impl FnOnce(&mut ResidenceBooking) -> T,
    ) -> Result<T, BookingError> {
        let mut desk = self.desk();
        let card = desk.card_mut(residence)?;
        Ok(action(card))
    }

    pub fn snapshot(&self, residence: &ResidenceId) -> Result<BookingSnapshot, BookingError> {
        self.with_card(residence, |card| card.snapshot())
    }

    pub fn snapshots(&self) -> Vec<BookingSnapshot> {
        self.desk().snapshots()
    }

    /// Submit the card's inquiry.
    ///
    /// Validation errors never reach the data service. A remote failure keeps
    /// the selected stay and typed fields so the guest can retry.
    pub async fn submit(
        &self,
        residence: &ResidenceId,
    ) -> Result<InquiryConfirmation, BookingError> {
        let language = self.language;
        let inquiry = self
            .with_card(residence, |card| card.begin_submission(language))
            .and_then(|prepared| prepared)?;

        let pending = PendingSubmission::new(self, residence);
        let check_in = inquiry.check_in.clone();
        let check_out = inquiry.check_out.clone();
        let outcome = self.service.submit_booking_inquiry(inquiry).await;

        pending.settle(outcome.is_ok())?;

        match outcome {
            Ok(inquiry_id) => {
                info!(
                    residence = %residence,
                    %check_in,
                    %check_out,
                    "booking inquiry accepted"
                );
                Ok(InquiryConfirmation {
                    inquiry_id,
                    residence_id: residence.clone(),
                    check_in,
                    check_out,
                })
            }
            Err(err) => {
                warn!(residence = %residence, error = %err, "booking inquiry failed");
                Err(BookingError::Submission(err))
            }
        }
    }
}

/// Releases a card's in-flight flag even when the submitting future is dropped
/// before the data service answers. The card keeps its range and form then.
struct PendingSubmission<'a, D> {
    service: &'a BookingService<D>,
    residence: &'a ResidenceId,
    armed: bool,
}

impl<'a, D> PendingSubmission<'a, D>
where
    D: DataService + 'static,
{
    fn new(service: &'a BookingService<D>, residence: &'a ResidenceId) -> Self {
        Self {
            service,
            residence,
            armed: true,
        }
    }

    fn settle(mut self, confirmed: bool) -> Result<(), BookingError> {
        self.armed = false;
        self.service
            .with_card(self.residence, |card| card.finish_submission(confirmed))
    }
}

impl<D> Drop for PendingSubmission<'_, D> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(mut desk) = self.service.desk.lock() else {
            return;
        };
        if let Ok(card) = desk.card_mut(self.residence) {
            card.finish_submission(false);
        }
        warn!(residence = %self.residence, "booking inquiry abandoned before the data service answered");
    }
}
