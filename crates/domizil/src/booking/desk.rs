use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::form::{prepare_inquiry, BookingForm};
use super::BookingError;
use crate::calendar::{
    range_label, CalendarCursor, CalendarMonth, DateRange, DateRangeSelector, MonthView,
    SelectionMode,
};
use crate::remote::BookingInquiry;
use crate::residences::{self, Residence, ResidenceId};
use crate::reviews::Language;
use crate::validation::FieldErrors;

/// Calendar, form and submission state of one residence's booking card.
#[derive(Debug, Clone)]
pub struct ResidenceBooking {
    residence: Residence,
    selector: DateRangeSelector,
    cursor: CalendarCursor,
    form: BookingForm,
    errors: FieldErrors,
    in_flight: bool,
}

/// Serializable view of a [`ResidenceBooking`].
#[derive(Debug, Clone, Serialize)]
pub struct BookingSnapshot {
    pub residence_id: ResidenceId,
    pub residence_name: &'static str,
    pub mode: SelectionMode,
    pub range: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nights: Option<i64>,
    pub displayed_month: CalendarCursor,
    pub form: BookingForm,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl ResidenceBooking {
    pub fn new(residence: Residence, today: NaiveDate) -> Self {
        Self {
            residence,
            selector: DateRangeSelector::new(),
            cursor: CalendarCursor::containing(today),
            form: BookingForm::default(),
            errors: FieldErrors::new(),
            in_flight: false,
        }
    }

    pub fn residence(&self) -> &Residence {
        &self.residence
    }

    pub fn selector(&self) -> &DateRangeSelector {
        &self.selector
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn select_day(&mut self, day: NaiveDate) -> DateRange {
        self.selector.select_day(day)
    }

    pub fn reset_selection(&mut self) {
        self.selector.reset();
    }

    pub fn displayed_month(&self) -> CalendarCursor {
        self.cursor
    }

    pub fn show_month(&mut self, cursor: CalendarCursor) {
        self.cursor = cursor;
    }

    /// Replace the typed form fields; stale field errors are dropped with them.
    pub fn update_form(&mut self, form: BookingForm) {
        self.form = form;
        self.errors = FieldErrors::new();
    }

    pub fn month_view(&self, availability: Option<&CalendarMonth>) -> MonthView {
        MonthView::render(self.cursor, &self.selector, availability)
    }

    pub fn snapshot(&self) -> BookingSnapshot {
        let range = self.selector.range();
        BookingSnapshot {
            residence_id: self.residence.id.clone(),
            residence_name: self.residence.name,
            mode: self.selector.mode(),
            range,
            range_label: range
                .endpoints()
                .map(|(start, end)| range_label(start, end)),
            nights: range.nights(),
            displayed_month: self.cursor,
            form: self.form.clone(),
            errors: self.errors.clone(),
            submitting: self.in_flight,
        }
    }

    /// Validate and mark the card as submitting.
    ///
    /// Fails without side effects other than recording field errors; a card
    /// that is already submitting rejects a second attempt.
    pub fn begin_submission(&mut self, language: Language) -> Result<BookingInquiry, BookingError> {
        if self.in_flight {
            return Err(BookingError::InFlight(self.residence.id.clone()));
        }

        match prepare_inquiry(&self.residence, self.selector.range(), &self.form, language) {
            Ok(inquiry) => {
                self.errors = FieldErrors::new();
                self.in_flight = true;
                Ok(inquiry)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(BookingError::Validation(errors))
            }
        }
    }

    /// Settle a submission: a confirmed inquiry clears the card, a failed one keeps it for retry.
    pub fn finish_submission(&mut self, confirmed: bool) {
        self.in_flight = false;
        if confirmed {
            self.selector.reset();
            self.form = BookingForm::default();
            self.errors = FieldErrors::new();
        }
    }
}

/// One independent booking card per residence, keyed by residence id.
#[derive(Debug, Clone)]
pub struct BookingDesk {
    cards: HashMap<ResidenceId, ResidenceBooking>,
}

impl BookingDesk {
    /// A card for every catalogue residence, each showing the month of `today`.
    pub fn new(today: NaiveDate) -> Self {
        let cards = residences::catalogue()
            .into_iter()
            .map(|residence| {
                (
                    residence.id.clone(),
                    ResidenceBooking::new(residence, today),
                )
            })
            .collect();
        Self { cards }
    }

    pub fn card(&self, residence: &ResidenceId) -> Result<&ResidenceBooking, BookingError> {
        self.cards
            .get(residence)
            .ok_or_else(|| BookingError::UnknownResidence(residence.clone()))
    }

    pub fn card_mut(
        &mut self,
        residence: &ResidenceId,
    ) -> Result<&mut ResidenceBooking, BookingError> {
        self.cards
            .get_mut(residence)
            .ok_or_else(|| BookingError::UnknownResidence(residence.clone()))
    }

    /// Snapshots in catalogue order.
    pub fn snapshots(&self) -> Vec<BookingSnapshot> {
        residences::catalogue()
            .iter()
            .filter_map(|residence| self.cards.get(&residence.id))
            .map(ResidenceBooking::snapshot)
            .collect()
    }
}
