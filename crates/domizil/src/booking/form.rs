use serde::{Deserialize, Serialize};

use crate::calendar::{iso_date, DateRange};
use crate::remote::BookingInquiry;
use crate::residences::Residence;
use crate::reviews::Language;
use crate::validation::{Field, FieldErrors, ValidationError};

const DEFAULT_GUESTS: &str = "2";

/// Contact fields of a residence's booking form, kept as typed by the guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_guests")]
    pub guests: String,
    #[serde(default)]
    pub message: String,
}

fn default_guests() -> String {
    DEFAULT_GUESTS.to_string()
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            guests: default_guests(),
            message: String::new(),
        }
    }
}

impl BookingForm {
    fn guest_count(&self) -> Option<u32> {
        self.guests
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|count| *count > 0)
    }
}

/// Check the stay and contact fields, producing the inquiry on success.
///
/// All failing fields are reported together; nothing is sent anywhere.
pub fn prepare_inquiry(
    residence: &Residence,
    range: DateRange,
    form: &BookingForm,
    language: Language,
) -> Result<BookingInquiry, FieldErrors> {
    let mut errors = FieldErrors::new();

    let endpoints = range.endpoints();
    if endpoints.is_none() {
        errors.insert(Field::DateRange, ValidationError::IncompleteRange);
    }

    errors.require(Field::Name, &form.name);
    errors.require_email(&form.email);

    let guests = form.guest_count();
    if guests.is_none() {
        errors.insert(Field::Guests, ValidationError::InvalidGuests);
    }

    let (Some((check_in, check_out)), Some(guests)) = (endpoints, guests) else {
        return Err(errors);
    };
    errors.into_result()?;

    let phone = form.phone.trim();

    Ok(BookingInquiry {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: (!phone.is_empty()).then(|| phone.to_string()),
        message: form.message.clone(),
        check_in: iso_date(check_in),
        check_out: iso_date(check_out),
        room_type: residence.name.to_string(),
        guests,
        language,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::residences::{self, ResidenceId};
    use chrono::NaiveDate;

    fn residence() -> Residence {
        residences::find(&ResidenceId::new("waldhaus-tannenhof")).expect("catalogue entry")
    }

    fn stay() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2024, 7, 10),
            end: NaiveDate::from_ymd_opt(2024, 7, 15),
        }
    }

    fn filled_form() -> BookingForm {
        BookingForm {
            name: "Jonas Weber".to_string(),
            email: "jonas@example.de".to_string(),
            ..BookingForm::default()
        }
    }

    #[test]
    fn prepares_iso_dates_and_room_type() {
        let inquiry = prepare_inquiry(&residence(), stay(), &filled_form(), Language::De)
            .expect("valid inquiry");

        assert_eq!(inquiry.check_in, "2024-07-10");
        assert_eq!(inquiry.check_out, "2024-07-15");
        assert_eq!(inquiry.room_type, "Waldhaus Tannenhof");
        assert_eq!(inquiry.guests, 2);
        assert_eq!(inquiry.phone, None);
    }

    #[test]
    fn open_range_is_a_field_error() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 7, 10),
            end: None,
        };
        let errors = prepare_inquiry(&residence(), range, &filled_form(), Language::De)
            .expect_err("range incomplete");

        assert_eq!(
            errors.get(Field::DateRange),
            Some(ValidationError::IncompleteRange)
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn reports_every_failing_field() {
        let form = BookingForm {
            guests: "zwei".to_string(),
            email: "not-an-email".to_string(),
            ..BookingForm::default()
        };
        let errors = prepare_inquiry(&residence(), DateRange::empty(), &form, Language::De)
            .expect_err("nothing valid");

        assert!(errors.contains(Field::DateRange));
        assert_eq!(errors.get(Field::Name), Some(ValidationError::Required));
        assert_eq!(errors.get(Field::Email), Some(ValidationError::InvalidEmail));
        assert_eq!(
            errors.get(Field::Guests),
            Some(ValidationError::InvalidGuests)
        );
    }

    #[test]
    fn zero_guests_is_rejected() {
        let form = BookingForm {
            guests: "0".to_string(),
            ..filled_form()
        };
        let errors =
            prepare_inquiry(&residence(), stay(), &form, Language::En).expect_err("no guests");
        assert!(errors.contains(Field::Guests));
    }

    #[test]
    fn blank_phone_is_omitted_and_filled_phone_kept() {
        let form = BookingForm {
            phone: " +49 7651 1234 ".to_string(),
            ..filled_form()
        };
        let inquiry =
            prepare_inquiry(&residence(), stay(), &form, Language::En).expect("valid inquiry");
        assert_eq!(inquiry.phone.as_deref(), Some("+49 7651 1234"));
        assert_eq!(inquiry.language, Language::En);
    }
}
