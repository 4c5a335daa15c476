use crate::infra::{parse_date, InMemoryDataService};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use domizil::booking::{BookingForm, BookingService};
use domizil::calendar::{DayCell, MonthView};
use domizil::contact::{ContactForm, ContactService};
use domizil::error::AppError;
use domizil::residences::{self, ResidenceId};
use domizil::reviews::{Language, ReviewBoard, ReviewForm};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Residence slug to book (defaults to the first residence in the catalogue)
    #[arg(long)]
    pub(crate) residence: Option<String>,
    /// Arrival day (YYYY-MM-DD). Defaults to today + 9 days.
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: Option<NaiveDate>,
    /// Departure day (YYYY-MM-DD). Defaults to check-in + 5 days.
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_out: Option<NaiveDate>,
    /// Override the current date (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Star rating for the review posted after the stay
    #[arg(long, default_value_t = 5)]
    pub(crate) rating: u8,
    /// Send inquiries and reviews in English instead of German
    #[arg(long)]
    pub(crate) english: bool,
    /// Skip the review and contact portions of the demo.
    #[arg(long)]
    pub(crate) skip_review: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        residence,
        check_in,
        check_out,
        today,
        rating,
        english,
        skip_review,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let check_in = check_in.unwrap_or(today + Duration::days(9));
    let check_out = check_out.unwrap_or(check_in + Duration::days(5));
    let language = if english { Language::En } else { Language::De };
    let residence = resolve_residence(residence)?;

    let remote = Arc::new(InMemoryDataService::default());
    let booking = BookingService::new(remote.clone(), language, today);

    println!("Booking demo for {residence}");
    let view = booking
        .with_card(&residence, |card| {
            card.select_day(check_in);
            card.select_day(check_out);
            card.update_form(BookingForm {
                name: "Familie Demo".to_string(),
                email: "demo@example.de".to_string(),
                message: "Anreise gegen Abend.".to_string(),
                ..BookingForm::default()
            });
            card.month_view(None)
        })
        .map_err(|err| AppError::InvalidArgument(err.to_string()))?;
    render_month(&view);

    let snapshot = booking
        .snapshot(&residence)
        .map_err(|err| AppError::InvalidArgument(err.to_string()))?;
    if let (Some(label), Some(nights)) = (&snapshot.range_label, snapshot.nights) {
        println!("Selected stay: {label} ({nights} nights)");
    }

    match booking.submit(&residence).await {
        Ok(confirmation) => println!(
            "Inquiry {} sent ({} to {})",
            confirmation.inquiry_id.0, confirmation.check_in, confirmation.check_out
        ),
        Err(err) => println!("Inquiry not sent: {err}"),
    }
    for (id, inquiry) in remote.inquiries() {
        println!(
            "  stored {} | {} | {} guests | {}",
            id.0,
            inquiry.room_type,
            inquiry.guests,
            inquiry.language.code()
        );
    }

    if skip_review {
        return Ok(());
    }

    let board = ReviewBoard::new(remote.clone(), language);
    let form = ReviewForm {
        name: "Familie Demo".to_string(),
        email: "demo@example.de".to_string(),
        stay_period: format!("{} – {}", check_in, check_out),
        overall_rating: rating,
        message: "Ruhige Lage, sehr gepflegt.".to_string(),
    };
    match board.submit(&residence, form).await {
        Ok(review) => println!("\nReview {} posted", review.id.0),
        Err(err) => println!("\nReview rejected: {err}"),
    }

    let display = board
        .load(&residence)
        .await
        .map_err(|err| AppError::InvalidArgument(err.to_string()))?;
    println!(
        "Rating: {} ({} of 5 stars, {} reviews)",
        display.average_label,
        display.filled_stars,
        display.summary.total_reviews
    );

    let contact = ContactService::new(remote.clone(), language);
    let reply = contact
        .submit(ContactForm {
            name: "Familie Demo".to_string(),
            email: "demo@example.de".to_string(),
            subject: "Haustiere".to_string(),
            message: "Dürfen wir unseren Hund mitbringen?".to_string(),
        })
        .await;
    match reply {
        Ok(id) => println!("Contact message {} sent", id.0),
        Err(err) => println!("Contact message not sent: {err}"),
    }
    println!("Messages stored: {}", remote.messages().len());

    Ok(())
}

fn resolve_residence(slug: Option<String>) -> Result<ResidenceId, AppError> {
    match slug {
        Some(slug) => {
            let id = ResidenceId::new(slug);
            residences::find(&id)
                .map(|residence| residence.id)
                .ok_or_else(|| AppError::InvalidArgument(format!("unknown residence '{id}'")))
        }
        None => residences::catalogue()
            .into_iter()
            .next()
            .map(|residence| residence.id)
            .ok_or_else(|| AppError::InvalidArgument("no residences configured".to_string())),
    }
}

fn render_month(view: &MonthView) {
    println!("\n{}", view.label);
    println!(" Mo Di Mi Do Fr Sa So");
    for week in view.cells.chunks(7) {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                DayCell::Blank => "   ".to_string(),
                DayCell::Day(day) => {
                    let marker = if day.is_start || day.is_end {
                        '['
                    } else if day.is_in_range {
                        '*'
                    } else {
                        ' '
                    };
                    format!("{marker}{:>2}", day.day)
                }
            })
            .collect();
        println!("{line}");
    }
}
