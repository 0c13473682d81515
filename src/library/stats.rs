//! Reading statistics over a set of books.
//!
//! Everything keys off `date_read`, which users enter as `YYYY/MM/DD`,
//! `YYYY/MM` or just `YYYY`. Books whose date does not parse are left out of
//! per-year views rather than rejected.

use serde::Serialize;

use crate::model::LocalBook;

/// Earliest year accepted in a read date
pub const MIN_YEAR: i32 = 1900;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A parsed `date_read` value. Month and day are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ReadDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("empty date")]
    Empty,
    #[error("invalid {part}: {value:?}")]
    NotANumber { part: &'static str, value: String },
    #[error("year must be >= 1900, got {0}")]
    YearTooEarly(i32),
    #[error("month must be 1-12, got {0}")]
    MonthOutOfRange(u32),
    #[error("day must be 1-31, got {0}")]
    DayOutOfRange(u32),
}

impl ReadDate {
    /// Parse `YYYY[/MM[/DD]]`. Empty month or day segments count as absent.
    pub fn parse(input: &str) -> Result<Self, DateParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DateParseError::Empty);
        }

        let mut parts = input.split('/');
        let year_part = parts.next().unwrap_or_default();
        let year: i32 = year_part
            .trim()
            .parse()
            .map_err(|_| DateParseError::NotANumber {
                part: "year",
                value: year_part.to_string(),
            })?;
        if year < MIN_YEAR {
            return Err(DateParseError::YearTooEarly(year));
        }

        let month = parse_part(parts.next(), "month")?;
        if let Some(m) = month
            && !(1..=12).contains(&m)
        {
            return Err(DateParseError::MonthOutOfRange(m));
        }

        let day = parse_part(parts.next(), "day")?;
        if let Some(d) = day
            && !(1..=31).contains(&d)
        {
            return Err(DateParseError::DayOutOfRange(d));
        }

        Ok(Self { year, month, day })
    }
}

fn parse_part(part: Option<&str>, name: &'static str) -> Result<Option<u32>, DateParseError> {
    match part.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| DateParseError::NotANumber {
                part: name,
                value: value.to_string(),
            }),
    }
}

/// Parsed `date_read`, if present and valid
pub(crate) fn read_date(book: &LocalBook) -> Option<ReadDate> {
    book.date_read
        .as_deref()
        .and_then(|d| ReadDate::parse(d).ok())
}

/// Totals for one year's worth of books
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub year: i32,
    pub total_books: usize,
    /// Sum over books with a known, non-zero page count
    pub total_pages: u64,
    pub average_per_month: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// 1-12
    pub month: u32,
    pub month_name: &'static str,
    pub count: usize,
}

/// Books read in `year`
pub fn filter_by_year<B: AsRef<LocalBook> + Clone>(books: &[B], year: i32) -> Vec<B> {
    books
        .iter()
        .filter(|b| read_date(b.as_ref()).is_some_and(|d| d.year == year))
        .cloned()
        .collect()
}

/// Books read in `month` (1-12) of any year
pub fn filter_by_month<B: AsRef<LocalBook> + Clone>(books: &[B], month: u32) -> Vec<B> {
    books
        .iter()
        .filter(|b| read_date(b.as_ref()).is_some_and(|d| d.month == Some(month)))
        .cloned()
        .collect()
}

/// Books on `shelf` (exact match)
pub fn filter_by_shelf<B: AsRef<LocalBook> + Clone>(books: &[B], shelf: &str) -> Vec<B> {
    books
        .iter()
        .filter(|b| b.as_ref().shelf.as_deref() == Some(shelf))
        .cloned()
        .collect()
}

/// Years that have at least one read book, newest first
pub fn available_years<B: AsRef<LocalBook>>(books: &[B]) -> Vec<i32> {
    let mut years: Vec<i32> = books
        .iter()
        .filter_map(|b| read_date(b.as_ref()))
        .map(|d| d.year)
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Totals for `books`, which the caller has already narrowed to `year`.
pub fn calculate_statistics<B: AsRef<LocalBook>>(books: &[B], year: i32) -> Statistics {
    let total_books = books.len();
    let total_pages = books
        .iter()
        .filter_map(|b| b.as_ref().page_count())
        .filter(|&p| p > 0)
        .map(u64::from)
        .sum();

    Statistics {
        year,
        total_books,
        total_pages,
        average_per_month: total_books as f64 / 12.0,
    }
}

/// Books per month, always twelve entries from January
pub fn monthly_breakdown<B: AsRef<LocalBook>>(books: &[B]) -> Vec<MonthlyCount> {
    let mut counts = [0usize; 12];
    for month in books
        .iter()
        .filter_map(|b| read_date(b.as_ref()))
        .filter_map(|d| d.month)
    {
        counts[(month - 1) as usize] += 1;
    }

    MONTH_NAMES
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (&month_name, count))| MonthlyCount {
            month: i as u32 + 1,
            month_name,
            count,
        })
        .collect()
}

/// Percentage of a yearly goal reached, capped at 100
pub fn goal_progress(read: usize, target: u32) -> f64 {
    if target == 0 {
        return 100.0;
    }
    (read as f64 / f64::from(target) * 100.0).min(100.0)
}
