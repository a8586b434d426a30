use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::errors::ServiceError;

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// A calendar month of a given year (month is 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::InvalidInput(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ServiceError::InvalidInput(format!("year {} is out of range", year))
        })?;
        Ok(Self { year, month })
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // `new`/`of` only admit months whose first day exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_day();
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match next {
            Some(next) => (next - first).num_days() as u32,
            None => 31,
        }
    }

    /// The date of `day` in this month, or `None` when the day does not exist.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Number of blank cells before day 1 in a Monday-first calendar grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_monday()
    }

    /// Planning sheet columns: every day of the month with its weekday.
    pub fn planning_days(&self) -> Vec<PlanningDay> {
        (1..=self.days_in_month())
            .filter_map(|day| self.date(day))
            .map(|date| {
                let weekday = date.weekday();
                PlanningDay {
                    day: date.day(),
                    date,
                    weekday: weekday.to_string(),
                    is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
                }
            })
            .collect()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlanningDay {
    pub day: u32,
    pub date: NaiveDate,
    pub weekday: String,
    pub is_weekend: bool,
}

/// Long Spanish date, e.g. "05 de mayo de 2024".
pub fn spanish_long_date(date: NaiveDate) -> String {
    let month = SPANISH_MONTHS[date.month0() as usize];
    format!("{:02} de {} de {}", date.day(), month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_months() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
        assert!(YearMonth::new(2024, 12).is_ok());
    }

    #[test]
    fn counts_days_including_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(YearMonth::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn date_is_none_for_missing_days() {
        let april = YearMonth::new(2024, 4).unwrap();
        assert!(april.date(31).is_none());
        assert!(april.date(0).is_none());
        assert_eq!(april.date(30), NaiveDate::from_ymd_opt(2024, 4, 30));
    }

    #[test]
    fn monday_first_layout() {
        // 1 May 2024 was a Wednesday
        let may = YearMonth::new(2024, 5).unwrap();
        assert_eq!(may.leading_blanks(), 2);
        let days = may.planning_days();
        assert_eq!(days.len(), 31);
        assert!(days[3].is_weekend); // Saturday 4th
        assert!(!days[5].is_weekend); // Monday 6th
    }

    #[test]
    fn formats_spanish_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
        assert_eq!(spanish_long_date(date), "05 de octubre de 2024");
        assert_eq!(YearMonth::of(date).to_string(), "2024-10");
    }
}
