//! Date windows behind each period key.
//!
//! - `ALL`: Jan 1 of the host's start year to the end of the current year.
//! - `PAST_YEAR`: start of the month twelve months ago to now.
//! - `PAST_QUARTER`: Monday of the ISO week twelve weeks ago to now.
//!
//! All boundaries are UTC. `now` is passed in so the windows are reproducible.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use horizons_common::{HorizonsError, PeriodKey, TimeUnit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub time_unit: TimeUnit,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn invalid(what: &str) -> HorizonsError {
    HorizonsError::Validation(format!("date out of range computing {what}"))
}

pub fn window(
    period: PeriodKey,
    now: DateTime<Utc>,
    start_year: i32,
) -> Result<PeriodWindow, HorizonsError> {
    let today = now.date_naive();
    let (date_from, date_to) = match period {
        PeriodKey::All => {
            if start_year > today.year() {
                return Err(HorizonsError::Validation(format!(
                    "start year {start_year} is in the future"
                )));
            }
            let from = NaiveDate::from_ymd_opt(start_year, 1, 1).ok_or_else(|| invalid("ALL"))?;
            let to = NaiveDate::from_ymd_opt(today.year(), 12, 31)
                .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
                .ok_or_else(|| invalid("ALL"))?
                .and_utc();
            (start_of_day(from), to)
        }
        PeriodKey::PastYear => {
            let from = today
                .with_day(1)
                .and_then(|d| d.checked_sub_months(Months::new(12)))
                .ok_or_else(|| invalid("PAST_YEAR"))?;
            (start_of_day(from), now)
        }
        PeriodKey::PastQuarter => {
            let back = today
                .checked_sub_signed(Duration::weeks(12))
                .ok_or_else(|| invalid("PAST_QUARTER"))?;
            let monday = back
                .checked_sub_signed(Duration::days(
                    back.weekday().num_days_from_monday().into(),
                ))
                .ok_or_else(|| invalid("PAST_QUARTER"))?;
            (start_of_day(monday), now)
        }
    };

    Ok(PeriodWindow {
        date_from,
        date_to,
        time_unit: period.time_unit(),
    })
}
