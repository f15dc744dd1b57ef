//! Currency normalization of collective stats.
//!
//! Every amount the pipeline sums must be in the host currency. Collectives
//! with no currency are assumed to already report in it.
//!
//! Conversion rules:
//! 1. Series nodes convert at the rate for the year in their own date.
//! 2. Period totals convert at the rate for the latest year seen in the
//!    period's series, or `as_of_year` when the series is empty. When the
//!    unconverted series summed exactly to `raised`, `raised` becomes the sum
//!    of the converted nodes so the two stay equal.
//! 3. Converted amounts are rounded to the nearest minor unit.
//! 4. A missing rate is fatal.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use horizons_common::{Collective, HorizonsError, PeriodKey, PeriodStats, RateConfig};

/// Source of `from -> to` conversion rates.
pub trait RateProvider: Send + Sync {
    fn rate(&self, from: &str, to: &str, as_of_year: i32) -> Option<f64>;
}

/// Fixed yearly rates, usually loaded from host configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticRates {
    rates: HashMap<(String, String, i32), f64>,
}

impl StaticRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: &str, to: &str, year: i32, rate: f64) {
        self.rates.insert(
            (from.to_uppercase(), to.to_uppercase(), year),
            rate,
        );
    }

    pub fn from_config(rates: &[RateConfig]) -> Self {
        let mut out = Self::new();
        for r in rates {
            out.insert(&r.from, &r.to, r.year, r.rate);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateProvider for StaticRates {
    fn rate(&self, from: &str, to: &str, as_of_year: i32) -> Option<f64> {
        let (from, to) = (from.to_uppercase(), to.to_uppercase());
        if from == to {
            return Some(1.0);
        }
        self.rates.get(&(from, to, as_of_year)).copied()
    }
}

/// How to treat collectives whose currency differs from the host's.
#[derive(Clone, Copy)]
pub enum CurrencyPolicy<'a> {
    /// Reject them.
    Strict,
    /// Convert their amounts with `rates`.
    Convert {
        rates: &'a dyn RateProvider,
        as_of_year: i32,
    },
}

impl std::fmt::Debug for CurrencyPolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrencyPolicy::Strict => f.write_str("Strict"),
            CurrencyPolicy::Convert { as_of_year, .. } => f
                .debug_struct("Convert")
                .field("as_of_year", as_of_year)
                .finish_non_exhaustive(),
        }
    }
}

fn is_foreign(collective: &Collective, host_currency: &str) -> bool {
    collective
        .currency
        .as_deref()
        .is_some_and(|c| !c.eq_ignore_ascii_case(host_currency))
}

/// Bring every collective's amounts into `host_currency`.
///
/// Borrows the input untouched when nothing needs converting.
pub fn normalize_currency<'a>(
    collectives: &'a [Collective],
    host_currency: &str,
    policy: &CurrencyPolicy<'_>,
) -> Result<Cow<'a, [Collective]>, HorizonsError> {
    let Some(first) = collectives.iter().find(|c| is_foreign(c, host_currency)) else {
        return Ok(Cow::Borrowed(collectives));
    };

    let (rates, as_of_year) = match policy {
        CurrencyPolicy::Strict => {
            return Err(HorizonsError::CurrencyMismatch {
                slug: first.slug.clone(),
                expected: host_currency.to_string(),
                found: first.currency.clone().unwrap_or_default(),
            });
        }
        CurrencyPolicy::Convert { rates, as_of_year } => (*rates, *as_of_year),
    };

    let mut out = collectives.to_vec();
    let mut converted = 0usize;
    for c in out.iter_mut().filter(|c| is_foreign(c, host_currency)) {
        let from = c.currency.clone().unwrap_or_default();
        if let Some(stats) = c.stats.as_mut() {
            for period in PeriodKey::EVERY {
                if let Some(p) = stats.get_mut(period) {
                    convert_period(p, &from, host_currency, rates, as_of_year)?;
                }
            }
        }
        c.currency = Some(host_currency.to_string());
        converted += 1;
    }

    tracing::debug!(converted, host_currency, "Converted collective currencies");
    Ok(Cow::Owned(out))
}

fn series_year(date: &str) -> Option<i32> {
    let day = date.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok().map(|d| d.year())
}

fn convert_amount(amount: i64, rate: f64) -> i64 {
    (amount as f64 * rate).round() as i64
}

fn convert_period(
    stats: &mut PeriodStats,
    from: &str,
    to: &str,
    rates: &dyn RateProvider,
    as_of_year: i32,
) -> Result<(), HorizonsError> {
    let lookup = |year: i32| {
        rates
            .rate(from, to, year)
            .ok_or_else(|| HorizonsError::UnsupportedCurrencyPair {
                from: from.to_string(),
                to: to.to_string(),
                year,
            })
    };

    let series_total: i64 = stats.raised_series.iter().map(|n| n.amount).sum();
    let series_matches_raised = !stats.raised_series.is_empty() && series_total == stats.raised;

    let mut latest_year: Option<i32> = None;
    for node in &mut stats.raised_series {
        let year = series_year(&node.date).unwrap_or(as_of_year);
        latest_year = Some(latest_year.map_or(year, |y| y.max(year)));
        node.amount = convert_amount(node.amount, lookup(year)?);
    }

    let total_rate = lookup(latest_year.unwrap_or(as_of_year))?;
    stats.raised = if series_matches_raised {
        stats.raised_series.iter().map(|n| n.amount).sum()
    } else {
        convert_amount(stats.raised, total_rate)
    };
    stats.spent = convert_amount(stats.spent, total_rate);
    Ok(())
}
