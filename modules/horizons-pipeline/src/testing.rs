// Test helpers for building collectives and categories.
//
// Builder-style: `collective("a").tags(&["climate"]).located(...)`, with
// `period_stats(...)` fed to `.with_period(...)` for amounts.

use horizons_common::{
    Category, Collective, Location, PeriodKey, PeriodStats, SeriesNode, StatsByPeriod,
};

pub fn collective(slug: &str) -> Collective {
    Collective {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
        image_url: None,
        description: None,
        created_at: None,
        tags: Vec::new(),
        category_tags: None,
        currency: None,
        location: None,
        stats: None,
    }
}

pub fn location(region: &str, country: &str, domestic: &str, city: &str) -> Location {
    let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
    Location {
        region: opt(region),
        country_code: opt(country),
        domestic_region: opt(domestic),
        city: opt(city),
    }
}

pub fn period_stats(raised: i64, spent: i64, series: &[(&str, i64)]) -> PeriodStats {
    PeriodStats {
        raised,
        spent,
        contributors: (raised / 100).max(0) as u64,
        contributions: (raised / 50).max(0) as u64,
        raised_series: series
            .iter()
            .map(|(date, amount)| SeriesNode {
                date: date.to_string(),
                amount: *amount,
            })
            .collect(),
    }
}

pub fn category(tag: &str) -> Category {
    Category::new(tag, tag, "#000000")
}

pub trait CollectiveExt {
    fn tags(self, tags: &[&str]) -> Self;
    fn located(self, location: Location) -> Self;
    fn with_period(self, period: PeriodKey, stats: PeriodStats) -> Self;
    fn currency(self, code: &str) -> Self;
}

impl CollectiveExt for Collective {
    fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    fn located(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    fn with_period(mut self, period: PeriodKey, stats: PeriodStats) -> Self {
        let by_period = self.stats.get_or_insert_with(StatsByPeriod::default);
        match period {
            PeriodKey::All => by_period.all = Some(stats),
            PeriodKey::PastYear => by_period.past_year = Some(stats),
            PeriodKey::PastQuarter => by_period.past_quarter = Some(stats),
        }
        self
    }

    fn currency(mut self, code: &str) -> Self {
        self.currency = Some(code.to_string());
        self
    }
}
