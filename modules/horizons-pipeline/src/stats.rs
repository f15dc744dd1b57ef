use horizons_common::{percent_disbursed, Collective, PeriodKey};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Totals over a filtered set of collectives for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub collectives_count: usize,
    pub raised: i64,
    pub spent: i64,
    pub contributions: u64,
    pub contributors: u64,
    /// `None` when nothing was raised.
    pub percent_disbursed: Option<f64>,
}

/// Sum period stats across collectives. Missing stats count as zero.
pub fn compute_stats<'a, I>(collectives: I, period: PeriodKey) -> AggregateStats
where
    I: IntoIterator<Item = &'a Collective>,
{
    let mut out = AggregateStats::default();
    for c in collectives {
        out.collectives_count += 1;
        if let Some(stats) = c.period_stats(period) {
            out.raised += stats.raised;
            out.spent += stats.spent;
            out.contributions += stats.contributions;
            out.contributors += stats.contributors;
        }
    }
    out.percent_disbursed = percent_disbursed(out.spent, out.raised);
    out
}
