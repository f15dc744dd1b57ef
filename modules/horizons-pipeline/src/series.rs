//! Per-category time series.
//!
//! Series are merged by exact date string. Buckets keep the order in which
//! each date was first seen; no calendar sort is applied, so callers that
//! need chronological order sort the nodes themselves.

use std::collections::HashMap;

use horizons_common::{Category, CategoryTag, Collective, PeriodKey, SeriesNode, TimeUnit};
use serde::{Deserialize, Serialize};

use crate::categories::CategoryMembers;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    pub label: String,
    pub color: String,
    pub tag: CategoryTag,
    pub time_unit: TimeUnit,
    pub nodes: Vec<SeriesNode>,
}

impl CategorySeries {
    pub fn total(&self) -> i64 {
        self.nodes.iter().map(|n| n.amount).sum()
    }
}

/// Sum the `raised_series` of every collective for `period`, keyed by date.
pub fn merge_series<'a, I>(collectives: I, period: PeriodKey) -> Vec<SeriesNode>
where
    I: IntoIterator<Item = &'a Collective>,
{
    let mut nodes: Vec<SeriesNode> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for c in collectives {
        let Some(stats) = c.period_stats(period) else {
            continue;
        };
        for node in &stats.raised_series {
            match index.get(node.date.as_str()) {
                Some(&i) => nodes[i].amount += node.amount,
                None => {
                    index.insert(node.date.as_str(), nodes.len());
                    nodes.push(node.clone());
                }
            }
        }
    }
    nodes
}

pub fn compute_time_series(
    categories: &[CategoryMembers<'_>],
    period: PeriodKey,
) -> Vec<CategorySeries> {
    categories
        .iter()
        .map(|members| {
            let Category {
                label, tag, color, ..
            } = &members.category;
            CategorySeries {
                label: label.clone(),
                color: color.clone(),
                tag: tag.clone(),
                time_unit: period.time_unit(),
                nodes: merge_series(members.collectives.iter().copied(), period),
            }
        })
        .collect()
}
