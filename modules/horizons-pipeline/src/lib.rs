//! Aggregation and filtering pipeline behind the Horizons dashboard.
//!
//! Pure functions over an immutable snapshot of collectives:
//! location filter → category partition → stats → time series → output shaping.
//! Nothing here performs I/O or mutates its inputs, so repeated calls with the
//! same arguments produce identical output.

pub mod categories;
pub mod compute;
pub mod currency;
pub mod location;
pub mod location_options;
pub mod period;
pub mod series;
pub mod stats;

#[cfg(test)]
mod testing;

pub use categories::{derive_categories, partition, with_all_first, CategoryMembers, TagPolicy};
pub use compute::{compute, CategorySummary, CollectiveSummary, ComputeInput, ComputeOutput};
pub use currency::{normalize_currency, CurrencyPolicy, RateProvider, StaticRates};
pub use location::{filter_location, matches};
pub use location_options::get_filter_options;
pub use period::{window, PeriodWindow};
pub use series::{compute_time_series, merge_series, CategorySeries};
pub use stats::{compute_stats, AggregateStats};
