pub mod types;
pub mod countries;
pub mod config;
pub mod error;
pub mod file_config;

pub use types::*;
pub use countries::{Country, CountryTable};
pub use config::Config;
pub use error::HorizonsError;
pub use file_config::{FileConfig, HostConfig, RateConfig};
