pub mod filter;
pub mod routes;
pub mod snapshot;

use horizons_common::{CountryTable, FileConfig};

use snapshot::SnapshotStore;

pub struct AppState {
    pub file_config: FileConfig,
    pub store: SnapshotStore,
    pub countries: CountryTable,
}

impl AppState {
    pub fn new(file_config: FileConfig, store: SnapshotStore) -> Self {
        Self {
            file_config,
            store,
            countries: CountryTable::default(),
        }
    }
}
