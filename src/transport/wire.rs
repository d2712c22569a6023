//! Wire shapes shared by initial load, live deliveries, and snapshots. A live delivery
//! uses the same envelope as the initial load (see DESIGN.md, Open Question 1): each
//! framed record is `{ "configs": [entry, ...] }`.

use serde::{Deserialize, Serialize};

use crate::entry::ConfigEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigsEnvelope {
    pub configs: Vec<ConfigEntry>,
}
