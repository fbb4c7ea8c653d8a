use serde::{Deserialize, Serialize};

use crate::property::PropertyRecord;

/// One bounded slice of matching listings plus pagination metadata.
///
/// `total_pages` is the ceiling of `total_count / per_page` and is `0` when
/// nothing matched. `current_page` is 1-based and never validated against
/// `total_pages`: an out-of-range page carries an empty `properties` slice,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult {
    pub properties: Vec<PropertyRecord>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_count: u64,
    pub per_page: u32,
}
