use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::raw::{self, Raw};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a list endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Reads a page out of an upstream `data` payload, which is either
    /// `{ list, total, page, pageSize }` or a bare array.
    pub fn from_data(data: &Value, item: impl FnMut(&Value) -> T) -> Self {
        let raw = Raw::new(data);
        let items = raw
            .array(&["list"])
            .or_else(|| data.as_array().map(Vec::as_slice))
            .unwrap_or_default()
            .iter()
            .map(item)
            .collect::<Vec<_>>();
        let count = |key: &str| {
            raw.truthy(&[key])
                .and_then(raw::as_number)
                .filter(|n| *n >= 0.0)
                .map(|n| n as usize)
        };

        Self {
            total: count("total").unwrap_or(items.len()),
            page: count("page").unwrap_or(0),
            page_size: count("pageSize").unwrap_or(DEFAULT_PAGE_SIZE),
            items,
        }
    }
}
