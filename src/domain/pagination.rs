use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::order::Order;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Opaque position in an index scan.
///
/// Zero is both where a listing starts and what the store hands back once
/// the scan has wrapped around, so callers stop paging when they see it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Cursor(u64);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid cursor '{0}'")]
pub struct CursorError(String);

impl Cursor {
    pub const START: Cursor = Cursor(0);

    pub fn new(position: u64) -> Self {
        Self(position)
    }

    pub fn position(self) -> u64 {
        self.0
    }

    pub fn is_start(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Cursor {
    fn from(position: u64) -> Self {
        Self(position)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cursor {
    type Err = CursorError;

    /// An empty string is the start of the listing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::START);
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| CursorError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: Cursor,
    pub size: u64,
}

impl PageRequest {
    /// Builds a request, falling back to the default size and clamping to
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(offset: Cursor, size: Option<u64>) -> Self {
        Self {
            offset,
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Cursor::START, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub cursor: Cursor,
}

impl OrderPage {
    pub fn empty() -> Self {
        Self {
            orders: Vec::new(),
            cursor: Cursor::START,
        }
    }

    pub fn has_more(&self) -> bool {
        !self.cursor.is_start()
    }
}
