//! Submission categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TallyError;

/// Label of a running total kept by the aggregator.
///
/// The aggregator keys its totals by this type, so a new variant (plus its
/// entry in [`Category::ALL`], in declaration order) is all a third category needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// First category
    A,
    /// Second category
    B,
}

impl Category {
    /// Every category, in tally order
    pub const ALL: [Category; 2] = [Category::A, Category::B];

    /// Position in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short label
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TallyError::InvalidParameter(format!("unknown category {:?}", s)))
    }
}
