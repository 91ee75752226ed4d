//! Sort direction and record comparators

use crate::core::field::{FieldAccess, compare_values};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Sort direction of a table column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descending order of two field values, nulls last
///
/// Absent fields count as null and two nulls tie.
pub fn descending(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(b, a),
    }
}

/// Comparator for `field` in `direction`
///
/// Ascending is the exact negation of [`descending`], so nulls come first
/// when ascending and last when descending.
pub fn get_comparator<R>(
    direction: SortDirection,
    field: impl Into<String>,
) -> impl Fn(&R, &R) -> Ordering + Clone + Send + Sync
where
    R: FieldAccess,
{
    let field = field.into();
    move |a: &R, b: &R| {
        let ordering = descending(a.present(&field), b.present(&field));
        match direction {
            SortDirection::Desc => ordering,
            SortDirection::Asc => ordering.reverse(),
        }
    }
}
