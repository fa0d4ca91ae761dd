//! Ordering types for table queries.

use std::str::FromStr;

use crate::error::ProtocolError;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// The wire form of the direction (`"asc"` / `"desc"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for Direction {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ProtocolError::BadParameter {
                name: "order[i][dir]".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// One sort directive: a column index paired with a direction.
///
/// Directives form an ordered list; earlier entries take precedence and
/// later entries break ties. The index refers to the table's column list,
/// not to a field name - the column-to-field mapping travels with every
/// request so the server stays stateless.
///
/// # Example
///
/// ```
/// use bizboard_lib::api::query::SortKey;
///
/// // Sort by the fourth column descending, ties by the first ascending.
/// let order = vec![SortKey::desc(3), SortKey::asc(0)];
/// assert_eq!(order[0].direction.as_str(), "desc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Index into the table's column list.
    pub column: usize,
    /// Direction applied to that column.
    pub direction: Direction,
}

impl SortKey {
    /// Creates an ascending sort directive on a column.
    pub fn asc(column: usize) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    /// Creates a descending sort directive on a column.
    pub fn desc(column: usize) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}
