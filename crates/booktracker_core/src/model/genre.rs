//! Closed enumeration of literary categories.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Literary category of a book, persisted by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Fantasy,
    Dystopia,
    Fiction,
    NonFiction,
    ScienceFiction,
    Mystery,
    Romance,
    Horror,
    Biography,
    History,
}

impl Genre {
    pub const ALL: [Genre; 10] = [
        Genre::Fantasy,
        Genre::Dystopia,
        Genre::Fiction,
        Genre::NonFiction,
        Genre::ScienceFiction,
        Genre::Mystery,
        Genre::Romance,
        Genre::Horror,
        Genre::Biography,
        Genre::History,
    ];

    /// Stored/display name, e.g. `SCIENCE_FICTION`.
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Fantasy => "FANTASY",
            Genre::Dystopia => "DYSTOPIA",
            Genre::Fiction => "FICTION",
            Genre::NonFiction => "NON_FICTION",
            Genre::ScienceFiction => "SCIENCE_FICTION",
            Genre::Mystery => "MYSTERY",
            Genre::Romance => "ROMANCE",
            Genre::Horror => "HORROR",
            Genre::Biography => "BIOGRAPHY",
            Genre::History => "HISTORY",
        }
    }

    /// Parses a stored name. Matching is exact.
    pub fn parse(value: &str) -> Option<Genre> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == value)
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
