//! Publication-era helpers applied by the caller before ranking

use bookrec_core::{Book, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The selectable twenty-year publication windows
pub const ERAS: &[(i32, i32)] = &[
    (1800, 1820),
    (1821, 1840),
    (1841, 1860),
    (1861, 1880),
    (1881, 1900),
    (1901, 1920),
    (1921, 1940),
    (1941, 1960),
    (1961, 1980),
    (1981, 2000),
    (2001, 2020),
];

/// A publication era, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Era {
    pub start: i32,
    pub end: i32,
}

impl Era {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidConfig(format!(
                "era start {} is after its end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Every selectable era, oldest first
    pub fn all() -> Vec<Era> {
        ERAS.iter().map(|&(start, end)| Era { start, end }).collect()
    }

    /// Parse `"1921-1940"`
    pub fn parse(s: &str) -> Result<Self> {
        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| {
                Error::InvalidConfig(format!("invalid era '{}', expected START-END", s))
            })?;
        let parse_year = |y: &str| {
            y.trim()
                .parse::<i32>()
                .map_err(|_| Error::InvalidConfig(format!("invalid year '{}' in era '{}'", y, s)))
        };
        Self::new(parse_year(start)?, parse_year(end)?)
    }

    #[inline]
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn window(&self) -> YearWindow {
        YearWindow {
            min: Some(self.start),
            max: Some(self.end),
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for Era {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Era::parse(s)
    }
}

/// Inclusive publication-year bounds; `None` leaves that side open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearWindow {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl YearWindow {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(Error::InvalidConfig(format!(
                    "min_year {} is after max_year {}",
                    lo, hi
                )));
            }
        }
        Ok(Self { min, max })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Smallest window covering every era, `None` for no eras
    pub fn spanning(eras: &[Era]) -> Option<Self> {
        let min = eras.iter().map(|e| e.start).min()?;
        let max = eras.iter().map(|e| e.end).max()?;
        Some(Self {
            min: Some(min),
            max: Some(max),
        })
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// An unknown year only passes an unbounded window
    pub fn contains(&self, year: Option<i32>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match year {
            Some(y) => self.min.map_or(true, |lo| y >= lo) && self.max.map_or(true, |hi| y <= hi),
            None => false,
        }
    }
}

/// Keep the books published inside `window`
pub fn filter_by_year(books: Vec<Book>, window: &YearWindow) -> Vec<Book> {
    if window.is_unbounded() {
        return books;
    }
    books.into_iter().filter(|b| window.contains(b.year)).collect()
}

/// Subject queries for every content × genre × era combination, as
/// `content_genre_start-end`, lowercased with spaces replaced by `_`
pub fn subject_queries<C, G>(contents: &[C], genres: &[G], eras: &[Era]) -> Vec<String>
where
    C: AsRef<str>,
    G: AsRef<str>,
{
    let mut queries = Vec::with_capacity(contents.len() * genres.len() * eras.len());
    for content in contents {
        for genre in genres {
            for era in eras {
                let query = format!("{}_{}_{}", content.as_ref(), genre.as_ref(), era);
                queries.push(query.to_lowercase().replace(' ', "_"));
            }
        }
    }
    queries
}
