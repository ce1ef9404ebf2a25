//! Sort functionality for filtered methods.

use super::engine::MethodHit;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort criteria
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Method name (A-Z)
    #[default]
    Name,
    /// Publication year, missing years count as 0
    Year,
    /// Maturity rank
    Maturity,
    /// Pipeline stage id
    Stage,
    /// Search relevance, best match first
    Relevance,
}

impl SortKey {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Year => "Year",
            SortKey::Maturity => "Maturity",
            SortKey::Stage => "Pipeline Stage",
            SortKey::Relevance => "Relevance",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Year => "year",
            SortKey::Maturity => "maturity",
            SortKey::Stage => "stage",
            SortKey::Relevance => "relevance",
        }
    }

    /// Get all sort keys
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Name,
            SortKey::Year,
            SortKey::Maturity,
            SortKey::Stage,
            SortKey::Relevance,
        ]
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sort key '{}'", s))
    }
}

/// Sort direction. Only flips the comparator; ties keep input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// Sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key.display_name(), self.order.arrow())
    }
}

/// Stable sort of filtered methods.
pub fn sort_methods<'a>(hits: &[MethodHit<'a>], key: SortKey, order: SortOrder) -> Vec<MethodHit<'a>> {
    let mut sorted = hits.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_hits(a, b, key);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Ascending comparison of two hits under `key`.
pub fn compare_hits(a: &MethodHit<'_>, b: &MethodHit<'_>, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => collate(&a.method.name, &b.method.name),
        SortKey::Year => a
            .method
            .year()
            .unwrap_or(0)
            .cmp(&b.method.year().unwrap_or(0)),
        SortKey::Maturity => a.method.maturity.rank().cmp(&b.method.maturity.rank()),
        SortKey::Stage => a
            .method
            .pipeline_step
            .as_str()
            .cmp(b.method.pipeline_step.as_str()),
        // Missing score is the worst possible match.
        SortKey::Relevance => a.score.unwrap_or(1.0).total_cmp(&b.score.unwrap_or(1.0)),
    }
}

/// Case-insensitive collation; on a case-only difference lowercase sorts first.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b).reverse())
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::model::method::fixtures::method;
    use crate::model::{Maturity, Stage};
    use proptest::prelude::*;

    proptest! {
        /// Property: methods with equal keys keep their input order in both directions.
        #[test]
        fn sort_is_stable(ranks in proptest::collection::vec(0usize..4, 0..20), desc: bool) {
            let methods: Vec<_> = ranks
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let mut m = method(&i.to_string(), Stage::Collect, &[]);
                    m.maturity = Maturity::all()[*r];
                    m
                })
                .collect();
            let input: Vec<MethodHit<'_>> = methods
                .iter()
                .enumerate()
                .map(|(position, method)| MethodHit { method, position, score: None })
                .collect();
            let order = if desc { SortOrder::Desc } else { SortOrder::Asc };

            let sorted = sort_methods(&input, SortKey::Maturity, order);
            for pair in sorted.windows(2) {
                if pair[0].method.maturity == pair[1].method.maturity {
                    prop_assert!(pair[0].position < pair[1].position);
                }
            }
        }
    }
}
