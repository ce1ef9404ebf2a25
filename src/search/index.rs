//! Weighted fuzzy index over method text fields.

use super::approx::{best_substring_match, fold_chars};
use crate::model::Method;
use std::ops::Range;

/// Maximum normalized edit distance for a field to count as a match.
pub const MATCH_THRESHOLD: f64 = 0.4;

/// Queries shorter than this (after trimming) do not filter.
pub const MIN_QUERY_LEN: usize = 2;

/// Matched spans shorter than this are not reported.
pub const MIN_MATCH_CHAR_LEN: usize = 2;

/// Floor applied to exact matches so the weighted product stays ordered.
const SCORE_EPSILON: f64 = 1e-3;

/// Indexed text fields and their relative weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchField {
    Name,
    ShortDescription,
    Tags,
    AlgorithmSummary,
    PaperTitle,
}

impl SearchField {
    pub fn weight(&self) -> f64 {
        match self {
            SearchField::Name => 0.4,
            SearchField::ShortDescription => 0.2,
            SearchField::Tags => 0.2,
            SearchField::AlgorithmSummary => 0.1,
            SearchField::PaperTitle => 0.1,
        }
    }

    pub fn all() -> &'static [SearchField] {
        &[
            SearchField::Name,
            SearchField::ShortDescription,
            SearchField::Tags,
            SearchField::AlgorithmSummary,
            SearchField::PaperTitle,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::ShortDescription => "description",
            SearchField::Tags => "tags",
            SearchField::AlgorithmSummary => "algorithm",
            SearchField::PaperTitle => "paper title",
        }
    }

    fn values(&self, method: &Method) -> Vec<String> {
        match self {
            SearchField::Name => vec![method.name.clone()],
            SearchField::ShortDescription => vec![method.short_description.clone()],
            SearchField::Tags => method.tags.clone(),
            SearchField::AlgorithmSummary => vec![method.algorithm_summary.clone()],
            SearchField::PaperTitle => method.reference.title.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedValue {
    folded: Vec<char>,
}

#[derive(Debug, Clone)]
struct IndexedRecord {
    fields: Vec<(SearchField, Vec<IndexedValue>)>,
}

/// Where and how well a query matched one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub field: SearchField,
    /// Which value matched, for multi-valued fields such as tags.
    pub value_index: usize,
    /// Matched character range within that value.
    pub span: Range<usize>,
    /// Normalized score, 0 is exact.
    pub score: f64,
}

/// A method that matched a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Position of the method in the indexed slice.
    pub index: usize,
    /// Relevance score in `[0, 1]`; lower is better.
    pub score: f64,
    pub matches: Vec<FieldMatch>,
}

/// Result of running a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was too short to filter anything.
    NoFilter,
    /// Ranked matches, best first. May be empty.
    Ranked(Vec<SearchHit>),
}

impl SearchOutcome {
    pub fn is_filter(&self) -> bool {
        matches!(self, SearchOutcome::Ranked(_))
    }
}

/// Immutable search index built once per dataset.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    records: Vec<IndexedRecord>,
}

impl SearchIndex {
    /// Index the weighted text fields of every method.
    pub fn build(methods: &[Method]) -> Self {
        let records = methods
            .iter()
            .map(|method| IndexedRecord {
                fields: SearchField::all()
                    .iter()
                    .map(|field| {
                        let values = field
                            .values(method)
                            .iter()
                            .map(|v| IndexedValue {
                                folded: fold_chars(v),
                            })
                            .collect();
                        (*field, values)
                    })
                    .collect(),
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Run a query against the index.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return SearchOutcome::NoFilter;
        }
        let pattern = fold_chars(trimmed);

        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| score_record(record, &pattern, index))
            .collect();

        // Stable: equal scores keep dataset order.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        SearchOutcome::Ranked(hits)
    }
}

fn score_record(record: &IndexedRecord, pattern: &[char], index: usize) -> Option<SearchHit> {
    let mut matches = Vec::new();
    let mut total = 1.0;

    for (field, values) in &record.fields {
        let best = values
            .iter()
            .enumerate()
            .filter_map(|(value_index, value)| {
                best_substring_match(pattern, &value.folded).map(|m| (value_index, m))
            })
            .map(|(value_index, m)| (value_index, m.score(pattern.len()), m.span))
            // Spans too short to report do not count as a match either.
            .filter(|(_, score, span)| {
                *score <= MATCH_THRESHOLD && span.len() >= MIN_MATCH_CHAR_LEN
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((value_index, score, span)) = best {
            total *= score.max(SCORE_EPSILON).powf(field.weight());
            matches.push(FieldMatch {
                field: *field,
                value_index,
                span,
                score,
            });
        }
    }

    if matches.is_empty() {
        None
    } else {
        Some(SearchHit {
            index,
            score: total,
            matches,
        })
    }
}
