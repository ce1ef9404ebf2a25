//! Search + filter composition.
//!
//! Pure functions only: the input slice is never mutated and the same
//! inputs always give the same output, so results can be memoized.

use super::state::FilterState;
use crate::model::Method;
use crate::search::{SearchIndex, SearchOutcome};

/// Position of a method in the dataset plus its search score, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPosition {
    pub position: usize,
    pub score: Option<f64>,
}

/// A method that survived filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodHit<'a> {
    pub method: &'a Method,
    /// Index into the source slice.
    pub position: usize,
    /// Search relevance, lower is better. `None` when no search ran.
    pub score: Option<f64>,
}

/// Filter `methods` by `filters`, searching first when the query is long enough.
pub fn apply_filters_and_search<'a>(
    methods: &'a [Method],
    index: &SearchIndex,
    filters: &FilterState,
) -> Vec<MethodHit<'a>> {
    filter_positions(methods, index, filters)
        .into_iter()
        .filter_map(|p| {
            methods.get(p.position).map(|method| MethodHit {
                method,
                position: p.position,
                score: p.score,
            })
        })
        .collect()
}

/// Same as [`apply_filters_and_search`] but returns positions only.
pub fn filter_positions(
    methods: &[Method],
    index: &SearchIndex,
    filters: &FilterState,
) -> Vec<ScoredPosition> {
    let working: Vec<ScoredPosition> = match index.search(&filters.search_query) {
        SearchOutcome::NoFilter => (0..methods.len())
            .map(|position| ScoredPosition {
                position,
                score: None,
            })
            .collect(),
        SearchOutcome::Ranked(hits) => hits
            .into_iter()
            .map(|hit| ScoredPosition {
                position: hit.index,
                score: Some(hit.score),
            })
            .collect(),
    };

    working
        .into_iter()
        .filter(|p| {
            methods
                .get(p.position)
                .is_some_and(|method| matches_filters(method, filters))
        })
        .collect()
}

/// Conjunction of every active filter category.
pub fn matches_filters(method: &Method, filters: &FilterState) -> bool {
    matches_stage(method, filters)
        && matches_modalities(method, filters)
        && matches_tasks(method, filters)
        && matches_evidence(method, filters)
        && matches_maturity(method, filters)
        && filters.year_range.contains(method.year())
}

pub fn matches_stage(method: &Method, filters: &FilterState) -> bool {
    filters
        .pipeline_step
        .is_none_or(|stage| method.pipeline_step == stage)
}

pub fn matches_modalities(method: &Method, filters: &FilterState) -> bool {
    filters.modalities.is_empty()
        || method
            .modalities
            .iter()
            .any(|m| filters.modalities.contains(m))
}

pub fn matches_tasks(method: &Method, filters: &FilterState) -> bool {
    filters.tasks.is_empty() || method.tasks.iter().any(|t| filters.tasks.contains(t))
}

pub fn matches_evidence(method: &Method, filters: &FilterState) -> bool {
    filters.evidence_types.is_empty() || filters.evidence_types.contains(&method.evidence_type)
}

pub fn matches_maturity(method: &Method, filters: &FilterState) -> bool {
    filters.maturity.is_empty() || filters.maturity.contains(&method.maturity)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::filter::state::YearRange;
    use crate::model::method::fixtures::method;
    use crate::model::{Maturity, Modality, Stage, Task};
    use proptest::prelude::*;

    const EVIDENCE: &[&str] = &["case_study", "experiment", "benchmark"];

    fn arb_method(i: usize) -> impl Strategy<Value = Method> {
        (
            0usize..6,
            proptest::sample::subsequence(Modality::all().to_vec(), 0..3),
            proptest::sample::subsequence(Task::all().to_vec(), 0..3),
            0usize..EVIDENCE.len(),
            0usize..4,
            proptest::option::of(2010i32..2025),
        )
            .prop_map(move |(stage, modalities, tasks, evidence, maturity, year)| {
                let mut m = method(&format!("m{}", i), Stage::all()[stage], &modalities);
                m.tasks = tasks;
                m.evidence_type = EVIDENCE[evidence].to_string();
                m.maturity = Maturity::all()[maturity];
                m.reference.year = year;
                m
            })
    }

    /// Each active category of `filters` as a filter of its own.
    fn isolated(filters: &FilterState) -> Vec<FilterState> {
        let only = FilterState::default;
        vec![
            FilterState { pipeline_step: filters.pipeline_step, ..only() },
            FilterState { modalities: filters.modalities.clone(), ..only() },
            FilterState { tasks: filters.tasks.clone(), ..only() },
            FilterState { evidence_types: filters.evidence_types.clone(), ..only() },
            FilterState { maturity: filters.maturity.clone(), ..only() },
            FilterState { year_range: filters.year_range, ..only() },
        ]
    }

    fn arb_methods() -> impl Strategy<Value = Vec<Method>> {
        (0usize..12).prop_flat_map(|n| (0..n).map(arb_method).collect::<Vec<_>>())
    }

    proptest! {
        /// Property: a method is kept iff it passes each active category on its own.
        #[test]
        fn conjunction_law(
            methods in arb_methods(),
            stage in proptest::option::of(0usize..6),
            modality in proptest::option::of(0usize..6),
            tasks in proptest::sample::subsequence(Task::all().to_vec(), 0..3),
            evidence in proptest::sample::subsequence(EVIDENCE.to_vec(), 0..2),
            maturity in proptest::option::of(0usize..4),
            min_year in proptest::option::of(2010i32..2025),
        ) {
            let filters = FilterState {
                pipeline_step: stage.map(|s| Stage::all()[s]),
                modalities: modality.map(|m| Modality::all()[m]).into_iter().collect(),
                tasks: tasks.into_iter().collect(),
                evidence_types: evidence.into_iter().map(String::from).collect(),
                maturity: maturity.map(|m| Maturity::all()[m]).into_iter().collect(),
                year_range: YearRange::new(min_year, None),
                ..FilterState::default()
            };
            let index = SearchIndex::build(&methods);
            let passes_alone: Vec<Vec<usize>> = isolated(&filters)
                .iter()
                .map(|single| {
                    filter_positions(&methods, &index, single)
                        .iter()
                        .map(|p| p.position)
                        .collect()
                })
                .collect();
            let kept: Vec<usize> = apply_filters_and_search(&methods, &index, &filters)
                .iter()
                .map(|h| h.position)
                .collect();

            for i in 0..methods.len() {
                let expected = passes_alone.iter().all(|alone| alone.contains(&i));
                prop_assert_eq!(kept.contains(&i), expected);
            }

            let mut sorted = kept.clone();
            sorted.sort_unstable();
            prop_assert_eq!(kept, sorted, "unsearched results keep dataset order");
        }
    }
}
