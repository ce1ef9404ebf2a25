//! Filter selections and partial updates to them.

use crate::model::{Maturity, Modality, Stage, Task};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive publication-year bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl YearRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    /// True when neither bound is set.
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether a (possibly unknown) year satisfies the bounds.
    ///
    /// An unknown year fails as soon as any bound is set.
    pub fn contains(&self, year: Option<i32>) -> bool {
        if self.is_open() {
            return true;
        }
        let Some(year) = year else {
            return false;
        };
        self.min.is_none_or(|min| year >= min) && self.max.is_none_or(|max| year <= max)
    }
}

/// Current filter selections. Empty selectors do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub pipeline_step: Option<Stage>,
    pub modalities: BTreeSet<Modality>,
    pub tasks: BTreeSet<Task>,
    pub evidence_types: BTreeSet<String>,
    pub maturity: BTreeSet<Maturity>,
    pub year_range: YearRange,
    pub search_query: String,
}

impl FilterState {
    /// Number of active categorical/range filters, not counting search.
    pub fn active_count(&self) -> usize {
        [
            self.pipeline_step.is_some(),
            !self.modalities.is_empty(),
            !self.tasks.is_empty(),
            !self.evidence_types.is_empty(),
            !self.maturity.is_empty(),
            !self.year_range.is_open(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// True when anything (filters or a non-blank query) narrows the list.
    pub fn is_active(&self) -> bool {
        self.active_count() > 0 || !self.search_query.trim().is_empty()
    }
}

/// Partial filter update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub pipeline_step: Option<Option<Stage>>,
    pub modalities: Option<BTreeSet<Modality>>,
    pub tasks: Option<BTreeSet<Task>>,
    pub evidence_types: Option<BTreeSet<String>>,
    pub maturity: Option<BTreeSet<Maturity>>,
    pub year_range: Option<YearRange>,
    pub search_query: Option<String>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pipeline_step(mut self, step: Option<Stage>) -> Self {
        self.pipeline_step = Some(step);
        self
    }

    pub fn modalities(mut self, modalities: impl IntoIterator<Item = Modality>) -> Self {
        self.modalities = Some(modalities.into_iter().collect());
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks = Some(tasks.into_iter().collect());
        self
    }

    pub fn evidence_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.evidence_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn maturity(mut self, levels: impl IntoIterator<Item = Maturity>) -> Self {
        self.maturity = Some(levels.into_iter().collect());
        self
    }

    pub fn year_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.year_range = Some(YearRange::new(min, max));
        self
    }

    pub fn search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// Shallow merge into `state`.
    pub fn apply_to(self, state: &mut FilterState) {
        if let Some(step) = self.pipeline_step {
            state.pipeline_step = step;
        }
        if let Some(modalities) = self.modalities {
            state.modalities = modalities;
        }
        if let Some(tasks) = self.tasks {
            state.tasks = tasks;
        }
        if let Some(types) = self.evidence_types {
            state.evidence_types = types;
        }
        if let Some(levels) = self.maturity {
            state.maturity = levels;
        }
        if let Some(range) = self.year_range {
            state.year_range = range;
        }
        if let Some(query) = self.search_query {
            state.search_query = query;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_inclusive_bounds() {
        let range = YearRange::new(Some(2018), Some(2020));
        assert!(range.contains(Some(2018)));
        assert!(range.contains(Some(2020)));
        assert!(!range.contains(Some(2017)));
        assert!(!range.contains(Some(2021)));
    }

    #[test]
    fn test_year_range_unknown_year() {
        assert!(YearRange::default().contains(None));
        assert!(!YearRange::new(Some(2000), None).contains(None));
        assert!(!YearRange::new(None, Some(2030)).contains(None));
    }

    #[test]
    fn test_patch_is_shallow_merge() {
        let mut state = FilterState {
            search_query: "ocr".into(),
            ..FilterState::default()
        };
        FilterPatch::new()
            .modalities([Modality::Image])
            .year_range(Some(2019), None)
            .apply_to(&mut state);

        assert_eq!(state.search_query, "ocr");
        assert!(state.modalities.contains(&Modality::Image));
        assert_eq!(state.year_range.min, Some(2019));
        assert_eq!(state.active_count(), 2);
    }

    #[test]
    fn test_patch_can_clear_stage() {
        let mut state = FilterState {
            pipeline_step: Some(Stage::Collect),
            ..FilterState::default()
        };
        FilterPatch::new().pipeline_step(None).apply_to(&mut state);
        assert_eq!(state.pipeline_step, None);
    }

    #[test]
    fn test_blank_query_is_inactive() {
        let state = FilterState {
            search_query: "   ".into(),
            ..FilterState::default()
        };
        assert!(!state.is_active());
    }
}
