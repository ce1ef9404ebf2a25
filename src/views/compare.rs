//! Side-by-side comparison of up to three methods.

use super::route::Route;
use crate::model::Method;
use crate::store::Snapshot;
use crate::viz::RadarOptions;

/// A labelled attribute row with one cell per compared method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRow {
    pub label: &'static str,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareModel<'a> {
    pub methods: Vec<&'a Method>,
    /// Requested ids that are not in the dataset.
    pub missing: Vec<String>,
    pub radar: RadarOptions,
}

impl<'a> CompareModel<'a> {
    /// Compare the store's current compare set.
    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        Self::from_ids(snapshot, &snapshot.state.selection.compare)
    }

    /// Compare explicit ids, e.g. from a deep link. Order is preserved.
    pub fn from_ids(snapshot: &'a Snapshot, ids: &[String]) -> Self {
        let mut methods = Vec::new();
        let mut missing = Vec::new();
        for id in ids {
            match snapshot.method(id) {
                Some(m) => methods.push(m),
                None => missing.push(id.clone()),
            }
        }
        if !missing.is_empty() {
            tracing::debug!(?missing, "Compare link references unknown methods");
        }
        let radar = RadarOptions::new(methods.iter().copied());
        Self {
            methods,
            missing,
            radar,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.radar.is_drawable()
    }

    /// Shareable link that reproduces this comparison.
    pub fn share_route(&self) -> Route {
        Route::Compare(self.methods.iter().map(|m| m.id.clone()).collect())
    }

    pub fn rows(&self) -> Vec<CompareRow> {
        let methods = self.methods.as_slice();
        vec![
            CompareRow {
                label: "Pipeline Stage",
                cells: cells(methods, |m| m.pipeline_step.display_name().to_string()),
            },
            CompareRow {
                label: "Maturity",
                cells: cells(methods, |m| m.maturity.display_name().to_string()),
            },
            CompareRow {
                label: "Automation",
                cells: cells(methods, |m| m.automation.display_name().to_string()),
            },
            CompareRow {
                label: "Modalities",
                cells: cells(methods, |m| join(m.modalities.iter().map(|x| x.display_name()))),
            },
            CompareRow {
                label: "Tasks",
                cells: cells(methods, |m| join(m.tasks.iter().map(|x| x.display_name()))),
            },
            CompareRow {
                label: "Inputs",
                cells: cells(methods, |m| join(m.inputs.iter().map(String::as_str))),
            },
            CompareRow {
                label: "Outputs",
                cells: cells(methods, |m| join(m.outputs.iter().map(String::as_str))),
            },
            CompareRow {
                label: "Evidence",
                cells: cells(methods, |m| m.evidence_type.clone()),
            },
            CompareRow {
                label: "Year",
                cells: cells(methods, |m| m.year().map(|y| y.to_string()).unwrap_or_else(|| "-".into())),
            },
        ]
    }
}

fn cells(methods: &[&Method], f: impl Fn(&Method) -> String) -> Vec<String> {
    methods.iter().map(|m| f(m)).collect()
}

fn join<'s>(items: impl Iterator<Item = &'s str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Catalog;
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage};
    use crate::store::{Action, Store};
    use pretty_assertions::assert_eq;

    fn store() -> Store {
        Store::new(Catalog::from_methods(vec![
            method("a", Stage::Collect, &[Modality::Text, Modality::Audio]),
            method("b", Stage::Preprocess, &[]),
        ]))
    }

    #[test]
    fn test_from_ids_splits_missing() {
        let store = store();
        let snapshot = store.snapshot();
        let ids = vec!["b".to_string(), "zz".to_string(), "a".to_string()];
        let model = CompareModel::from_ids(&snapshot, &ids);

        let resolved: Vec<_> = model.methods.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(resolved, vec!["b", "a"]);
        assert_eq!(model.missing, vec!["zz".to_string()]);
        assert!(model.is_drawable());
        assert_eq!(model.share_route().to_path(""), "/compare?methods=b,a");
    }

    #[test]
    fn test_rows_have_a_cell_per_method() {
        let mut store = store();
        store.dispatch(Action::ToggleCompareMethod("a".into()));
        let snapshot = store.snapshot();
        let model = CompareModel::from_snapshot(&snapshot);
        assert!(!model.is_drawable());

        let rows = model.rows();
        let modalities = rows.iter().find(|r| r.label == "Modalities").unwrap();
        assert_eq!(modalities.cells, vec!["Text, Audio".to_string()]);
        let tasks = rows.iter().find(|r| r.label == "Tasks").unwrap();
        assert_eq!(tasks.cells, vec!["-".to_string()]);
    }
}
