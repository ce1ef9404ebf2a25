//! Method detail page.

use super::route::Route;
use crate::model::Method;
use crate::store::Snapshot;

/// A related method id, resolved to a name when it exists in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLink {
    pub id: String,
    pub name: Option<String>,
}

impl RelatedLink {
    pub fn is_resolved(&self) -> bool {
        self.name.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDetail<'a> {
    pub method: &'a Method,
    pub stage_name: String,
    pub related: Vec<RelatedLink>,
    pub compared: bool,
    pub compare_full: bool,
}

impl<'a> MethodDetail<'a> {
    pub fn paper_link(&self) -> Option<&'a str> {
        self.method.reference.link()
    }

    pub fn artifact_links(&self) -> Vec<(&'static str, &'a str)> {
        self.method.artifacts.links()
    }
}

/// The detail route either resolves or shows an inline not-found panel.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailModel<'a> {
    Found(MethodDetail<'a>),
    NotFound { id: String, back: Route },
}

impl<'a> DetailModel<'a> {
    pub fn from_snapshot(snapshot: &'a Snapshot, id: &str) -> Self {
        let Some(method) = snapshot.method(id) else {
            tracing::debug!(id, "Detail route references unknown method");
            return DetailModel::NotFound {
                id: id.to_string(),
                back: Route::Explorer,
            };
        };

        let stage_name = snapshot
            .catalog()
            .map(|c| c.dataset().step_name(method.pipeline_step).to_string())
            .unwrap_or_else(|| method.pipeline_step.display_name().to_string());

        let related = method
            .related_methods
            .iter()
            .map(|rid| RelatedLink {
                id: rid.clone(),
                name: snapshot.method(rid).map(|m| m.name.clone()),
            })
            .collect();

        let selection = &snapshot.state.selection;
        DetailModel::Found(MethodDetail {
            method,
            stage_name,
            related,
            compared: selection.is_compared(id),
            compare_full: selection.compare_is_full(),
        })
    }

    pub fn not_found_message(id: &str) -> String {
        format!("No method with id '{}' exists in this catalog.", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Catalog;
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage};
    use crate::store::Store;

    fn store() -> Store {
        let mut a = method("a", Stage::Collect, &[Modality::Text]);
        a.related_methods = vec!["b".into(), "ghost".into()];
        a.artifacts.code = Some("https://example.org/code".into());
        let b = method("b", Stage::Preprocess, &[]);
        Store::new(Catalog::from_methods(vec![a, b]))
    }

    #[test]
    fn test_found_resolves_related_links() {
        let store = store();
        let snapshot = store.snapshot();
        let DetailModel::Found(detail) = DetailModel::from_snapshot(&snapshot, "a") else {
            panic!("expected method a");
        };
        assert_eq!(detail.related.len(), 2);
        assert!(detail.related[0].is_resolved());
        assert!(!detail.related[1].is_resolved());
        assert_eq!(detail.artifact_links(), vec![("Code", "https://example.org/code")]);
        assert!(!detail.compared);
    }

    #[test]
    fn test_unknown_id_is_not_found_with_back_link() {
        let store = store();
        let snapshot = store.snapshot();
        assert_eq!(
            DetailModel::from_snapshot(&snapshot, "nope"),
            DetailModel::NotFound {
                id: "nope".into(),
                back: Route::Explorer
            }
        );
    }
}
