//! Method records and the dataset envelope.

use super::taxonomy::{Automation, Maturity, Modality, Stage, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bibliographic reference for a method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Reference {
    /// DOI or URL of the paper, DOI preferred.
    pub fn link(&self) -> Option<&str> {
        self.doi.as_deref().or(self.url.as_deref())
    }
}

/// Optional links to code, data and demos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
}

impl Artifacts {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.dataset.is_none() && self.demo.is_none()
    }

    /// Labelled links in display order.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Code", self.code.as_deref()),
            ("Dataset", self.dataset.as_deref()),
            ("Demo", self.demo.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, link)| link.map(|l| (label, l)))
        .collect()
    }
}

/// A cataloged technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub id: String,
    pub name: String,
    pub pipeline_step: Stage,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub algorithm_summary: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub modalities: Vec<Modality>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub maturity: Maturity,
    pub automation: Automation,
    #[serde(default)]
    pub evidence_type: String,
    #[serde(default)]
    pub related_methods: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reference: Reference,
    #[serde(default)]
    pub artifacts: Artifacts,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Method {
    /// Publication year, if known.
    pub fn year(&self) -> Option<i32> {
        self.reference.year
    }

    /// First listed modality, used for color encoding.
    pub fn primary_modality(&self) -> Modality {
        self.modalities.first().copied().unwrap_or(Modality::Mixed)
    }
}

/// A pipeline stage descriptor supplied by the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub id: Stage,
    pub name: String,
    pub order: u8,
    #[serde(default)]
    pub description: Option<String>,
}

/// Free-form dataset metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The loaded dataset. Read-only after load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub metadata: DatasetMetadata,
    pub pipeline_steps: Vec<PipelineStep>,
    pub methods: Vec<Method>,
}

impl Dataset {
    pub fn method(&self, id: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.id == id)
    }

    /// Step descriptor for a stage, falling back to the built-in label.
    pub fn step_name(&self, stage: Stage) -> &str {
        self.pipeline_steps
            .iter()
            .find(|s| s.id == stage)
            .map(|s| s.name.as_str())
            .unwrap_or_else(|| stage.display_name())
    }

    /// Steps sorted by their declared order.
    pub fn ordered_steps(&self) -> Vec<PipelineStep> {
        let mut steps = self.pipeline_steps.clone();
        if steps.is_empty() {
            steps = Stage::all()
                .iter()
                .map(|s| PipelineStep {
                    id: *s,
                    name: s.display_name().to_string(),
                    order: s.order(),
                    description: None,
                })
                .collect();
        }
        steps.sort_by_key(|s| s.order);
        steps
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_modality_falls_back_to_mixed() {
        let m = fixtures::method("a", Stage::Collect, &[]);
        assert_eq!(m.primary_modality(), Modality::Mixed);
        let m = fixtures::method("b", Stage::Collect, &[Modality::Video, Modality::Text]);
        assert_eq!(m.primary_modality(), Modality::Video);
    }

    #[test]
    fn test_reference_link_prefers_doi() {
        let r: Reference =
            serde_json::from_str(r#"{"doi": "10.1/xyz", "url": "https://x", "year": 2021}"#)
                .unwrap();
        assert_eq!(r.link(), Some("10.1/xyz"));
        assert_eq!(r.year, Some(2021));
    }

    #[test]
    fn test_ordered_steps_default_when_missing() {
        let ds = Dataset::default();
        let steps = ds.ordered_steps();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0].id, Stage::Collect);
        assert_eq!(ds.step_name(Stage::ApplyMining), "Apply Mining");
    }

    #[test]
    fn test_artifact_links_skip_missing() {
        let a = Artifacts {
            code: Some("https://git".into()),
            dataset: None,
            demo: Some("https://demo".into()),
        };
        assert_eq!(a.links(), vec![("Code", "https://git"), ("Demo", "https://demo")]);
        assert!(Artifacts::default().is_empty());
    }
}
