//! Closed vocabularies used to classify methods.
//!
//! Every enum here has a stable wire id (`as_str`), a human label
//! (`display_name`) and an `all()` slice in canonical order. Ordered
//! vocabularies also expose a numeric `rank`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a wire id does not belong to a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} value '{value}'")]
pub struct UnknownValue {
    pub vocabulary: &'static str,
    pub value: String,
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $variant:ident => $id:literal, $display:literal $(| $alias:literal)* ; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $id $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            /// Wire identifier used in the dataset file.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $id, )+
                }
            }

            /// Human readable label.
            pub fn display_name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $display, )+
                }
            }

            /// All values in canonical order.
            pub fn all() -> &'static [$name] {
                &[ $( $name::$variant, )+ ]
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $id $(| $alias)* => Ok($name::$variant), )+
                    other => Err(UnknownValue {
                        vocabulary: $label,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// The six ordered pipeline stages.
    Stage, "pipeline stage" {
        Collect => "collect", "Collect Data";
        Preprocess => "preprocess", "Preprocess";
        AbstractAggregate => "abstract_aggregate", "Abstract & Aggregate";
        CorrelateCases => "correlate_cases", "Correlate Cases";
        EnhanceVisualization => "enhance_visualization", "Enhance Visualization";
        ApplyMining => "apply_mining", "Apply Mining";
    }
}

impl Stage {
    /// Position on the pipeline, 1-based.
    pub fn order(&self) -> u8 {
        match self {
            Stage::Collect => 1,
            Stage::Preprocess => 2,
            Stage::AbstractAggregate => 3,
            Stage::CorrelateCases => 4,
            Stage::EnhanceVisualization => 5,
            Stage::ApplyMining => 6,
        }
    }

    /// Stage at a 1-based position.
    pub fn from_order(order: u8) -> Option<Stage> {
        Stage::all().iter().copied().find(|s| s.order() == order)
    }
}

vocabulary! {
    /// Kind of data a method consumes.
    Modality, "modality" {
        Text => "text", "Text";
        Image => "image", "Image";
        Video => "video", "Video";
        Audio => "audio", "Audio";
        Sensor => "sensor", "Sensor";
        Mixed => "mixed", "Mixed";
    }
}

vocabulary! {
    /// Task a method addresses.
    Task, "task" {
        ActivityRecognition => "activity_recognition", "Activity Recognition";
        ObjectDetection => "object_detection", "Object Detection";
        EntityExtraction => "entity_extraction", "Entity Extraction";
        EventAbstraction => "event_abstraction", "Event Abstraction";
        TimestampExtraction => "timestamp_extraction", "Timestamp Extraction";
        CaseCorrelation => "case_correlation", "Case Correlation";
        Segmentation => "segmentation", "Segmentation";
        Classification => "classification", "Classification";
        AnomalyDetection => "anomaly_detection", "Anomaly Detection";
        ProcessDiscovery => "process_discovery", "Process Discovery";
    }
}

vocabulary! {
    /// Adoption readiness, ordered from least to most mature.
    Maturity, "maturity level" {
        Research => "research", "Research";
        Emerging => "emerging", "Emerging";
        Established => "established", "Established";
        Mature => "mature", "Mature";
    }
}

impl Maturity {
    /// Rank in `0..=3`.
    pub fn rank(&self) -> u8 {
        match self {
            Maturity::Research => 0,
            Maturity::Emerging => 1,
            Maturity::Established => 2,
            Maturity::Mature => 3,
        }
    }

    pub const MAX_RANK: u8 = 3;
}

vocabulary! {
    /// Degree of automation, ordered from manual to automated.
    Automation, "automation level" {
        Manual => "manual", "Manual";
        SemiAutomated => "semi_automated", "Semi-automated" | "semi-automated";
        Automated => "automated", "Automated";
    }
}

impl Automation {
    /// Rank in `0..=2`.
    pub fn rank(&self) -> u8 {
        match self {
            Automation::Manual => 0,
            Automation::SemiAutomated => 1,
            Automation::Automated => 2,
        }
    }

    pub const MAX_RANK: u8 = 2;
}
