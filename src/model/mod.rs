//! Catalog data model: methods, pipeline steps and their vocabularies.

pub mod method;
pub mod taxonomy;

pub use method::{Artifacts, Dataset, DatasetMetadata, Method, PipelineStep, Reference};
pub use taxonomy::{Automation, Maturity, Modality, Stage, Task, UnknownValue};
