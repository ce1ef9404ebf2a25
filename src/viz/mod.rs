//! Charts over a retained scene graph.
//!
//! Each chart implements [`Chart`]: a full `render`, an in-place `update`,
//! input handling that emits chart events, and `destroy`. Scenes serialize
//! to SVG for export; the terminal explorer reads them for hit areas.

pub mod binding;
pub mod chart;
pub mod jitter;
pub mod landscape;
pub mod palette;
pub mod pipeline;
pub mod radar;
pub mod scene;

pub use binding::{ChartBinding, MountPolicy, MountStatus, Redraw, RESIZE_DEBOUNCE};
pub use chart::{Chart, Input, KeyInput, Size, VizError};
pub use jitter::jitter;
pub use landscape::{
    ColorMode, LandscapeEvent, LandscapeOptions, LandscapePlot, LandscapeUpdate, YAxis,
};
pub use pipeline::{
    PipelineDiagram, PipelineEvent, PipelineOptions, PipelineTarget, PipelineUpdate,
};
pub use radar::{radar_dimensions, RadarChart, RadarEvent, RadarOptions, RadarUpdate};
pub use scene::{Node, NodeId, Scene, Shape, Style};

/// Render a chart once at `size` and return its SVG document.
pub fn render_svg<C: Chart>(chart: &mut C, size: Size, options: &C::Options) -> Result<String, VizError> {
    chart.render(size, options)?;
    chart.scene().map(Scene::to_svg).ok_or(VizError::NotRendered)
}
