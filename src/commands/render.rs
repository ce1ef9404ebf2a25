use crate::cli::{ChartKind, RunSettings};
use crate::filter::FilterPatch;
use crate::observability::{set_phase, RunPhase};
use crate::store::{Action, Snapshot};
use crate::viz::{
    self, ColorMode, LandscapeOptions, LandscapePlot, PipelineDiagram, PipelineOptions,
    RadarChart, Size, YAxis,
};
use crate::views::{parse_compare_list, CompareModel};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub struct RenderConfig {
    pub chart: ChartKind,
    pub output: PathBuf,
    pub filters: FilterPatch,
    pub methods: Vec<String>,
    pub y_axis: Option<YAxis>,
    pub color_mode: Option<ColorMode>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl RenderConfig {
    /// Configured chart size with any command-line overrides applied.
    pub fn size(&self, configured: Size) -> Size {
        Size::new(
            self.width.unwrap_or(configured.width),
            self.height.unwrap_or(configured.height),
        )
    }
}

pub fn run_render(settings: &RunSettings, config: RenderConfig) -> Result<()> {
    let mut store = crate::cli::require_store(settings)?;
    // The stage and data-source highlight follow the filters.
    store.dispatch(Action::SetFilters(config.filters.clone()));

    let size = config.size(settings.config.charts().size());
    if !size.is_measurable() {
        bail!("Chart size must be positive, got {}x{}", size.width, size.height);
    }

    let explorer = settings.config.explorer();
    let svg = render_chart(
        &store.snapshot(),
        &config,
        size,
        config.y_axis.unwrap_or(explorer.y_axis),
        config.color_mode.unwrap_or(explorer.color_mode),
    )?;
    crate::io::write_output(&config.output, &svg)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    tracing::info!(chart = ?config.chart, output = %config.output.display(), "Rendered chart");
    Ok(())
}

pub fn render_chart(
    snapshot: &Snapshot,
    config: &RenderConfig,
    size: Size,
    y_axis: YAxis,
    color_mode: ColorMode,
) -> Result<String> {
    let _phase = set_phase(RunPhase::Rendering);
    let Some(catalog) = snapshot.catalog() else {
        bail!("No catalog loaded");
    };

    let svg = match config.chart {
        ChartKind::Pipeline => {
            let options = PipelineOptions::from_dataset(catalog.dataset(), &snapshot.state.ui);
            viz::render_svg(&mut PipelineDiagram::new(), size, &options)?
        }
        ChartKind::Landscape => {
            let filtered = snapshot.filtered_methods();
            let options = LandscapeOptions::new(
                filtered.iter().map(|hit| hit.method),
                catalog.dataset().ordered_steps(),
            )
            .y_axis(y_axis)
            .color_mode(color_mode)
            .highlighted_stage(snapshot.state.ui.selected_step);
            viz::render_svg(&mut LandscapePlot::new(), size, &options)?
        }
        ChartKind::Radar => {
            let ids = parse_compare_list(&config.methods.join(","));
            let model = CompareModel::from_ids(snapshot, &ids);
            for id in &model.missing {
                tracing::warn!(id = %id, "Unknown method left out of the radar chart");
            }
            viz::render_svg(&mut RadarChart::new(), size, &model.radar)?
        }
    };
    Ok(svg)
}
