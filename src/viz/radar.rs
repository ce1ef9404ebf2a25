//! Comparison radar over six normalized dimensions.

use super::chart::{check_size, Chart, Input, Size, VizError};
use super::palette::{compare_color, GRID, MUTED_TEXT, NEUTRAL_STROKE, TEXT};
use super::scene::{Node, NodeId, Scene, Shape, Style};
use crate::model::{Automation, Maturity, Method};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Methods drawn at most; extra inputs are ignored.
pub const MAX_SERIES: usize = 3;
/// Fewer methods than this renders the empty state.
pub const MIN_SERIES: usize = 2;
/// Legend names longer than this are cut and get an ellipsis.
pub const LEGEND_NAME_LIMIT: usize = 28;

pub const DIMENSION_LABELS: [&str; 6] = [
    "Maturity",
    "Automation",
    "Modalities",
    "Tasks",
    "Inputs",
    "Outputs",
];

const GRID_LEVELS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];
const LEGEND_ROW: f64 = 18.0;

/// Normalize a method onto the six radar axes, each in `[0, 1]`.
///
/// Count dimensions saturate at their cap instead of overflowing.
pub fn radar_dimensions(method: &Method) -> [f64; 6] {
    let capped = |count: usize, cap: usize| count.min(cap) as f64 / cap as f64;
    [
        f64::from(method.maturity.rank()) / f64::from(Maturity::MAX_RANK),
        f64::from(method.automation.rank()) / f64::from(Automation::MAX_RANK),
        capped(method.modalities.len(), 6),
        capped(method.tasks.len(), 10),
        capped(method.inputs.len(), 5),
        capped(method.outputs.len(), 5),
    ]
}

/// Cut `name` to `limit` chars plus an ellipsis.
pub fn truncate_label(name: &str, limit: usize) -> String {
    if name.chars().count() <= limit {
        name.to_string()
    } else {
        let kept: String = name.chars().take(limit).collect();
        format!("{}…", kept)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeries {
    pub id: String,
    pub name: String,
    pub values: [f64; 6],
}

impl From<&Method> for RadarSeries {
    fn from(method: &Method) -> Self {
        Self {
            id: method.id.clone(),
            name: method.name.clone(),
            values: radar_dimensions(method),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarOptions {
    pub series: Vec<RadarSeries>,
}

impl RadarOptions {
    /// Take at most the first three methods, in order.
    pub fn new<'a>(methods: impl IntoIterator<Item = &'a Method>) -> Self {
        Self {
            series: methods
                .into_iter()
                .take(MAX_SERIES)
                .map(RadarSeries::from)
                .collect(),
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.series.len() >= MIN_SERIES
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadarUpdate {
    /// Series to emphasize, by method id.
    pub highlighted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadarEvent {
    Hover(Option<String>),
}

/// Radar chart; renders a placeholder when given fewer than two methods.
#[derive(Debug, Default)]
pub struct RadarChart {
    scene: Option<Scene>,
    series_nodes: Vec<(String, NodeId, usize)>,
    highlighted: Option<String>,
    hovered: Option<String>,
    empty: bool,
}

impl RadarChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the last render drew the placeholder.
    pub fn is_empty_state(&self) -> bool {
        self.empty
    }

    fn series_style(&self, id: &str, index: usize) -> Style {
        let color = compare_color(index);
        let emphasized = self.highlighted.as_deref() == Some(id) || self.hovered.as_deref() == Some(id);
        Style::new()
            .fill(color)
            .fill_opacity(if emphasized { 0.35 } else { 0.18 })
            .stroke(color, if emphasized { 3.0 } else { 2.0 })
    }

    fn restyle(&mut self) {
        let styles: Vec<_> = self
            .series_nodes
            .iter()
            .map(|(id, node, index)| (*node, self.series_style(id, *index)))
            .collect();
        if let Some(scene) = self.scene.as_mut() {
            for (node, style) in styles {
                scene.set_style(node, style);
            }
        }
    }

    fn build_empty(&self, size: Size) -> Scene {
        let mut scene = Scene::new(size.width, size.height);
        let root = scene.root();
        scene.add(
            root,
            Node::new(Shape::text(
                size.width / 2.0,
                size.height / 2.0,
                "Select at least two methods to compare",
            ))
            .style(Style::new().fill(MUTED_TEXT).font(13.0).anchor("middle"))
            .key("empty"),
        );
        scene
    }

    fn build(&mut self, size: Size, options: &RadarOptions) -> Scene {
        let legend_height = LEGEND_ROW * options.series.len() as f64 + 8.0;
        let cx = size.width / 2.0;
        let cy = (size.height - legend_height) / 2.0;
        let radius = (size.width.min(size.height - legend_height) * 0.35).max(1.0);
        let point = |axis: usize, value: f64| {
            let angle = axis as f64 / DIMENSION_LABELS.len() as f64 * TAU - FRAC_PI_2;
            (cx + radius * value * angle.cos(), cy + radius * value * angle.sin())
        };

        let mut scene = Scene::new(size.width, size.height);
        let root = scene.root();
        let grid = scene.add(root, Node::new(Shape::Group).key("grid"));
        for level in GRID_LEVELS {
            let points = (0..DIMENSION_LABELS.len()).map(|a| point(a, level)).collect();
            scene.add(
                grid,
                Node::new(Shape::Polygon { points })
                    .style(Style::new().fill("none").stroke(GRID, 1.0))
                    .key(format!("grid:{}", (level * 100.0) as u32)),
            );
        }
        for (axis, label) in DIMENSION_LABELS.iter().enumerate() {
            let (x, y) = point(axis, 1.0);
            scene.add(
                grid,
                Node::new(Shape::line(cx, cy, x, y)).style(Style::new().stroke(NEUTRAL_STROKE, 1.0)),
            );
            let (lx, ly) = point(axis, 1.15);
            scene.add(
                grid,
                Node::new(Shape::text(lx, ly + 4.0, *label))
                    .style(Style::new().fill(MUTED_TEXT).font(11.0).anchor("middle")),
            );
        }

        self.series_nodes.clear();
        let legend_top = size.height - legend_height + 4.0;
        for (index, series) in options.series.iter().enumerate() {
            let points = series
                .values
                .iter()
                .enumerate()
                .map(|(axis, value)| point(axis, *value))
                .collect();
            let node = scene.add(
                root,
                Node::new(Shape::Polygon { points })
                    .style(self.series_style(&series.id, index))
                    .key(format!("series:{}", series.id))
                    .title(series.name.clone())
                    .interactive(),
            );
            self.series_nodes.push((series.id.clone(), node, index));

            let y = legend_top + index as f64 * LEGEND_ROW;
            scene.add(
                root,
                Node::new(Shape::rect(16.0, y, 10.0, 10.0))
                    .style(Style::new().fill(compare_color(index))),
            );
            scene.add(
                root,
                Node::new(Shape::text(32.0, y + 9.0, truncate_label(&series.name, LEGEND_NAME_LIMIT)))
                    .style(Style::new().fill(TEXT).font(12.0))
                    .key(format!("legend:{}", series.id)),
            );
        }
        scene
    }
}

impl Chart for RadarChart {
    type Options = RadarOptions;
    type Update = RadarUpdate;
    type Event = RadarEvent;

    fn render(&mut self, size: Size, options: &RadarOptions) -> Result<(), VizError> {
        check_size(size)?;
        self.hovered = None;
        self.empty = !options.is_drawable();
        let scene = if self.empty {
            self.series_nodes.clear();
            self.build_empty(size)
        } else {
            self.build(size, options)
        };
        self.scene = Some(scene);
        Ok(())
    }

    fn update(&mut self, update: &RadarUpdate) -> Result<(), VizError> {
        if self.scene.is_none() {
            return Err(VizError::NotRendered);
        }
        self.highlighted = update.highlighted.clone();
        self.restyle();
        Ok(())
    }

    fn handle_input(&mut self, input: Input) -> Option<RadarEvent> {
        let hit = match input {
            Input::PointerMove { x, y } => self
                .scene
                .as_ref()?
                .hit_test(x, y)
                .and_then(|k| k.strip_prefix("series:"))
                .map(str::to_string),
            Input::PointerLeave => None,
            _ => return None,
        };
        if hit == self.hovered {
            return None;
        }
        self.hovered = hit.clone();
        self.restyle();
        Some(RadarEvent::Hover(hit))
    }

    fn destroy(&mut self) {
        self.scene = None;
        self.series_nodes.clear();
        self.hovered = None;
    }

    fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::method::fixtures::method;
    use crate::model::{Modality, Stage, Task};

    fn with_tasks(id: &str, count: usize) -> Method {
        let mut m = method(id, Stage::CorrelateCases, &[]);
        m.tasks = Task::all().iter().cycle().take(count).copied().collect();
        m
    }

    #[test]
    fn test_dimensions_normalize_ranks_and_counts() {
        let mut m = method("m", Stage::Collect, &[Modality::Text, Modality::Audio, Modality::Video]);
        m.maturity = Maturity::Mature;
        m.automation = Automation::SemiAutomated;
        m.inputs = vec!["a".into(); 2];
        m.outputs = vec!["b".into(); 9];

        let dims = radar_dimensions(&m);
        assert_eq!(dims[0], 1.0);
        assert_eq!(dims[1], 0.5);
        assert_eq!(dims[2], 0.5);
        assert_eq!(dims[3], 0.0);
        assert_eq!(dims[4], 0.4);
        assert_eq!(dims[5], 1.0);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Short", 28), "Short");
        let long = "Multimodal Event Abstraction Pipeline";
        let cut = truncate_label(long, 28);
        assert_eq!(cut.chars().count(), 29);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_fewer_than_two_renders_empty_state() {
        let one = vec![with_tasks("a", 1)];
        let mut chart = RadarChart::new();
        chart
            .render(Size::new(400.0, 400.0), &RadarOptions::new(&one))
            .unwrap();
        assert!(chart.is_empty_state());
        assert!(chart.scene().unwrap().find("empty").is_some());
        assert!(chart.scene().unwrap().find("series:a").is_none());
    }

    #[test]
    fn test_only_first_three_are_drawn() {
        let methods: Vec<Method> = ["a", "b", "c", "d"].iter().map(|id| with_tasks(id, 2)).collect();
        let options = RadarOptions::new(&methods);
        assert_eq!(options.series.len(), 3);

        let mut chart = RadarChart::new();
        chart.render(Size::new(400.0, 400.0), &options).unwrap();
        let scene = chart.scene().unwrap();
        assert!(!chart.is_empty_state());
        assert!(scene.find("series:c").is_some());
        assert!(scene.find("series:d").is_none());
        for level in [25, 50, 75, 100] {
            assert!(scene.find(&format!("grid:{}", level)).is_some());
        }
    }

    #[test]
    fn test_update_restyles_in_place() {
        let methods = vec![with_tasks("a", 1), with_tasks("b", 3)];
        let mut chart = RadarChart::new();
        chart
            .render(Size::new(400.0, 400.0), &RadarOptions::new(&methods))
            .unwrap();
        let node = chart.scene().unwrap().find("series:b").unwrap();

        chart
            .update(&RadarUpdate {
                highlighted: Some("b".into()),
            })
            .unwrap();
        let scene = chart.scene().unwrap();
        assert_eq!(scene.find("series:b"), Some(node));
        assert_eq!(scene.get(node).unwrap().style.stroke_width, Some(3.0));
    }
}
