//! Landscape scatter: methods placed by pipeline stage and readiness.
//!
//! x is the stage order (1..=6) and y is the maturity or automation rank.
//! Each point is nudged by a hash-derived jitter so co-located methods
//! separate without moving between redraws.

use super::chart::{check_size, Chart, Input, KeyInput, Size, VizError};
use super::jitter::jitter;
use super::palette::{
    modality_color, stage_color, GRID, MUTED_TEXT, NEUTRAL_STROKE, TEXT, TOOLTIP_FILL,
};
use super::scene::{Node, NodeId, Scene, Shape, Style};
use crate::model::{Automation, Maturity, Method, Modality, PipelineStep, Stage};
use crate::store::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const LEFT: f64 = 104.0;
const RIGHT: f64 = 24.0;
const TOP: f64 = 44.0;
const BOTTOM: f64 = 48.0;
const POINT_RADIUS: f64 = 5.0;
const HOVER_RADIUS: f64 = 8.0;
const DIMMED_OPACITY: f64 = 0.15;
const POINT_OPACITY: f64 = 0.85;
const TOOLTIP_OFFSET: f64 = 12.0;
const TOOLTIP_LINE: f64 = 16.0;
const TOOLTIP_CHAR_WIDTH: f64 = 6.5;

/// Which rank drives the vertical axis.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    #[default]
    Maturity,
    Automation,
}

impl YAxis {
    pub fn max_rank(&self) -> u8 {
        match self {
            YAxis::Maturity => Maturity::MAX_RANK,
            YAxis::Automation => Automation::MAX_RANK,
        }
    }

    /// Tick labels from rank 0 upward.
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            YAxis::Maturity => Maturity::all().iter().map(|m| m.display_name()).collect(),
            YAxis::Automation => Automation::all().iter().map(|a| a.display_name()).collect(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            YAxis::Maturity => "Maturity",
            YAxis::Automation => "Automation",
        }
    }
}

/// Point color encoding.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Modality,
    Stage,
}

/// Plot data for one method.
#[derive(Debug, Clone, PartialEq)]
pub struct LandscapePoint {
    pub id: String,
    pub name: String,
    pub stage: Stage,
    pub modality: Modality,
    pub maturity: Maturity,
    pub automation: Automation,
}

impl From<&Method> for LandscapePoint {
    fn from(method: &Method) -> Self {
        Self {
            id: method.id.clone(),
            name: method.name.clone(),
            stage: method.pipeline_step,
            modality: method.primary_modality(),
            maturity: method.maturity,
            automation: method.automation,
        }
    }
}

impl LandscapePoint {
    fn rank(&self, axis: YAxis) -> u8 {
        match axis {
            YAxis::Maturity => self.maturity.rank(),
            YAxis::Automation => self.automation.rank(),
        }
    }

    fn color(&self, mode: ColorMode) -> &'static str {
        match mode {
            ColorMode::Modality => modality_color(self.modality),
            ColorMode::Stage => stage_color(self.stage),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandscapeOptions {
    pub points: Vec<LandscapePoint>,
    pub steps: Vec<PipelineStep>,
    pub y_axis: YAxis,
    pub color_mode: ColorMode,
    pub highlighted_stage: Option<Stage>,
    pub selected_method: Option<String>,
}

impl LandscapeOptions {
    pub fn new<'a>(methods: impl IntoIterator<Item = &'a Method>, steps: Vec<PipelineStep>) -> Self {
        Self {
            points: methods.into_iter().map(LandscapePoint::from).collect(),
            steps,
            y_axis: YAxis::default(),
            color_mode: ColorMode::default(),
            highlighted_stage: None,
            selected_method: None,
        }
    }

    pub fn y_axis(mut self, axis: YAxis) -> Self {
        self.y_axis = axis;
        self
    }

    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn highlighted_stage(mut self, stage: Option<Stage>) -> Self {
        self.highlighted_stage = stage;
        self
    }

    pub fn selected_method(mut self, id: Option<String>) -> Self {
        self.selected_method = id;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandscapeUpdate {
    pub highlighted_stage: Option<Stage>,
    pub selected_method: Option<String>,
    pub hovered_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandscapeEvent {
    Hover(Option<String>),
    Click(String),
}

impl LandscapeEvent {
    pub fn to_action(&self) -> Action {
        match self {
            LandscapeEvent::Hover(id) => Action::SetHoveredMethod(id.clone()),
            LandscapeEvent::Click(id) => Action::SetSelectedMethod(Some(id.clone())),
        }
    }
}

/// Data-to-pixel mapping for one surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandscapeScale {
    size: Size,
    max_rank: u8,
}

impl LandscapeScale {
    pub fn new(size: Size, axis: YAxis) -> Self {
        Self {
            size,
            max_rank: axis.max_rank(),
        }
    }

    fn plot_width(&self) -> f64 {
        (self.size.width - LEFT - RIGHT).max(1.0)
    }

    fn plot_height(&self) -> f64 {
        (self.size.height - TOP - BOTTOM).max(1.0)
    }

    /// Stage domain is `[0.5, 6.5]` so every stage gets an equal band.
    pub fn x(&self, order: f64) -> f64 {
        LEFT + (order - 0.5) / Stage::all().len() as f64 * self.plot_width()
    }

    /// Rank domain is `[-0.5, max + 0.5]`, top is the highest rank.
    pub fn y(&self, rank: f64) -> f64 {
        let span = f64::from(self.max_rank) + 1.0;
        TOP + self.plot_height() - (rank + 0.5) / span * self.plot_height()
    }

    pub fn position(&self, point: &LandscapePoint, axis: YAxis) -> (f64, f64) {
        let (dx, dy) = jitter(&point.id);
        (
            self.x(f64::from(point.stage.order()) + dx),
            self.y(f64::from(point.rank(axis)) + dy),
        )
    }
}

/// Interactive scatter plot.
#[derive(Debug, Default)]
pub struct LandscapePlot {
    scene: Option<Scene>,
    points: Vec<LandscapePoint>,
    point_nodes: HashMap<String, NodeId>,
    color_mode: ColorMode,
    highlighted_stage: Option<Stage>,
    selected_method: Option<String>,
    /// Emphasized from outside (e.g. a hovered list row).
    emphasized: Option<String>,
    hovered: Option<String>,
    tooltip: Option<NodeId>,
    focused: Option<usize>,
}

impl LandscapePlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_node(&self, id: &str) -> Option<NodeId> {
        self.point_nodes.get(id).copied()
    }

    pub fn tooltip_node(&self) -> Option<NodeId> {
        self.tooltip
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    fn point_style(&self, point: &LandscapePoint) -> Style {
        let dimmed = self.highlighted_stage.is_some_and(|s| s != point.stage);
        let selected = self.selected_method.as_deref() == Some(point.id.as_str());
        let style = Style::new()
            .fill(point.color(self.color_mode))
            .opacity(if dimmed { DIMMED_OPACITY } else { POINT_OPACITY });
        if selected {
            style.stroke(TEXT, 2.0)
        } else {
            style.stroke("#ffffff", 1.0)
        }
    }

    fn point_radius(&self, id: &str) -> f64 {
        let active = self.hovered.as_deref() == Some(id) || self.emphasized.as_deref() == Some(id);
        if active {
            HOVER_RADIUS
        } else {
            POINT_RADIUS
        }
    }

    fn restyle(&mut self) {
        let updates: Vec<(NodeId, Style, f64)> = self
            .points
            .iter()
            .filter_map(|p| {
                self.point_nodes
                    .get(&p.id)
                    .map(|id| (*id, self.point_style(p), self.point_radius(&p.id)))
            })
            .collect();
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        for (id, style, radius) in updates {
            if let Some(node) = scene.get_mut(id) {
                node.style = style;
                if let Shape::Circle { r, .. } = &mut node.shape {
                    *r = radius;
                }
            }
        }
    }

    fn build(&mut self, size: Size, options: &LandscapeOptions) -> Scene {
        let scale = LandscapeScale::new(size, options.y_axis);
        let mut scene = Scene::new(size.width, size.height);
        let root = scene.root();
        self.point_nodes.clear();

        build_axes(&mut scene, &scale, options);
        build_legend(&mut scene, size, options.color_mode);

        let points_group = scene.add(root, Node::new(Shape::Group).key("points"));
        for point in &options.points {
            let (x, y) = scale.position(point, options.y_axis);
            let id = scene.add(
                points_group,
                Node::new(Shape::circle(x, y, POINT_RADIUS))
                    .style(self.point_style(point))
                    .key(format!("point:{}", point.id))
                    .title(point.name.clone())
                    .interactive()
                    .focusable(),
            );
            self.point_nodes.insert(point.id.clone(), id);
        }
        scene
    }

    fn show_tooltip(&mut self, id: &str, px: f64, py: f64) {
        let Some(point) = self.points.iter().find(|p| p.id == id).cloned() else {
            return;
        };
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if let Some(old) = self.tooltip.take() {
            scene.remove(old);
        }

        let detail = format!(
            "{} · {} · {}",
            point.stage.display_name(),
            point.maturity.display_name(),
            point.automation.display_name()
        );
        let widest = point.name.chars().count().max(detail.chars().count()) as f64;
        let width = widest * TOOLTIP_CHAR_WIDTH + 16.0;
        let height = TOOLTIP_LINE * 2.0 + 12.0;
        let (x, y) = clamp_tooltip(px, py, width, height, Size::new(scene.width(), scene.height()));

        let root = scene.root();
        let group = scene.add(root, Node::new(Shape::Group).key("tooltip"));
        scene.add(
            group,
            Node::new(Shape::Rect {
                x,
                y,
                width,
                height,
                radius: 4.0,
            })
            .style(Style::new().fill(TOOLTIP_FILL).opacity(0.95)),
        );
        scene.add(
            group,
            Node::new(Shape::text(x + 8.0, y + 6.0 + TOOLTIP_LINE - 4.0, point.name))
                .style(Style::new().fill("#ffffff").font(12.0).bold()),
        );
        scene.add(
            group,
            Node::new(Shape::text(x + 8.0, y + 6.0 + TOOLTIP_LINE * 2.0 - 4.0, detail))
                .style(Style::new().fill("#cbd5e1").font(11.0)),
        );
        self.tooltip = Some(group);
    }

    fn hide_tooltip(&mut self) {
        if let (Some(scene), Some(tooltip)) = (self.scene.as_mut(), self.tooltip.take()) {
            scene.remove(tooltip);
        }
    }

    fn pointer_move(&mut self, x: f64, y: f64) -> Option<LandscapeEvent> {
        let hit = self
            .scene
            .as_ref()?
            .hit_test(x, y)
            .and_then(|key| key.strip_prefix("point:"))
            .map(str::to_string);

        match hit {
            Some(id) if self.hovered.as_deref() == Some(id.as_str()) => {
                self.show_tooltip(&id, x, y);
                None
            }
            Some(id) => {
                self.hovered = Some(id.clone());
                self.restyle();
                self.show_tooltip(&id, x, y);
                Some(LandscapeEvent::Hover(Some(id)))
            }
            None => self.pointer_leave(),
        }
    }

    fn pointer_leave(&mut self) -> Option<LandscapeEvent> {
        self.hovered.take()?;
        self.hide_tooltip();
        self.restyle();
        Some(LandscapeEvent::Hover(None))
    }

    fn focused_id(&self) -> Option<String> {
        let scene = self.scene.as_ref()?;
        let order = scene.focus_order();
        let key = order.get(self.focused?)?;
        key.strip_prefix("point:").map(str::to_string)
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.scene.as_ref().map_or(0, |s| s.focus_order().len());
        if len == 0 {
            self.focused = None;
            return;
        }
        self.focused = Some(match (self.focused, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
    }
}

/// Place a tooltip near the pointer without leaving the container.
pub fn clamp_tooltip(px: f64, py: f64, width: f64, height: f64, container: Size) -> (f64, f64) {
    let max_x = (container.width - width - 4.0).max(0.0);
    let max_y = (container.height - height - 4.0).max(0.0);
    (
        (px + TOOLTIP_OFFSET).clamp(0.0, max_x),
        (py + TOOLTIP_OFFSET).clamp(0.0, max_y),
    )
}

fn build_axes(scene: &mut Scene, scale: &LandscapeScale, options: &LandscapeOptions) {
    let root = scene.root();
    let axes = scene.add(root, Node::new(Shape::Group).key("axes"));
    let bottom = scale.y(-0.5);
    let top = scale.y(f64::from(options.y_axis.max_rank()) + 0.5);

    for (rank, label) in options.y_axis.labels().into_iter().enumerate() {
        let y = scale.y(rank as f64);
        scene.add(
            axes,
            Node::new(Shape::line(scale.x(0.5), y, scale.x(6.5), y))
                .style(Style::new().stroke(GRID, 1.0)),
        );
        scene.add(
            axes,
            Node::new(Shape::text(LEFT - 8.0, y + 4.0, label))
                .style(Style::new().fill(MUTED_TEXT).font(11.0).anchor("end")),
        );
    }

    for stage in Stage::all() {
        let order = f64::from(stage.order());
        let boundary = scale.x(order + 0.5);
        scene.add(
            axes,
            Node::new(Shape::line(boundary, top, boundary, bottom))
                .style(Style::new().stroke(GRID, 1.0).dashed("3,3")),
        );
        let name = options
            .steps
            .iter()
            .find(|s| s.id == *stage)
            .map(|s| s.name.as_str())
            .unwrap_or_else(|| stage.display_name());
        scene.add(
            axes,
            Node::new(Shape::text(scale.x(order), bottom + 18.0, name))
                .style(Style::new().fill(MUTED_TEXT).font(10.0).anchor("middle")),
        );
    }

    scene.add(
        axes,
        Node::new(Shape::line(scale.x(0.5), bottom, scale.x(6.5), bottom))
            .style(Style::new().stroke(NEUTRAL_STROKE, 1.0)),
    );
    scene.add(
        axes,
        Node::new(Shape::text(14.0, (top + bottom) / 2.0, options.y_axis.title()))
            .style(Style::new().fill(TEXT).font(11.0).bold()),
    );
}

fn build_legend(scene: &mut Scene, size: Size, mode: ColorMode) {
    let entries: Vec<(&'static str, &'static str)> = match mode {
        ColorMode::Modality => Modality::all()
            .iter()
            .map(|m| (m.display_name(), modality_color(*m)))
            .collect(),
        ColorMode::Stage => Stage::all()
            .iter()
            .map(|s| (s.display_name(), stage_color(*s)))
            .collect(),
    };
    let root = scene.root();
    let legend = scene.add(root, Node::new(Shape::Group).key("legend"));
    let step = (size.width - LEFT - RIGHT).max(1.0) / entries.len() as f64;
    for (i, (label, color)) in entries.into_iter().enumerate() {
        let x = LEFT + i as f64 * step;
        scene.add(
            legend,
            Node::new(Shape::circle(x + 5.0, 18.0, 5.0))
                .style(Style::new().fill(color))
                .key(format!("legend:{}", label)),
        );
        scene.add(
            legend,
            Node::new(Shape::text(x + 14.0, 22.0, label))
                .style(Style::new().fill(TEXT).font(11.0)),
        );
    }
}

impl Chart for LandscapePlot {
    type Options = LandscapeOptions;
    type Update = LandscapeUpdate;
    type Event = LandscapeEvent;

    fn render(&mut self, size: Size, options: &LandscapeOptions) -> Result<(), VizError> {
        check_size(size)?;
        self.points = options.points.clone();
        self.color_mode = options.color_mode;
        self.highlighted_stage = options.highlighted_stage;
        self.selected_method = options.selected_method.clone();
        self.hovered = None;
        self.tooltip = None;
        self.focused = None;
        let scene = self.build(size, options);
        self.scene = Some(scene);
        Ok(())
    }

    fn update(&mut self, update: &LandscapeUpdate) -> Result<(), VizError> {
        if self.scene.is_none() {
            return Err(VizError::NotRendered);
        }
        self.highlighted_stage = update.highlighted_stage;
        self.selected_method = update.selected_method.clone();
        self.emphasized = update.hovered_method.clone();
        self.restyle();
        Ok(())
    }

    fn handle_input(&mut self, input: Input) -> Option<LandscapeEvent> {
        self.scene.as_ref()?;
        match input {
            Input::PointerMove { x, y } => self.pointer_move(x, y),
            Input::PointerLeave => self.pointer_leave(),
            Input::Click { x, y } => self
                .scene
                .as_ref()?
                .hit_test(x, y)
                .and_then(|key| key.strip_prefix("point:"))
                .map(|id| LandscapeEvent::Click(id.to_string())),
            Input::Key(KeyInput::Tab) => {
                self.move_focus(true);
                None
            }
            Input::Key(KeyInput::BackTab) => {
                self.move_focus(false);
                None
            }
            Input::Key(KeyInput::Enter | KeyInput::Space) => {
                self.focused_id().map(LandscapeEvent::Click)
            }
        }
    }

    fn destroy(&mut self) {
        self.hide_tooltip();
        self.scene = None;
        self.point_nodes.clear();
        self.hovered = None;
        self.focused = None;
    }

    fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}
