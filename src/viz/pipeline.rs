//! Pipeline diagram: six stage cards fed by six data-source circles.
//!
//! Cards sit left to right in stage order at equal widths. The left margin
//! holds one circle per modality at fixed positions, each joined to the
//! `collect` card by a curved connector. Counts always come from the full
//! dataset, never the filtered list.

use super::chart::{check_size, Chart, Input, KeyInput, Size, VizError};
use super::palette::{modality_color, stage_color, CARD_FILL, MUTED_TEXT, NEUTRAL_STROKE, TEXT};
use super::scene::{Node, NodeId, Scene, Shape, Style};
use crate::dataset::{count_by_modality, count_by_stage};
use crate::model::{Dataset, Modality, PipelineStep, Stage};
use crate::store::{Action, UiState};
use std::collections::BTreeMap;

const PADDING: f64 = 16.0;
const CARD_GAP: f64 = 14.0;
const MAX_CARD_HEIGHT: f64 = 150.0;
const MIN_SOURCE_MARGIN: f64 = 120.0;
const SOURCE_MARGIN_FRACTION: f64 = 0.2;
const HOVER_STROKE_DELTA: f64 = 1.5;
const INTRO_MS: u32 = 450;
const APPROX_CHAR_WIDTH: f64 = 7.0;

/// Circle centers as fractions of the margin box. Hand placed so no two
/// circles overlap at any margin size.
const SOURCE_LAYOUT: [(Modality, f64, f64); 6] = [
    (Modality::Text, 0.28, 0.12),
    (Modality::Image, 0.70, 0.26),
    (Modality::Video, 0.24, 0.42),
    (Modality::Audio, 0.66, 0.58),
    (Modality::Sensor, 0.30, 0.74),
    (Modality::Mixed, 0.70, 0.90),
];

/// What a pointer can rest on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineTarget {
    Stage(Stage),
    Source(Modality),
}

impl PipelineTarget {
    fn key(&self) -> String {
        match self {
            PipelineTarget::Stage(stage) => format!("stage:{}", stage.as_str()),
            PipelineTarget::Source(modality) => format!("source:{}", modality.as_str()),
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        if let Some(id) = key.strip_prefix("stage:") {
            return id.parse().ok().map(PipelineTarget::Stage);
        }
        key.strip_prefix("source:")
            .and_then(|id| id.parse().ok())
            .map(PipelineTarget::Source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    StageClicked(Stage),
    SourceClicked(Modality),
    /// Transient only; never reaches the store.
    Hovered(Option<PipelineTarget>),
}

impl PipelineEvent {
    /// Store action for this event under the current UI selection.
    pub fn to_action(&self, ui: &UiState) -> Option<Action> {
        match self {
            PipelineEvent::StageClicked(stage) => Some(stage_click_action(
                *stage,
                ui.selected_step,
                ui.selected_modality,
            )),
            PipelineEvent::SourceClicked(modality) => {
                Some(source_click_action(*modality, ui.selected_modality))
            }
            PipelineEvent::Hovered(_) => None,
        }
    }
}

/// Click contract for stage cards.
///
/// Re-clicking the sole active stage clears it. Clicking `collect` while a
/// modality is active keeps `collect` and drops the modality. Anything else
/// selects the clicked stage.
pub fn stage_click_action(
    clicked: Stage,
    selected_step: Option<Stage>,
    selected_modality: Option<Modality>,
) -> Action {
    if selected_step == Some(clicked) && selected_modality.is_none() {
        Action::SetSelectedStep(None)
    } else {
        // SetSelectedStep clears the modality, which covers the collect case.
        Action::SetSelectedStep(Some(clicked))
    }
}

/// Click contract for data-source circles: toggle, one modality at a time.
pub fn source_click_action(clicked: Modality, selected_modality: Option<Modality>) -> Action {
    if selected_modality == Some(clicked) {
        Action::SetSelectedModality(None)
    } else {
        Action::SetSelectedModality(Some(clicked))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub steps: Vec<PipelineStep>,
    pub stage_counts: BTreeMap<Stage, usize>,
    pub modality_counts: BTreeMap<Modality, usize>,
    pub selected_step: Option<Stage>,
    pub selected_modality: Option<Modality>,
}

impl PipelineOptions {
    pub fn from_dataset(dataset: &Dataset, ui: &UiState) -> Self {
        Self {
            steps: dataset.ordered_steps(),
            stage_counts: count_by_stage(&dataset.methods),
            modality_counts: count_by_modality(&dataset.methods),
            selected_step: ui.selected_step,
            selected_modality: ui.selected_modality,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineUpdate {
    pub selected_step: Option<Stage>,
    pub selected_modality: Option<Modality>,
}

impl From<&UiState> for PipelineUpdate {
    fn from(ui: &UiState) -> Self {
        Self {
            selected_step: ui.selected_step,
            selected_modality: ui.selected_modality,
        }
    }
}

/// Card and connector geometry for a surface size.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineLayout {
    pub margin: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub card_y: f64,
    pub cards: Vec<(Stage, f64)>,
    pub sources: Vec<(Modality, f64, f64, f64)>,
}

impl PipelineLayout {
    pub fn compute(size: Size, steps: &[PipelineStep]) -> Self {
        let margin = (size.width * SOURCE_MARGIN_FRACTION).max(MIN_SOURCE_MARGIN);
        let count = steps.len().max(1) as f64;
        let available = (size.width - margin - PADDING).max(count);
        let card_width = ((available - CARD_GAP * (count - 1.0)) / count).max(1.0);
        let card_height = (size.height - 2.0 * PADDING).clamp(1.0, MAX_CARD_HEIGHT);
        let card_y = (size.height - card_height) / 2.0;

        let cards = steps
            .iter()
            .enumerate()
            .map(|(i, step)| (step.id, margin + i as f64 * (card_width + CARD_GAP)))
            .collect();

        let box_width = margin - PADDING * 2.0;
        let box_height = size.height - PADDING * 2.0;
        let radius = (box_width * 0.14).min(box_height * 0.07).max(6.0);
        let sources = SOURCE_LAYOUT
            .iter()
            .map(|(modality, fx, fy)| {
                (
                    *modality,
                    PADDING + fx * box_width,
                    PADDING + fy * box_height,
                    radius,
                )
            })
            .collect();

        Self {
            margin,
            card_width,
            card_height,
            card_y,
            cards,
            sources,
        }
    }

    fn collect_anchor(&self) -> (f64, f64) {
        let x = self
            .cards
            .iter()
            .find(|(stage, _)| *stage == Stage::Collect)
            .map(|(_, x)| *x)
            .unwrap_or(self.margin);
        (x, self.card_y + self.card_height / 2.0)
    }
}

/// Interactive pipeline diagram.
#[derive(Debug, Default)]
pub struct PipelineDiagram {
    scene: Option<Scene>,
    stage_nodes: BTreeMap<Stage, NodeId>,
    source_nodes: BTreeMap<Modality, NodeId>,
    link_nodes: BTreeMap<Modality, NodeId>,
    selected_step: Option<Stage>,
    selected_modality: Option<Modality>,
    hovered: Option<PipelineTarget>,
    focused: Option<usize>,
    rendered_once: bool,
}

impl PipelineDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<PipelineTarget> {
        self.hovered
    }

    pub fn stage_node(&self, stage: Stage) -> Option<NodeId> {
        self.stage_nodes.get(&stage).copied()
    }

    pub fn source_node(&self, modality: Modality) -> Option<NodeId> {
        self.source_nodes.get(&modality).copied()
    }

    fn card_style(&self, stage: Stage) -> Style {
        let highlighted = self.selected_step == Some(stage);
        let hover = self.hover_delta(PipelineTarget::Stage(stage));
        if highlighted {
            Style::new()
                .fill(stage_color(stage))
                .fill_opacity(0.12)
                .stroke(stage_color(stage), 3.0 + hover)
        } else {
            Style::new()
                .fill(CARD_FILL)
                .stroke(NEUTRAL_STROKE, 1.5 + hover)
        }
    }

    fn source_style(&self, modality: Modality) -> Style {
        let highlighted = self.selected_modality == Some(modality);
        let hover = self.hover_delta(PipelineTarget::Source(modality));
        let color = modality_color(modality);
        Style::new()
            .fill(color)
            .fill_opacity(if highlighted { 0.9 } else { 0.35 })
            .stroke(color, if highlighted { 3.0 } else { 1.0 } + hover)
    }

    fn link_style(&self, modality: Modality) -> Style {
        if self.selected_modality == Some(modality) {
            Style::new().fill("none").stroke(modality_color(modality), 2.5)
        } else {
            Style::new()
                .fill("none")
                .stroke(NEUTRAL_STROKE, 1.2)
                .opacity(0.8)
        }
    }

    fn hover_delta(&self, target: PipelineTarget) -> f64 {
        if self.hovered == Some(target) {
            HOVER_STROKE_DELTA
        } else {
            0.0
        }
    }

    fn restyle(&mut self) {
        let cards: Vec<_> = self
            .stage_nodes
            .iter()
            .map(|(stage, id)| (*id, self.card_style(*stage)))
            .collect();
        let sources: Vec<_> = self
            .source_nodes
            .iter()
            .map(|(m, id)| (*id, self.source_style(*m)))
            .collect();
        let links: Vec<_> = self
            .link_nodes
            .iter()
            .map(|(m, id)| (*id, self.link_style(*m)))
            .collect();
        if let Some(scene) = self.scene.as_mut() {
            for (id, style) in cards.into_iter().chain(sources).chain(links) {
                scene.set_style(id, style);
            }
        }
    }

    fn build(&mut self, size: Size, options: &PipelineOptions) -> Scene {
        let layout = PipelineLayout::compute(size, &options.steps);
        let mut scene = Scene::new(size.width, size.height);
        let root = scene.root();
        self.stage_nodes.clear();
        self.source_nodes.clear();
        self.link_nodes.clear();

        let (anchor_x, anchor_y) = layout.collect_anchor();
        let links = scene.add(root, Node::new(Shape::Group).key("links"));
        for (modality, cx, cy, r) in &layout.sources {
            let start_x = cx + r;
            let dx = (anchor_x - start_x) / 2.0;
            let d = format!(
                "M {start_x:.1} {cy:.1} C {:.1} {cy:.1}, {:.1} {anchor_y:.1}, {anchor_x:.1} {anchor_y:.1}",
                start_x + dx,
                anchor_x - dx
            );
            let id = scene.add(
                links,
                Node::new(Shape::Path { d })
                    .style(self.link_style(*modality))
                    .key(format!("link:{}", modality.as_str()))
                    .intro(),
            );
            self.link_nodes.insert(*modality, id);
        }

        for (modality, cx, cy, r) in &layout.sources {
            let target = PipelineTarget::Source(*modality);
            let count = options.modality_counts.get(modality).copied().unwrap_or(0);
            let group = scene.add(root, Node::new(Shape::Group).intro());
            let circle = scene.add(
                group,
                Node::new(Shape::circle(*cx, *cy, *r))
                    .style(self.source_style(*modality))
                    .key(target.key())
                    .title(format!("{}: {} methods", modality.display_name(), count))
                    .interactive()
                    .focusable(),
            );
            scene.add(
                group,
                Node::new(Shape::text(*cx, cy + 4.0, count.to_string()))
                    .style(Style::new().fill(TEXT).font(11.0).bold().anchor("middle")),
            );
            scene.add(
                group,
                Node::new(Shape::text(*cx, cy + r + 12.0, modality.display_name()))
                    .style(Style::new().fill(MUTED_TEXT).font(10.0).anchor("middle")),
            );
            self.source_nodes.insert(*modality, circle);
        }

        let label_chars = ((layout.card_width - 16.0) / APPROX_CHAR_WIDTH).max(3.0) as usize;
        for (i, (stage, x)) in layout.cards.iter().enumerate() {
            if i > 0 {
                let mid_y = layout.card_y + layout.card_height / 2.0;
                scene.add(
                    root,
                    Node::new(Shape::line(x - CARD_GAP, mid_y, *x, mid_y))
                        .style(Style::new().stroke(NEUTRAL_STROKE, 2.0)),
                );
            }

            let target = PipelineTarget::Stage(*stage);
            let name = options
                .steps
                .iter()
                .find(|s| s.id == *stage)
                .map(|s| s.name.as_str())
                .unwrap_or_else(|| stage.display_name());
            let count = options.stage_counts.get(stage).copied().unwrap_or(0);

            let group = scene.add(root, Node::new(Shape::Group).intro());
            let card = scene.add(
                group,
                Node::new(Shape::Rect {
                    x: *x,
                    y: layout.card_y,
                    width: layout.card_width,
                    height: layout.card_height,
                    radius: 8.0,
                })
                .style(self.card_style(*stage))
                .key(target.key())
                .title(format!("{}: {} methods", name, count))
                .interactive()
                .focusable(),
            );
            let cx = x + layout.card_width / 2.0;
            scene.add(
                group,
                Node::new(Shape::text(cx, layout.card_y + 22.0, stage.order().to_string()))
                    .style(Style::new().fill(stage_color(*stage)).font(12.0).bold().anchor("middle")),
            );
            scene.add(
                group,
                Node::new(Shape::text(cx, layout.card_y + 44.0, fit_label(name, label_chars)))
                    .style(Style::new().fill(TEXT).font(12.0).bold().anchor("middle")),
            );
            scene.add(
                group,
                Node::new(Shape::text(
                    cx,
                    layout.card_y + layout.card_height - 16.0,
                    format!("{} methods", count),
                ))
                .style(Style::new().fill(MUTED_TEXT).font(11.0).anchor("middle")),
            );
            self.stage_nodes.insert(*stage, card);
        }

        scene
    }

    fn focus_target(&self) -> Option<PipelineTarget> {
        let scene = self.scene.as_ref()?;
        let order = scene.focus_order();
        self.focused
            .and_then(|i| order.get(i).copied())
            .and_then(PipelineTarget::from_key)
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.scene.as_ref().map_or(0, |s| s.focus_order().len());
        if len == 0 {
            return;
        }
        self.focused = Some(match (self.focused, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
    }

    fn set_hovered(&mut self, target: Option<PipelineTarget>) -> Option<PipelineEvent> {
        if self.hovered == target {
            return None;
        }
        self.hovered = target;
        self.restyle();
        Some(PipelineEvent::Hovered(target))
    }
}

fn click_event(target: PipelineTarget) -> PipelineEvent {
    match target {
        PipelineTarget::Stage(stage) => PipelineEvent::StageClicked(stage),
        PipelineTarget::Source(modality) => PipelineEvent::SourceClicked(modality),
    }
}

/// Shorten a label to `max` chars, marking the cut with an ellipsis.
fn fit_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let kept: String = label.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

impl Chart for PipelineDiagram {
    type Options = PipelineOptions;
    type Update = PipelineUpdate;
    type Event = PipelineEvent;

    fn render(&mut self, size: Size, options: &PipelineOptions) -> Result<(), VizError> {
        check_size(size)?;
        self.selected_step = options.selected_step;
        self.selected_modality = options.selected_modality;
        self.hovered = None;
        self.focused = None;
        let mut scene = self.build(size, options);
        if !self.rendered_once {
            scene.intro_ms = Some(INTRO_MS);
            self.rendered_once = true;
        }
        self.scene = Some(scene);
        Ok(())
    }

    fn update(&mut self, update: &PipelineUpdate) -> Result<(), VizError> {
        if self.scene.is_none() {
            return Err(VizError::NotRendered);
        }
        self.selected_step = update.selected_step;
        self.selected_modality = update.selected_modality;
        self.restyle();
        Ok(())
    }

    fn handle_input(&mut self, input: Input) -> Option<PipelineEvent> {
        let scene = self.scene.as_ref()?;
        match input {
            Input::PointerMove { x, y } => {
                let target = scene.hit_test(x, y).and_then(PipelineTarget::from_key);
                self.set_hovered(target)
            }
            Input::PointerLeave => self.set_hovered(None),
            Input::Click { x, y } => scene
                .hit_test(x, y)
                .and_then(PipelineTarget::from_key)
                .map(click_event),
            Input::Key(KeyInput::Tab) => {
                self.move_focus(true);
                None
            }
            Input::Key(KeyInput::BackTab) => {
                self.move_focus(false);
                None
            }
            Input::Key(KeyInput::Enter | KeyInput::Space) => self.focus_target().map(click_event),
        }
    }

    fn destroy(&mut self) {
        self.scene = None;
        self.stage_nodes.clear();
        self.source_nodes.clear();
        self.link_nodes.clear();
        self.hovered = None;
        self.focused = None;
    }

    fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}
