//! Retained scene graph for chart rendering.
//!
//! Charts build a tree of shapes once, then restyle nodes in place on
//! selection changes. Node ids stay valid until the node is removed or the
//! scene is rebuilt. The scene serializes to SVG and answers pointer hit
//! tests against keyed nodes.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::{self, Write};

/// Handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Geometry of a node. Coordinates are absolute scene pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Path {
        d: String,
    },
    Polygon {
        points: Vec<(f64, f64)>,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
    },
}

impl Shape {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
            radius: 0.0,
        }
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Shape::Circle { cx, cy, r }
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Shape::Line { x1, y1, x2, y2 }
    }

    pub fn text(x: f64, y: f64, content: impl Into<String>) -> Self {
        Shape::Text {
            x,
            y,
            content: content.into(),
        }
    }

    /// Whether the point lies inside the filled area.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                ..
            } => px >= *x && px <= x + width && py >= *y && py <= y + height,
            Shape::Circle { cx, cy, r } => (px - cx).powi(2) + (py - cy).powi(2) <= r * r,
            Shape::Polygon { points } => polygon_contains(points, px, py),
            Shape::Group | Shape::Line { .. } | Shape::Path { .. } | Shape::Text { .. } => false,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Shape::Group => "g",
            Shape::Rect { .. } => "rect",
            Shape::Circle { .. } => "circle",
            Shape::Line { .. } => "line",
            Shape::Path { .. } => "path",
            Shape::Polygon { .. } => "polygon",
            Shape::Text { .. } => "text",
        }
    }

    fn write_geometry<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            Shape::Group => Ok(()),
            Shape::Rect {
                x,
                y,
                width,
                height,
                radius,
            } if *radius > 0.0 => write!(
                out,
                r#" x="{x:.1}" y="{y:.1}" width="{width:.1}" height="{height:.1}" rx="{radius:.1}""#
            ),
            Shape::Rect {
                x,
                y,
                width,
                height,
                ..
            } => write!(
                out,
                r#" x="{x:.1}" y="{y:.1}" width="{width:.1}" height="{height:.1}""#
            ),
            Shape::Circle { cx, cy, r } => write!(out, r#" cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}""#),
            Shape::Line { x1, y1, x2, y2 } => write!(
                out,
                r#" x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}""#
            ),
            Shape::Path { d } => write!(out, r#" d="{}""#, encode_double_quoted_attribute(d)),
            Shape::Polygon { points } => {
                let joined: Vec<String> = points
                    .iter()
                    .map(|(x, y)| format!("{x:.1},{y:.1}"))
                    .collect();
                write!(out, r#" points="{}""#, joined.join(" "))
            }
            Shape::Text { x, y, .. } => write!(out, r#" x="{x:.1}" y="{y:.1}""#),
        }
    }
}

fn polygon_contains(points: &[(f64, f64)], px: f64, py: f64) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Presentation attributes. Unset fields are omitted from the output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<String>,
    pub fill_opacity: Option<f64>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub stroke_dash: Option<String>,
    pub opacity: Option<f64>,
    pub font_size: Option<f64>,
    pub font_weight: Option<&'static str>,
    pub text_anchor: Option<&'static str>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn fill_opacity(mut self, value: f64) -> Self {
        self.fill_opacity = Some(value);
        self
    }

    pub fn stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(color.into());
        self.stroke_width = Some(width);
        self
    }

    pub fn dashed(mut self, pattern: impl Into<String>) -> Self {
        self.stroke_dash = Some(pattern.into());
        self
    }

    pub fn opacity(mut self, value: f64) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn font(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = Some("600");
        self
    }

    pub fn anchor(mut self, anchor: &'static str) -> Self {
        self.text_anchor = Some(anchor);
        self
    }

    fn write_attrs<W: Write>(&self, out: &mut W) -> fmt::Result {
        if let Some(fill) = &self.fill {
            write!(out, r#" fill="{}""#, encode_double_quoted_attribute(fill))?;
        }
        if let Some(v) = self.fill_opacity {
            write!(out, r#" fill-opacity="{v:.2}""#)?;
        }
        if let Some(stroke) = &self.stroke {
            write!(out, r#" stroke="{}""#, encode_double_quoted_attribute(stroke))?;
        }
        if let Some(w) = self.stroke_width {
            write!(out, r#" stroke-width="{w:.1}""#)?;
        }
        if let Some(dash) = &self.stroke_dash {
            write!(out, r#" stroke-dasharray="{}""#, encode_double_quoted_attribute(dash))?;
        }
        if let Some(v) = self.opacity {
            write!(out, r#" opacity="{v:.2}""#)?;
        }
        if let Some(size) = self.font_size {
            write!(out, r#" font-size="{size:.0}""#)?;
        }
        if let Some(weight) = self.font_weight {
            write!(out, r#" font-weight="{weight}""#)?;
        }
        if let Some(anchor) = self.text_anchor {
            write!(out, r#" text-anchor="{anchor}""#)?;
        }
        Ok(())
    }
}

/// A node plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub shape: Shape,
    pub style: Style,
    /// Stable semantic key such as `stage:collect` or `point:<id>`.
    pub key: Option<String>,
    /// Native tooltip text in the exported SVG.
    pub title: Option<String>,
    /// Participates in hit testing.
    pub interactive: bool,
    /// Reachable by keyboard focus.
    pub focusable: bool,
    /// Fades in on the first mount.
    pub intro: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    removed: bool,
}

impl Node {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            style: Style::default(),
            key: None,
            title: None,
            interactive: false,
            focusable: false,
            intro: false,
            parent: None,
            children: Vec::new(),
            removed: false,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    pub fn intro(mut self) -> Self {
        self.intro = true;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena of nodes rooted at a single group.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    width: f64,
    height: f64,
    nodes: Vec<Node>,
    /// Duration of the fade-in for `intro` nodes, if any.
    pub intro_ms: Option<u32>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            nodes: vec![Node::new(Shape::Group)],
            intro_ms: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Append `node` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).filter(|n| !n.removed)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).filter(|n| !n.removed)
    }

    pub fn set_style(&mut self, id: NodeId, style: Style) {
        if let Some(node) = self.get_mut(id) {
            node.style = style;
        }
    }

    /// First live node carrying `key`.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| !n.removed && n.key.as_deref() == Some(key))
            .map(NodeId)
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root() {
            return;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0) {
                node.removed = true;
                stack.extend(node.children.iter().copied());
            }
        }
        let parent = self.nodes.get(id.0).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            p.children.retain(|c| *c != id);
        }
    }

    /// Number of live nodes, root included.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.removed).count()
    }

    /// Live nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.removed)
            .map(|(i, n)| (NodeId(i), n))
    }

    /// Keys of focusable nodes in drawing order.
    pub fn focus_order(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, n)| n.focusable)
            .filter_map(|(_, n)| n.key.as_deref())
            .collect()
    }

    /// Key of the topmost interactive node under the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        self.nodes
            .iter()
            .rev()
            .filter(|n| !n.removed && n.interactive)
            .find(|n| n.shape.contains(x, y))
            .and_then(|n| n.key.as_deref())
    }

    /// Serialize the live tree as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    fn write_node<W: Write>(&self, id: NodeId, out: &mut W) -> fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };
        let tag = node.shape.tag();
        write!(out, "<{tag}")?;
        node.shape.write_geometry(out)?;
        node.style.write_attrs(out)?;
        if let Some(key) = &node.key {
            write!(out, r#" data-key="{}""#, encode_double_quoted_attribute(key))?;
        }
        if node.focusable {
            out.write_str(r#" tabindex="0""#)?;
        }

        let animate = node.intro && self.intro_ms.is_some();
        let has_body = !node.children.is_empty()
            || node.title.is_some()
            || animate
            || matches!(node.shape, Shape::Text { .. });
        if !has_body {
            return out.write_str("/>");
        }
        out.write_char('>')?;

        if let Some(title) = &node.title {
            write!(out, "<title>{}</title>", encode_text(title))?;
        }
        if let (true, Some(ms)) = (animate, self.intro_ms) {
            write!(
                out,
                r#"<animate attributeName="opacity" from="0" to="1" dur="{ms}ms" fill="freeze"/>"#
            )?;
        }
        if let Shape::Text { content, .. } = &node.shape {
            out.write_str(&encode_text(content))?;
        }
        for child in &node.children {
            self.write_node(*child, out)?;
        }
        write!(out, "</{tag}>")
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="{w:.0}" height="{h:.0}" font-family="system-ui, sans-serif">"#,
            w = self.width,
            h = self.height
        )?;
        for child in self.nodes[0].children.iter() {
            self.write_node(*child, f)?;
        }
        f.write_str("</svg>")
    }
}

mod tests {
    use super::*;

    #[test]
    fn test_restyle_keeps_node_ids() {
        let mut scene = Scene::new(100.0, 50.0);
        let root = scene.root();
        let card = scene.add(root, Node::new(Shape::rect(0.0, 0.0, 10.0, 10.0)).key("card"));
        scene.set_style(card, Style::new().fill("#fff"));
        assert_eq!(scene.find("card"), Some(card));
        assert_eq!(
            scene.get(card).and_then(|n| n.style.fill.clone()),
            Some("#fff".to_string())
        );
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut scene = Scene::new(100.0, 50.0);
        let root = scene.root();
        let group = scene.add(root, Node::new(Shape::Group).key("tooltip"));
        scene.add(group, Node::new(Shape::text(0.0, 0.0, "hi")));
        assert_eq!(scene.live_count(), 3);

        scene.remove(group);
        assert_eq!(scene.live_count(), 1);
        assert_eq!(scene.find("tooltip"), None);
        assert!(!scene.to_svg().contains("hi"));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut scene = Scene::new(100.0, 100.0);
        let root = scene.root();
        scene.add(
            root,
            Node::new(Shape::rect(0.0, 0.0, 100.0, 100.0)).key("back").interactive(),
        );
        scene.add(
            root,
            Node::new(Shape::circle(50.0, 50.0, 5.0)).key("front").interactive(),
        );
        scene.add(root, Node::new(Shape::circle(10.0, 10.0, 5.0)).key("inert"));

        assert_eq!(scene.hit_test(50.0, 52.0), Some("front"));
        assert_eq!(scene.hit_test(10.0, 10.0), Some("back"));
        assert_eq!(scene.hit_test(200.0, 10.0), None);
    }

    #[test]
    fn test_polygon_contains() {
        let tri = Shape::Polygon {
            points: vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)],
        };
        assert!(tri.contains(2.0, 2.0));
        assert!(!tri.contains(9.0, 9.0));
    }

    #[test]
    fn test_svg_escapes_text() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        scene.add(root, Node::new(Shape::text(0.0, 0.0, "a < b & c")));
        let svg = scene.to_svg();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_display_writes_nested_nodes() {
        let mut scene = Scene::new(20.0, 10.0);
        let root = scene.root();
        let group = scene.add(root, Node::new(Shape::Group));
        scene.add(group, Node::new(Shape::circle(5.0, 5.0, 2.0)));
        let svg = format!("{scene}");
        assert_eq!(svg, scene.to_svg());
        let g = svg.find("<g").unwrap();
        let circle = svg.find("<circle").unwrap();
        assert!(g < circle);
        assert!(svg.contains(r#"cx="5.0" cy="5.0" r="2.0""#));
    }

    #[test]
    fn test_intro_animation_only_when_enabled() {
        let mut scene = Scene::new(10.0, 10.0);
        let root = scene.root();
        scene.add(root, Node::new(Shape::rect(0.0, 0.0, 1.0, 1.0)).intro());
        assert!(!scene.to_svg().contains("<animate"));
        scene.intro_ms = Some(400);
        assert!(scene.to_svg().contains(r#"dur="400ms""#));
    }
}
