//! The chart lifecycle contract.
//!
//! A chart is rebuilt wholesale by [`Chart::render`] and restyled in place
//! by [`Chart::update`]. The owner decides which one to call; see
//! [`ChartBinding`](super::binding::ChartBinding).

use super::scene::Scene;

/// Drawing surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A surface with zero (or nonsensical) extent cannot be drawn on yet.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VizError {
    #[error("chart has not been rendered yet")]
    NotRendered,

    #[error("drawing surface still unmeasurable after {attempts} attempts")]
    SurfaceUnmeasurable { attempts: u32 },

    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

/// Keys a focused chart element reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Space,
    /// Move focus forward.
    Tab,
    /// Move focus backward.
    BackTab,
}

/// Pointer and keyboard input delivered to a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Click { x: f64, y: f64 },
    Key(KeyInput),
}

/// A chart with a retained scene.
pub trait Chart {
    /// Everything needed for a full rebuild.
    type Options;
    /// Presentation-only changes applied in place.
    type Update;
    /// Events emitted back to the owner.
    type Event;

    /// Rebuild the scene from scratch.
    fn render(&mut self, size: Size, options: &Self::Options) -> Result<(), VizError>;

    /// Restyle the existing scene. Node ids are preserved.
    fn update(&mut self, update: &Self::Update) -> Result<(), VizError>;

    /// Translate input into chart events, applying transient visual state.
    fn handle_input(&mut self, input: Input) -> Option<Self::Event>;

    /// Drop the scene and any transient nodes.
    fn destroy(&mut self);

    fn scene(&self) -> Option<&Scene>;
}

pub(crate) fn check_size(size: Size) -> Result<(), VizError> {
    if size.is_measurable() {
        Ok(())
    } else {
        Err(VizError::InvalidSize {
            width: size.width,
            height: size.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_measurable() {
        assert!(Size::new(640.0, 320.0).is_measurable());
        assert!(!Size::new(0.0, 320.0).is_measurable());
        assert!(!Size::new(f64::NAN, 320.0).is_measurable());
        assert!(check_size(Size::new(-1.0, 1.0)).is_err());
    }
}
