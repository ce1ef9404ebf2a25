//! Fixed color tables shared by the charts, the HTML export and the TUI.

use crate::model::{Modality, Stage};

pub const NEUTRAL_STROKE: &str = "#cbd5e1";
pub const CARD_FILL: &str = "#ffffff";
pub const MUTED_TEXT: &str = "#64748b";
pub const TEXT: &str = "#0f172a";
pub const GRID: &str = "#e2e8f0";
pub const TOOLTIP_FILL: &str = "#1e293b";

/// Series colors for the comparison radar, in compare order.
pub const COMPARE_PALETTE: [&str; 3] = ["#2563eb", "#dc2626", "#16a34a"];

pub fn stage_color(stage: Stage) -> &'static str {
    match stage {
        Stage::Collect => "#0ea5e9",
        Stage::Preprocess => "#6366f1",
        Stage::AbstractAggregate => "#a855f7",
        Stage::CorrelateCases => "#f59e0b",
        Stage::EnhanceVisualization => "#10b981",
        Stage::ApplyMining => "#ef4444",
    }
}

pub fn modality_color(modality: Modality) -> &'static str {
    match modality {
        Modality::Text => "#3b82f6",
        Modality::Image => "#f97316",
        Modality::Video => "#ec4899",
        Modality::Audio => "#8b5cf6",
        Modality::Sensor => "#14b8a6",
        Modality::Mixed => "#94a3b8",
    }
}

pub fn compare_color(index: usize) -> &'static str {
    COMPARE_PALETTE[index % COMPARE_PALETTE.len()]
}

/// Parse `#rrggbb` into components.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#0ea5e9"), Some((0x0e, 0xa5, 0xe9)));
        assert_eq!(hex_to_rgb("0ea5e9"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn test_stage_colors_are_distinct() {
        let mut colors: Vec<_> = Stage::all().iter().map(|s| stage_color(*s)).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), 6);
    }
}
