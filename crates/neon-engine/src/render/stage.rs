/// Position of the renderer within one frame.
///
/// Stages only move forward within a frame; `Presented` returns to `Idle`
/// when the next frame begins.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd)]
pub enum FrameStage {
    #[default]
    Idle,
    GeometryPass,
    BlurPass,
    CompositePass,
    Presented,
}

impl FrameStage {
    /// The stage that must follow `self`.
    pub fn next(self) -> FrameStage {
        match self {
            FrameStage::Idle => FrameStage::GeometryPass,
            FrameStage::GeometryPass => FrameStage::BlurPass,
            FrameStage::BlurPass => FrameStage::CompositePass,
            FrameStage::CompositePass => FrameStage::Presented,
            FrameStage::Presented => FrameStage::Idle,
        }
    }

    /// Moves to `to`, which must be the direct successor.
    #[inline]
    pub(crate) fn advance(&mut self, to: FrameStage) {
        debug_assert_eq!(self.next(), to, "frame stage out of order: {self:?} -> {to:?}");
        *self = to;
    }
}

/// Result of a frame request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// All passes were recorded into the encoder.
    Rendered {
        /// Whether the stroke mesh was drawn (false for an empty scene).
        stroke_drawn: bool,
    },
    /// Nothing was recorded (zero-sized viewport or no surface).
    Skipped,
}

impl FrameOutcome {
    #[inline]
    pub fn is_rendered(self) -> bool {
        matches!(self, FrameOutcome::Rendered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut s = FrameStage::Idle;
        for to in [
            FrameStage::GeometryPass,
            FrameStage::BlurPass,
            FrameStage::CompositePass,
            FrameStage::Presented,
            FrameStage::Idle,
        ] {
            s.advance(to);
        }
        assert_eq!(s, FrameStage::Idle);
    }

    #[test]
    fn stages_are_ordered() {
        assert!(FrameStage::GeometryPass < FrameStage::BlurPass);
        assert!(FrameStage::BlurPass < FrameStage::CompositePass);
    }

    #[test]
    #[should_panic(expected = "frame stage out of order")]
    #[cfg(debug_assertions)]
    fn skipping_a_stage_panics_in_debug() {
        let mut s = FrameStage::Idle;
        s.advance(FrameStage::CompositePass);
    }
}
