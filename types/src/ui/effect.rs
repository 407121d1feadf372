//! Short animations on the sign-in screen's panels.

use std::time::Duration;

/// Which panel is animating, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEffectKind {
    /// The alert dialog grows in from its center.
    AlertOpening,
    /// The sign-in panel shakes after validation blocked a submit.
    SubmitBlocked,
}

impl PanelEffectKind {
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::AlertOpening => Duration::from_millis(180),
            Self::SubmitBlocked => Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelEffect {
    kind: PanelEffectKind,
    elapsed: Duration,
    duration: Duration,
}

impl PanelEffect {
    #[must_use]
    pub fn alert_opening() -> Self {
        Self::new(PanelEffectKind::AlertOpening)
    }

    #[must_use]
    pub fn submit_blocked() -> Self {
        Self::new(PanelEffectKind::SubmitBlocked)
    }

    #[must_use]
    pub fn new(kind: PanelEffectKind) -> Self {
        Self::with_duration(kind, kind.duration())
    }

    #[must_use]
    pub fn with_duration(kind: PanelEffectKind, duration: Duration) -> Self {
        Self {
            kind,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Fraction of the effect played, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub fn kind(&self) -> PanelEffectKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::{PanelEffect, PanelEffectKind};
    use std::time::Duration;

    #[test]
    fn alert_opening_starts_at_zero() {
        let effect = PanelEffect::alert_opening();
        assert_eq!(effect.kind(), PanelEffectKind::AlertOpening);
        assert!(effect.progress() < f32::EPSILON);
        assert!(!effect.is_finished());
    }

    #[test]
    fn submit_blocked_runs_for_its_duration() {
        let mut effect = PanelEffect::submit_blocked();
        effect.advance(Duration::from_millis(150));
        assert!(!effect.is_finished());
        assert!((effect.progress() - 0.5).abs() < 0.01);

        effect.advance(PanelEffectKind::SubmitBlocked.duration());
        assert!(effect.is_finished());
        assert!((effect.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_duration_is_already_finished() {
        let effect = PanelEffect::with_duration(PanelEffectKind::AlertOpening, Duration::ZERO);
        assert!(effect.is_finished());
        assert!((effect.progress() - 1.0).abs() < f32::EPSILON);
    }
}
