use std::time::Duration;

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Grow from the center. Used when a modal opens.
    PopScale,
    /// Horizontal wobble. Used on a wrong answer.
    Shake,
}

/// A short, frame-driven animation. The tui advances it by the frame delta
/// and reads `progress` to transform the target rectangle.
#[derive(Debug, Clone)]
pub struct Effect {
    kind: EffectKind,
    elapsed: Duration,
    duration: Duration,
}

impl Effect {
    #[must_use]
    pub fn pop_scale(duration: Duration) -> Self {
        Self::new(EffectKind::PopScale, duration)
    }

    #[must_use]
    pub fn shake(duration: Duration) -> Self {
        Self::new(EffectKind::Shake, duration)
    }

    fn new(kind: EffectKind, duration: Duration) -> Self {
        Self {
            kind,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    #[must_use]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
