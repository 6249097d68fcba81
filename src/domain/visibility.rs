//! Viewport intersection checks for lazily loaded lists.

/// Rows currently visible in a scrolled list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(offset: usize, height: usize) -> Self {
        Self { offset, height }
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.offset && row < self.offset.saturating_add(self.height)
    }
}

/// Fires a callback when a target row enters the viewport, optionally
/// `margin` rows early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityTrigger {
    margin: usize,
}

impl VisibilityTrigger {
    pub fn with_margin(margin: usize) -> Self {
        Self { margin }
    }

    pub fn is_visible(&self, viewport: Viewport, row: usize) -> bool {
        if viewport.height == 0 {
            return false;
        }

        let lower = viewport.offset.saturating_sub(self.margin);
        let upper = viewport
            .offset
            .saturating_add(viewport.height)
            .saturating_add(self.margin);
        lower <= row && row < upper
    }

    /// Runs `on_visible` when `row` is visible and returns its result.
    pub fn observe<R>(
        &self,
        viewport: Viewport,
        row: usize,
        on_visible: impl FnOnce() -> R,
    ) -> Option<R> {
        self.is_visible(viewport, row).then(on_visible)
    }
}
