use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Highlight {
    Upcoming,
    Current,
    Completed,
}

pub(crate) fn classify(index: usize, current: usize, completed: &BTreeSet<usize>) -> Highlight {
    if index == current {
        Highlight::Current
    } else if index < current || completed.contains(&index) {
        Highlight::Completed
    } else {
        Highlight::Upcoming
    }
}

/// Rows occupied by one transcript item, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ItemSpan {
    pub(crate) top: u16,
    pub(crate) height: u16,
}

impl ItemSpan {
    pub(crate) fn bottom(self) -> u16 {
        self.top.saturating_add(self.height)
    }

    fn center(self) -> u16 {
        self.top.saturating_add(self.height / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) height: u16,
    /// Rows hidden behind the bottom navigation bar.
    pub(crate) reserved_bottom: u16,
}

impl Viewport {
    pub(crate) fn visible_height(self) -> u16 {
        self.height.saturating_sub(self.reserved_bottom)
    }
}

/// Keeps the current transcript item centred until the final chapter is
/// current and fully on screen; from then on auto-scrolling stays off until
/// `reset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ScrollSync {
    offset: u16,
    latched: bool,
}

impl ScrollSync {
    pub(crate) fn offset(&self) -> u16 {
        self.offset
    }

    pub(crate) fn reset(&mut self) {
        self.offset = 0;
        self.latched = false;
    }

    /// Returns the new offset when a scroll is issued.
    pub(crate) fn follow(
        &mut self,
        spans: &[ItemSpan],
        current: usize,
        viewport: Viewport,
    ) -> Option<u16> {
        if self.latched {
            return None;
        }
        let last = *spans.last()?;
        let target_span = *spans.get(current)?;
        let visible = viewport.visible_height();
        if visible == 0 {
            return None;
        }
        let on_last = current + 1 == spans.len();
        if on_last && self.fully_visible(last, visible) {
            self.latched = true;
            return None;
        }

        let tolerance = (visible / 4).max(1);
        let view_center = self.offset.saturating_add(visible / 2);
        if target_span.center().abs_diff(view_center) <= tolerance {
            return None;
        }

        let max_offset = last.bottom().saturating_sub(visible);
        let target = target_span
            .center()
            .saturating_sub(visible / 2)
            .min(max_offset);
        if target == self.offset {
            return None;
        }
        self.offset = target;
        if on_last && self.fully_visible(last, visible) {
            self.latched = true;
        }
        Some(target)
    }

    /// Manual scrolling; never clears the latch.
    pub(crate) fn scroll_by(&mut self, delta: i32, spans: &[ItemSpan], viewport: Viewport) {
        let content_height = spans.last().map(|span| span.bottom()).unwrap_or(0);
        let max_offset = content_height.saturating_sub(viewport.visible_height());
        let next = (i32::from(self.offset) + delta).clamp(0, i32::from(max_offset));
        self.offset = next as u16;
    }

    fn fully_visible(&self, span: ItemSpan, visible: u16) -> bool {
        span.top >= self.offset && span.bottom() <= self.offset.saturating_add(visible)
    }
}

#[cfg(test)]
impl ScrollSync {
    pub(crate) fn is_latched(&self) -> bool {
        self.latched
    }
}
