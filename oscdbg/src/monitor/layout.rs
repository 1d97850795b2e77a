//! Layout
//!
//! Splits the viewport into a one row header and a bordered packet list
//! below it. While paused, the right half becomes a bordered inspector pane.
//! The list's inner height is the history capacity.

use std::ops::Range;

const HEADER_ROWS: u16 = 1;
const BORDER: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// The area left inside a one cell border.
    pub fn inner(&self) -> Rect {
        Rect {
            x: self.x.saturating_add(BORDER),
            y: self.y.saturating_add(BORDER),
            width: self.width.saturating_sub(2 * BORDER),
            height: self.height.saturating_sub(2 * BORDER),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub viewport: Viewport,
    pub header: Rect,
    pub list: Rect,
    pub inspector: Option<Rect>,
}

impl Layout {
    pub fn compute(viewport: Viewport, paused: bool) -> Layout {
        let header = Rect {
            x: 0,
            y: 0,
            width: viewport.width,
            height: viewport.height.min(HEADER_ROWS),
        };
        let body_height = viewport.height.saturating_sub(HEADER_ROWS);
        let (list_width, inspector) = if paused {
            let list_width = viewport.width / 2;
            let inspector = Rect {
                x: list_width,
                y: HEADER_ROWS,
                width: viewport.width - list_width,
                height: body_height,
            };
            (list_width, Some(inspector))
        } else {
            (viewport.width, None)
        };
        Layout {
            viewport,
            header,
            list: Rect {
                x: 0,
                y: HEADER_ROWS,
                width: list_width,
                height: body_height,
            },
            inspector,
        }
    }

    /// Number of packets the list pane can show at once.
    pub fn capacity(&self) -> usize {
        usize::from(self.list.inner().height)
    }

    /// Indices of a `len` long history that fit in the list pane. Without a
    /// cursor this is the tail; with one, the tail shifted up just enough to
    /// keep the cursor in view.
    pub fn visible(&self, len: usize, cursor: Option<usize>) -> Range<usize> {
        let rows = self.capacity();
        if len <= rows {
            return 0..len;
        }
        let mut start = len - rows;
        if let Some(cursor) = cursor {
            start = start.min(cursor);
        }
        start..start + rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 81,
        height: 24,
    };

    #[test]
    fn running_list_spans_the_width() {
        let layout = Layout::compute(VIEWPORT, false);
        assert_eq!(layout.header, Rect { x: 0, y: 0, width: 81, height: 1 });
        assert_eq!(layout.list, Rect { x: 0, y: 1, width: 81, height: 23 });
        assert!(layout.inspector.is_none());
        assert_eq!(layout.capacity(), 21);
    }

    #[test]
    fn paused_splits_list_and_inspector() {
        let layout = Layout::compute(VIEWPORT, true);
        assert_eq!(layout.list, Rect { x: 0, y: 1, width: 40, height: 23 });
        assert_eq!(layout.inspector, Some(Rect { x: 40, y: 1, width: 41, height: 23 }));
        assert_eq!(layout.capacity(), 21);
    }

    #[test]
    fn tiny_viewport_has_no_capacity() {
        let layout = Layout::compute(Viewport { width: 10, height: 2 }, false);
        assert_eq!(layout.capacity(), 0);
        let layout = Layout::compute(Viewport { width: 0, height: 0 }, true);
        assert_eq!(layout.capacity(), 0);
        assert_eq!(layout.header.height, 0);
    }

    #[test]
    fn visible_window_tracks_tail_and_cursor() {
        // capacity 3
        let layout = Layout::compute(Viewport { width: 20, height: 6 }, true);
        assert_eq!(layout.visible(2, Some(1)), 0..2);
        assert_eq!(layout.visible(10, None), 7..10);
        assert_eq!(layout.visible(10, Some(8)), 7..10);
        assert_eq!(layout.visible(10, Some(2)), 2..5);
        assert_eq!(layout.visible(10, Some(0)), 0..3);
    }
}
