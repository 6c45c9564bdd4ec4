use tui::layout::{Constraint, Layout, Rect, Size};

pub const HEADER_HEIGHT: u16 = 4;
pub const LOG_PANE_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: Rect,
    pub pointer: Rect,
    pub wheel: Rect,
    pub control: Rect,
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let header_height = if full_screen { 0 } else { HEADER_HEIGHT };
        let logs_height = if show_logs { LOG_PANE_HEIGHT } else { 0 };

        let [header, pointer, wheel, control, logs] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(logs_height),
        ])
        .areas(area);

        LayoutAreas { header, pointer, wheel, control, logs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_drops_header() {
        let mut layout = LayoutAreas::new(Size::new(80, 40));
        assert_eq!(layout.header.height, HEADER_HEIGHT);
        assert_eq!(layout.logs.height, 0);

        layout.update(Rect::new(0, 0, 80, 40), true, true);
        assert_eq!(layout.header.height, 0);
        assert_eq!(layout.pointer.y, 0);
        assert_eq!(layout.logs.height, LOG_PANE_HEIGHT);
        assert_eq!(layout.wheel.height, 40 - 1 - 1 - LOG_PANE_HEIGHT);
    }
}
