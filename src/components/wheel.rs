use crate::components::geometry::{
    LABEL_RADIUS, Point, WHEEL_CENTER, WHEEL_RADIUS, WHEEL_SIZE, polar_to_cartesian, wheel_slices,
};
use sheet_feed::ParticipantList;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::symbols::Marker;
use tui::text::Span;
use tui::widgets::Widget;
use tui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};

/// Angular step between the radial strokes that fill a slice.
const FILL_STEP: f64 = 1.5;
/// Past this many slices the spokes and labels would smear into each other.
const MAX_SPOKES: usize = 60;
const MAX_LABELS: usize = 40;

/// The wheel, rotated clockwise by `rotation` degrees.
pub struct WheelWidget<'a> {
    pub participants: &'a ParticipantList,
    pub rotation: f64,
}

impl Widget for WheelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.participants.is_empty() || area.width < 4 || area.height < 2 {
            return;
        }

        let slices = wheel_slices(self.participants);
        let count = slices.len();
        let rotation = self.rotation;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, WHEEL_SIZE])
            .y_bounds([0.0, WHEEL_SIZE])
            .paint(|ctx| {
                for slice in &slices {
                    let (r, g, b) = slice.color.to_rgb();
                    let color = Color::Rgb(r, g, b);
                    let mut angle = slice.start_angle;
                    while angle < slice.end_angle {
                        stroke(ctx, rotation + angle, 0.0, WHEEL_RADIUS, color);
                        angle += FILL_STEP;
                    }
                    stroke(ctx, rotation + slice.end_angle - 0.01, 0.0, WHEEL_RADIUS, color);
                }

                ctx.layer();
                if count > 1 && count <= MAX_SPOKES {
                    for slice in &slices {
                        stroke(ctx, rotation + slice.start_angle, 0.0, WHEEL_RADIUS, Color::White);
                    }
                }
                ctx.draw(&Circle {
                    x: WHEEL_CENTER.x,
                    y: WHEEL_CENTER.y,
                    radius: WHEEL_RADIUS,
                    color: Color::White,
                });

                if count <= MAX_LABELS {
                    ctx.layer();
                    for slice in &slices {
                        let p = polar_to_cartesian(
                            WHEEL_CENTER,
                            rotation + slice.mid_angle,
                            LABEL_RADIUS,
                        );
                        let p = flip(p);
                        let half = slice.label.chars().count() as f64 * 2.5;
                        ctx.print(
                            p.x - half,
                            p.y,
                            Span::styled(
                                slice.label.clone(),
                                Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
                            ),
                        );
                    }
                }
            })
            .render(area, buf);
    }
}

/// Canvas y grows upwards; the geometry helpers work in screen space.
fn flip(p: Point) -> Point {
    Point { x: p.x, y: WHEEL_SIZE - p.y }
}

fn stroke(ctx: &mut Context, angle: f64, from_r: f64, to_r: f64, color: Color) {
    let a = flip(polar_to_cartesian(WHEEL_CENTER, angle, from_r));
    let b = flip(polar_to_cartesian(WHEEL_CENTER, angle, to_r));
    ctx.draw(&CanvasLine::new(a.x, a.y, b.x, b.y, color));
}

/// Largest area with a roughly circular aspect (terminal cells are about
/// twice as tall as they are wide), centered in `area`.
pub fn wheel_area(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = (height * 2).min(area.width);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
