use serde::Serialize;
use sheet_feed::ParticipantList;

/// Logical canvas the wheel is laid out on.
pub const WHEEL_SIZE: f64 = 400.0;
pub const WHEEL_RADIUS: f64 = 180.0;
pub const WHEEL_CENTER: Point = Point { x: WHEEL_SIZE / 2.0, y: WHEEL_SIZE / 2.0 };
/// Labels sit at three quarters of the radius.
pub const LABEL_RADIUS: f64 = WHEEL_RADIUS * 0.75;

/// Above this many participants labels are masked to their last 4 characters.
pub const CROWDED_WHEEL: usize = 10;
const MASK_KEEP: usize = 4;

/// `cubic-bezier(0.15, 0.85, 0.1, 1)`: fast start, long deceleration, no overshoot.
pub const SPIN_EASING: CubicBezier = CubicBezier::new(0.15, 0.85, 0.1, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Angles are in degrees, clockwise from 12 o'clock. Output is in screen
/// coordinates (y grows downwards).
pub fn polar_to_cartesian(center: Point, angle: f64, r: f64) -> Point {
    let rad = (angle - 90.0).to_radians();
    Point {
        x: center.x + r * rad.cos(),
        y: center.y + r * rad.sin(),
    }
}

/// Pie-slice outline from the center out to a single arc between the two
/// boundary angles. Only valid for spans under 180°, i.e. two or more slices.
pub fn slice_arc_path(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let start = polar_to_cartesian(center, end_angle, radius);
    let end = polar_to_cartesian(center, start_angle, radius);
    format!(
        "M {} {} L {} {} A {r} {r} 0 0 0 {} {} Z",
        coord(center.x),
        coord(center.y),
        coord(start.x),
        coord(start.y),
        coord(end.x),
        coord(end.y),
        r = coord(radius),
    )
}

fn coord(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub fn slice_angle(count: usize) -> f64 {
    360.0 / count.max(1) as f64
}

/// Font size for slice labels; smaller wheels get bigger text.
pub fn label_font_size(count: usize) -> u8 {
    match count {
        0..=10 => 14,
        11..=30 => 11,
        31..=50 => 9,
        51..=80 => 7,
        _ => 8,
    }
}

/// On crowded wheels long labels are masked down to their last 4 characters.
pub fn format_label(value: &str, count: usize) -> String {
    let len = value.chars().count();
    if count > CROWDED_WHEEL && len > MASK_KEEP {
        let tail: String = value.chars().skip(len - MASK_KEEP).collect();
        format!("****{tail}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn to_css(self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            coord(self.hue),
            coord(self.saturation * 100.0),
            coord(self.lightness * 100.0)
        )
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        let c = (1.0 - (2.0 * self.lightness - 1.0).abs()) * self.saturation;
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u8 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.lightness - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }
}

/// Hues are spread evenly around the color wheel.
pub fn slice_color(index: usize, count: usize) -> Hsl {
    Hsl {
        hue: index as f64 / count.max(1) as f64 * 360.0,
        saturation: 0.7,
        lightness: 0.6,
    }
}

/// CSS `cubic-bezier()` timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased progress for linear time progress `t` in `[0, 1]`.
    pub fn ease(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_curve_x(t);
        Self::sample(self.y1, self.y2, s)
    }

    fn sample(p1: f64, p2: f64, s: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        ((a * s + b) * s + c) * s
    }

    fn sample_derivative(p1: f64, p2: f64, s: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (3.0 * a * s + 2.0 * b) * s + c
    }

    fn solve_curve_x(&self, x: f64) -> f64 {
        const EPSILON: f64 = 1e-7;

        let mut s = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, s) - x;
            if err.abs() < EPSILON {
                return s;
            }
            let d = Self::sample_derivative(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        // Newton stalled; bisect.
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while lo < hi {
            let v = Self::sample(self.x1, self.x2, s);
            if (v - x).abs() < EPSILON {
                break;
            }
            if x > v {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
            if hi - lo < EPSILON {
                break;
            }
        }
        s
    }
}

/// Derived geometry for one wedge of the wheel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelSlice {
    pub index: usize,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub mid_angle: f64,
    #[serde(skip)]
    pub color: Hsl,
    pub fill: String,
    pub label_position: Point,
    /// Labels are rotated to read outwards along the slice.
    pub label_rotation: f64,
    pub font_size: u8,
    pub path: String,
}

pub fn wheel_slices(participants: &ParticipantList) -> Vec<WheelSlice> {
    let count = participants.len();
    let angle = slice_angle(count);
    participants
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let start_angle = index as f64 * angle;
            let end_angle = start_angle + angle;
            let mid_angle = start_angle + angle / 2.0;
            let color = slice_color(index, count);
            WheelSlice {
                index,
                label: format_label(value, count),
                start_angle,
                end_angle,
                mid_angle,
                color,
                fill: color.to_css(),
                label_position: polar_to_cartesian(WHEEL_CENTER, mid_angle, LABEL_RADIUS),
                label_rotation: mid_angle + 90.0,
                font_size: label_font_size(count),
                path: slice_arc_path(WHEEL_CENTER, WHEEL_RADIUS, start_angle, end_angle),
            }
        })
        .collect()
}
