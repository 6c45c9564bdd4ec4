use rand::Rng;
use std::time::{Duration, Instant};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Color;
use tui::widgets::Widget;

pub const CONFETTI_COUNT: usize = 150;
/// Every particle is removed this long after launch, fallen or not.
pub const CONFETTI_LIFETIME: Duration = Duration::from_millis(4000);
pub const CONFETTI_COLORS: [Color; 6] = [
    Color::Rgb(255, 255, 0),
    Color::Rgb(0, 255, 255),
    Color::Rgb(255, 0, 255),
    Color::Rgb(0, 255, 0),
    Color::Rgb(255, 0, 0),
    Color::Rgb(0, 0, 255),
];
const GLYPHS: [&str; 3] = ["▪", "▴", "•"];

#[derive(Debug, Clone)]
pub struct Particle {
    /// Horizontal position as a fraction of the screen width.
    pub left: f64,
    pub color: Color,
    /// Time to fall from the top edge to the bottom edge (2–4 s).
    pub fall: Duration,
    pub launched: Instant,
    glyph: &'static str,
}

impl Particle {
    /// Fraction of the fall completed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.launched).as_secs_f64();
        (elapsed / self.fall.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Decorative burst shown when a winner is revealed. Nothing reads it back.
#[derive(Debug, Default)]
pub struct Confetti {
    particles: Vec<Particle>,
}

impl Confetti {
    pub fn launch<R: Rng>(&mut self, rng: &mut R, now: Instant) {
        self.particles.extend((0..CONFETTI_COUNT).map(|_| Particle {
            left: rng.random_range(0.0..1.0),
            color: CONFETTI_COLORS[rng.random_range(0..CONFETTI_COLORS.len())],
            fall: Duration::from_secs_f64(2.0 + rng.random_range(0.0..2.0)),
            launched: now,
            glyph: GLYPHS[rng.random_range(0..GLYPHS.len())],
        }));
    }

    pub fn prune(&mut self, now: Instant) {
        self.particles
            .retain(|p| now.saturating_duration_since(p.launched) < CONFETTI_LIFETIME);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

pub struct ConfettiLayer<'a> {
    pub confetti: &'a Confetti,
    pub now: Instant,
}

impl Widget for ConfettiLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        for particle in &self.confetti.particles {
            let progress = particle.progress(self.now);
            if progress >= 1.0 {
                continue;
            }
            let x = area.x + (particle.left * f64::from(area.width - 1)).round() as u16;
            let y = area.y + (progress * f64::from(area.height - 1)).round() as u16;
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(particle.glyph).set_fg(particle.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn launch_adds_a_full_burst() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut confetti = Confetti::default();
        confetti.launch(&mut rng, Instant::now());
        assert_eq!(confetti.len(), CONFETTI_COUNT);
        for p in &confetti.particles {
            assert!((0.0..1.0).contains(&p.left));
            assert!(p.fall >= Duration::from_secs(2) && p.fall < Duration::from_secs(4));
            assert!(CONFETTI_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn particles_are_removed_after_lifetime() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut confetti = Confetti::default();
        let start = Instant::now();
        confetti.launch(&mut rng, start);

        confetti.prune(start + Duration::from_millis(3999));
        assert_eq!(confetti.len(), CONFETTI_COUNT);

        confetti.prune(start + CONFETTI_LIFETIME);
        assert!(confetti.is_empty());
    }

    #[test]
    fn layer_paints_inside_area() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut confetti = Confetti::default();
        let start = Instant::now();
        confetti.launch(&mut rng, start);

        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        ConfettiLayer { confetti: &confetti, now: start + Duration::from_millis(500) }
            .render(area, &mut buf);

        let painted = buf.content().iter().filter(|c| c.symbol() != " ").count();
        assert!(painted > 0);
    }
}
