use std::{f64::consts::PI, time::Duration};

const GRAVITY: f64 = 0.35;
const GRAVITY_SCALE: f64 = 0.18;
const DRAG: f64 = 0.99;
const SPIN: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiConfig {
    pub particle_count: usize,
    pub duration: Duration,
    pub colors: Vec<&'static str>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            particle_count: 80,
            duration: Duration::from_millis(1400),
            colors: vec!["#8b5cf6", "#6366f1", "#f472b6", "#60a5fa", "#f59e0b"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub color: &'static str,
    pub tilt: f64,
    pub angle: f64,
}

impl Particle {
    fn step(&mut self) {
        self.vy += GRAVITY * GRAVITY_SCALE;
        self.x += self.vx;
        self.y += self.vy;
        self.angle += self.tilt * SPIN;
        self.vx *= DRAG;
    }
}

/// One burst of confetti. `rng` yields uniform values in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct ConfettiBurst {
    particles: Vec<Particle>,
    duration: Duration,
    elapsed: Duration,
    width: f64,
    height: f64,
}

impl ConfettiBurst {
    pub fn new(
        config: &ConfettiConfig,
        width: f64,
        height: f64,
        rng: &mut impl FnMut() -> f64,
    ) -> Self {
        let mut range = |min: f64, max: f64| rng() * (max - min) + min;
        let particles = (0..config.particle_count)
            .map(|_| {
                let color = if config.colors.is_empty() {
                    "#ffffff"
                } else {
                    let i = range(0.0, config.colors.len() as f64) as usize;
                    config.colors[i.min(config.colors.len() - 1)]
                };
                Particle {
                    x: width / 2.0 + range(-200.0, 200.0),
                    y: height / 2.0 + range(-40.0, 40.0),
                    vx: range(-8.0, 8.0),
                    vy: range(-12.0, -4.0),
                    size: range(6.0, 14.0),
                    color,
                    tilt: range(-0.2, 0.2),
                    angle: range(0.0, PI * 2.0),
                }
            })
            .collect();
        Self {
            particles,
            duration: config.duration,
            elapsed: Duration::ZERO,
            width,
            height,
        }
    }

    pub fn step(&mut self) {
        self.particles.iter_mut().for_each(Particle::step);
    }

    /// Moves one frame forward. Returns false once the burst has run its course.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        self.step();
        self.is_running(self.elapsed)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn is_running(&self, elapsed: Duration) -> bool {
        elapsed < self.duration
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(v: f64) -> impl FnMut() -> f64 {
        move || v
    }

    #[test]
    fn test_spawn_ranges() {
        let config = ConfettiConfig::default();
        let burst = ConfettiBurst::new(&config, 1000.0, 800.0, &mut constant(0.0));
        assert_eq!(burst.particles().len(), 80);
        let p = &burst.particles()[0];
        assert_eq!((p.x, p.y), (300.0, 360.0));
        assert_eq!((p.vx, p.vy), (-8.0, -12.0));
        assert_eq!(p.size, 6.0);
        assert_eq!(p.color, "#8b5cf6");

        // just below 1.0 picks the last colour, never out of bounds
        let burst = ConfettiBurst::new(&config, 1000.0, 800.0, &mut constant(0.999_999));
        assert_eq!(burst.particles()[0].color, "#f59e0b");
    }

    #[test]
    fn test_step_applies_gravity_and_drag() {
        let config = ConfettiConfig {
            particle_count: 1,
            ..Default::default()
        };
        let mut burst = ConfettiBurst::new(&config, 0.0, 0.0, &mut constant(0.5));
        let before = burst.particles()[0].clone();
        assert_eq!(before.vx, 0.0);
        assert_eq!(before.vy, -8.0);
        burst.step();
        let after = &burst.particles()[0];
        let vy = -8.0 + 0.35 * 0.18;
        assert!((after.vy - vy).abs() < 1e-12);
        assert!((after.y - (before.y + vy)).abs() < 1e-12);
        assert_eq!(after.x, before.x);
    }

    #[test]
    fn test_lifetime() {
        let burst = ConfettiBurst::new(&ConfettiConfig::default(), 10.0, 10.0, &mut constant(0.3));
        assert!(burst.is_running(Duration::from_millis(1399)));
        assert!(!burst.is_running(Duration::from_millis(1400)));
    }

    #[test]
    fn test_advance_accumulates_frames() {
        let mut burst = ConfettiBurst::new(&ConfettiConfig::default(), 10.0, 10.0, &mut constant(0.3));
        let frame = Duration::from_millis(16);
        let frames = std::iter::repeat_with(|| burst.advance(frame))
            .take_while(|running| *running)
            .count();
        // 87 * 16 = 1392ms, the 88th frame reaches 1408ms
        assert_eq!(frames, 87);
    }

    #[test]
    fn test_no_colours_falls_back() {
        let config = ConfettiConfig {
            particle_count: 2,
            colors: vec![],
            ..Default::default()
        };
        let burst = ConfettiBurst::new(&config, 10.0, 10.0, &mut constant(0.3));
        assert!(burst.particles().iter().all(|p| p.color == "#ffffff"));
    }
}
