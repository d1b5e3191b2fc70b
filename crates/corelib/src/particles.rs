//! CPU particle integrator. Produces per-frame position/progress buffers
//! ready to be uploaded as instance data.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CoreError, CoreResult};
use crate::{Vec3, Vec4};

/// Emitter configuration. Noise terms are uniform in `[-noise, noise)`.
#[derive(Clone, Debug)]
pub struct ParticlesConfig {
    pub count: usize,
    pub seed: u64,
    /// Spread the initial particles over their lifetime instead of starting them all at once.
    pub scatter_on_init: bool,
    pub scatter_on_spawn: bool,
    pub respawn: bool,
    pub origin: Vec3,
    /// Edges of the spawn volume around `origin`.
    pub emitter_a: Vec3,
    pub emitter_b: Vec3,
    pub emitter_c: Vec3,
    pub base_direction: Vec3,
    pub noise_direction: Vec3,
    pub base_velocity: f32,
    pub noise_velocity: f32,
    pub base_lifetime: f32,
    pub noise_lifetime: f32,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: rand::random(),
            scatter_on_init: true,
            scatter_on_spawn: false,
            respawn: true,
            origin: Vec3::ZERO,
            emitter_a: Vec3::ZERO,
            emitter_b: Vec3::ZERO,
            emitter_c: Vec3::ZERO,
            base_direction: Vec3::Y,
            noise_direction: Vec3::splat(0.2),
            base_velocity: 1.5,
            noise_velocity: 0.2,
            base_lifetime: 3.0,
            noise_lifetime: 0.4,
        }
    }
}

impl ParticlesConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let min = self.base_lifetime - self.noise_lifetime.abs();
        if min > 0.0 {
            Ok(())
        } else {
            Err(CoreError::InvalidLifetime {
                base: self.base_lifetime,
                noise: self.noise_lifetime,
                min,
            })
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Particle {
    pos: Vec3,
    velocity: Vec3,
    lifetime: f32,
    total_life_inv: f32,
    progress: f32,
}

impl Particle {
    fn advance(&mut self, dt: f32) {
        self.pos += self.velocity * dt;
        self.lifetime -= dt;
    }

    fn update_progress(&mut self) {
        self.progress = 1.0 - self.total_life_inv * self.lifetime;
    }
}

pub struct Particles {
    cfg: ParticlesConfig,
    rng: StdRng,
    parts: Vec<Particle>,
    positions: Vec<Vec4>,
    progress: Vec<f32>,
}

impl Particles {
    pub fn new(cfg: ParticlesConfig) -> CoreResult<Self> {
        cfg.validate()?;
        let rng = StdRng::seed_from_u64(cfg.seed);
        let mut particles = Self {
            cfg,
            rng,
            parts: Vec::new(),
            positions: Vec::new(),
            progress: Vec::new(),
        };
        particles.reset()?;
        Ok(particles)
    }

    /// Respawns `count` particles from scratch. Rejects a config tuned into an invalid state.
    pub fn reset(&mut self) -> CoreResult<()> {
        self.cfg.validate()?;
        log::debug!("particles reset: count={}, seed={}", self.cfg.count, self.cfg.seed);
        self.parts.clear();
        self.parts.reserve(self.cfg.count);
        for _ in 0..self.cfg.count {
            let p = self.spawn();
            self.parts.push(p);
        }

        if self.cfg.scatter_on_init {
            for i in 0..self.parts.len() {
                let f = self.rnd_unit();
                let p = &mut self.parts[i];
                p.advance(f * p.lifetime);
            }
        }
        Ok(())
    }

    pub fn tick(&mut self, dt: f32) {
        self.positions.clear();
        self.progress.clear();

        for i in 0..self.parts.len() {
            let mut p = self.parts[i];
            p.lifetime -= dt;
            p.update_progress();
            if p.lifetime <= 0.0 {
                if !self.cfg.respawn {
                    self.parts[i] = p;
                    continue;
                }
                p = self.spawn();
            } else {
                p.pos += p.velocity * dt;
            }
            self.positions.push(p.pos.extend(0.0));
            self.progress.push(p.progress);
            self.parts[i] = p;
        }
    }

    fn spawn(&mut self) -> Particle {
        let cfg = &self.cfg;
        let (a, b, c) = (cfg.emitter_a, cfg.emitter_b, cfg.emitter_c);
        let pos = cfg.origin
            + a * rnd1(&mut self.rng)
            + b * rnd1(&mut self.rng)
            + c * rnd1(&mut self.rng);
        // NOTE: a noise vector cancelling base_direction normalizes to NaN.
        let noise = Vec3::new(rnd1(&mut self.rng), rnd1(&mut self.rng), rnd1(&mut self.rng));
        let speed = cfg.base_velocity + rnd1(&mut self.rng) * cfg.noise_velocity;
        let velocity = (cfg.base_direction + noise * cfg.noise_direction).normalize() * speed;
        let lifetime = cfg.base_lifetime + rnd1(&mut self.rng) * cfg.noise_lifetime;

        let mut p = Particle {
            pos,
            velocity,
            lifetime,
            total_life_inv: 1.0 / lifetime,
            progress: 0.0,
        };

        if self.cfg.scatter_on_spawn {
            let f = self.rnd_unit();
            p.advance(f * p.lifetime);
            p.update_progress();
        }
        p
    }

    /// Uniform in `[0, 1)`.
    fn rnd_unit(&mut self) -> f32 {
        rnd1(&mut self.rng) * 0.5 + 0.5
    }

    /// Instance positions of live particles (w = 0), rebuilt by [`Particles::tick`].
    #[inline]
    pub fn positions(&self) -> &[Vec4] {
        &self.positions
    }

    /// Normalized age per live particle, parallel to [`Particles::positions`].
    #[inline]
    pub fn progress(&self) -> &[f32] {
        &self.progress
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn config(&self) -> &ParticlesConfig {
        &self.cfg
    }

    /// Runtime tuning. `count` and `seed` only apply after [`Particles::reset`].
    #[inline]
    pub fn config_mut(&mut self) -> &mut ParticlesConfig {
        &mut self.cfg
    }
}

fn rnd1(rng: &mut StdRng) -> f32 {
    rng.random_range(-1.0..1.0)
}
