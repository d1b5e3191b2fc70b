//! Headless driver: orbits a camera around a particle fountain and logs
//! what a renderer would receive each frame.

use std::f32::consts::TAU;

use anyhow::{Context, Result};
use corelib::{
    Axis, Camera, Ease, FlowType, ModelUniform, Motion, Particles, ParticlesConfig, Projection,
    Transform, Vec3,
};

struct Options {
    frames: u32,
    dt: f32,
    particles: usize,
    seed: Option<u64>,
    projection: Projection,
}

/// Reads `--name=value`; unparsable values are reported and ignored.
fn parse_arg<T: std::str::FromStr>(name: &str) -> Option<T> {
    let prefix = format!("--{name}=");
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix(&prefix) {
            match val.parse::<T>() {
                Ok(v) => return Some(v),
                Err(_) => log::warn!("Ignoring invalid --{}='{}'", name, val),
            }
        }
    }
    None
}

fn parse_projection_arg() -> Projection {
    // Accept: --projection=perspective|orthographic
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--projection=") {
            return match val.to_ascii_lowercase().as_str() {
                "perspective" | "persp" => Projection::Perspective,
                "orthographic" | "ortho" => Projection::Orthographic,
                other => {
                    log::warn!("Unknown projection '{}', falling back to perspective.", other);
                    Projection::Perspective
                }
            };
        }
    }
    Projection::Perspective
}

fn parse_options() -> Options {
    let dt = match parse_arg::<f32>("dt") {
        Some(dt) if dt.is_finite() && dt > 0.0 => dt,
        Some(dt) => {
            log::warn!("--dt must be finite and > 0, got {}; using 1/60.", dt);
            1.0 / 60.0
        }
        None => 1.0 / 60.0,
    };
    Options {
        frames: parse_arg("frames").unwrap_or(240),
        dt,
        particles: parse_arg("particles").unwrap_or(100),
        seed: parse_arg("seed"),
        projection: parse_projection_arg(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_options();
    log::info!(
        "Starting posekit demo. frames={}, dt={:.4}, particles={}, projection={:?}",
        opts.frames,
        opts.dt,
        opts.particles,
        opts.projection
    );

    // Orbit angle: half a turn out, ease back.
    let mut orbit = Motion::new(FlowType::PingPong);
    orbit
        .add_ramp(2.0, 0.0, TAU * 0.5, Ease::Smooth)
        .context("orbit ramp")?
        .add_idle(0.5, TAU * 0.5)
        .context("orbit idle")?;

    let mut camera = Camera::new();
    match opts.projection {
        Projection::Perspective => camera.set_perspective(60.0, 16.0 / 9.0, 0.1, 100.0),
        Projection::Orthographic => camera.set_orthographic(8.0, 16.0 / 9.0, 0.1, 100.0),
    }

    let mut cfg = ParticlesConfig {
        count: opts.particles,
        emitter_a: Vec3::new(0.5, 0.0, 0.0),
        emitter_c: Vec3::new(0.0, 0.0, 0.5),
        ..Default::default()
    };
    if let Some(seed) = opts.seed {
        cfg.seed = seed;
    }
    log::info!("Particle seed: {}", cfg.seed);
    let mut particles = Particles::new(cfg).context("particle config")?;

    // Emitter marker, tilted toward the camera start position.
    let mut emitter = Transform::identity();
    emitter.point_to(Vec3::ZERO, Vec3::new(0.0, 2.0, 6.0), Vec3::Y);
    emitter.set_scale_local_uniform(0.25);

    for frame in 0..opts.frames {
        orbit.tick(f64::from(opts.dt));
        let angle = orbit.value();
        let eye = Vec3::new(6.0 * angle.sin(), 2.0, 6.0 * angle.cos());
        camera.look_at(eye, Vec3::new(0.0, 1.5, 0.0), Vec3::Y);

        emitter.rotate_local(opts.dt, Axis::Z);
        particles.tick(opts.dt);

        let ray = camera.cast_ray(0.5, 0.5);
        let camera_ubo = camera.uniform();
        let model_ubo = ModelUniform::from_transform(&mut emitter);

        log::trace!(
            "frame {}: {} + {} bytes uploaded",
            frame,
            camera_ubo.as_bytes().len(),
            model_ubo.as_bytes().len()
        );

        if frame % 60 == 0 {
            log::info!(
                "frame {:>4}: angle={:.3} eye=({:.2},{:.2},{:.2}) ray_dir=({:.3},{:.3},{:.3}) live={}",
                frame,
                angle,
                eye.x,
                eye.y,
                eye.z,
                ray.direction.x,
                ray.direction.y,
                ray.direction.z,
                particles.len()
            );
        }
    }

    let centroid = particles
        .positions()
        .iter()
        .fold(Vec3::ZERO, |acc, p| acc + p.truncate())
        / particles.len().max(1) as f32;
    log::info!(
        "Done. live={}, centroid=({:.2},{:.2},{:.2})",
        particles.len(),
        centroid.x,
        centroid.y,
        centroid.z
    );
    Ok(())
}
