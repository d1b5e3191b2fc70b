//! Scalar motion curves: a timeline of idle and ramp segments played once,
//! repeated, or ping-ponged.

use std::f32::consts::FRAC_PI_2;

use crate::error::{CoreError, CoreResult};

/// What happens when playback reaches either end of the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowType {
    Once,
    Repeat,
    PingPong,
}

/// Time remapping applied inside a ramp segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    #[default]
    None,
    Square,
    SquareDown,
    Cube,
    CubeDown,
    Sine,
    SineDown,
    Smooth,
    Smooth2,
}

impl Ease {
    /// Maps local time `t` in `[0, dt]` onto `[0, dt]`.
    pub fn apply(self, t: f32, dt: f32) -> f32 {
        let u = t / dt;
        match self {
            Ease::None => t,
            Ease::Square => t * t / dt,
            Ease::SquareDown => (2.0 * u - u * u) * dt,
            Ease::Cube => t * t * t / (dt * dt),
            Ease::CubeDown => {
                let r = 1.0 - u;
                (1.0 - r * r * r) * dt
            }
            Ease::Sine => (u * FRAC_PI_2).sin() * dt,
            Ease::SineDown => (1.0 - ((1.0 - u) * FRAC_PI_2).sin()) * dt,
            Ease::Smooth => smoothstep(u) * dt,
            Ease::Smooth2 => smoothstep(smoothstep(u)) * dt,
        }
    }
}

fn smoothstep(u: f32) -> f32 {
    3.0 * u * u - 2.0 * u * u * u
}

#[derive(Clone, Copy, Debug)]
enum Segment {
    Idle { dt: f32, value: f32 },
    Ramp { dt: f32, from: f32, to: f32, ease: Ease },
}

impl Segment {
    fn dt(&self) -> f32 {
        match *self {
            Segment::Idle { dt, .. } | Segment::Ramp { dt, .. } => dt,
        }
    }

    fn eval(&self, t: f32) -> f32 {
        match *self {
            Segment::Idle { value, .. } => value,
            Segment::Ramp { dt, from, to, ease } => from + (to - from) * (ease.apply(t, dt) / dt),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Motion {
    segments: Vec<Segment>,
    flow: FlowType,
    t: f64,
    direction: f64,
    duration: f64,
    value: f32,
    finished: bool,
    paused: bool,
}

impl Motion {
    pub fn new(flow: FlowType) -> Self {
        Self {
            segments: Vec::new(),
            flow,
            t: 0.0,
            direction: 1.0,
            duration: 0.0,
            value: 0.0,
            finished: false,
            paused: false,
        }
    }

    /// Appends a constant segment.
    pub fn add_idle(&mut self, dt: f32, value: f32) -> CoreResult<&mut Self> {
        self.push(Segment::Idle {
            dt: check_dt(dt)?,
            value,
        });
        Ok(self)
    }

    /// Appends a segment going from `from` to `to` over `dt`.
    pub fn add_ramp(&mut self, dt: f32, from: f32, to: f32, ease: Ease) -> CoreResult<&mut Self> {
        self.push(Segment::Ramp {
            dt: check_dt(dt)?,
            from,
            to,
            ease,
        });
        Ok(self)
    }

    fn push(&mut self, segment: Segment) {
        self.duration += f64::from(segment.dt());
        self.segments.push(segment);
    }

    pub fn tick(&mut self, dt: f64) {
        if self.paused || self.finished {
            return;
        }

        self.t += self.direction * dt;

        if self.t >= self.duration {
            match self.flow {
                FlowType::Once => {
                    self.t = self.duration;
                    self.finish();
                }
                FlowType::Repeat => self.t -= self.duration,
                FlowType::PingPong => {
                    self.t = self.duration - (self.t - self.duration);
                    self.direction = -1.0;
                }
            }
        }

        if self.t < 0.0 {
            match self.flow {
                FlowType::Once => {
                    self.t = 0.0;
                    self.finish();
                }
                // moving backwards: restart from the end
                FlowType::Repeat => self.t += self.duration,
                FlowType::PingPong => {
                    self.t = -self.t;
                    self.direction = 1.0;
                }
            }
        }

        let Some((segment, local)) = self.active_segment() else {
            return;
        };
        self.value = segment.eval(local);
    }

    /// Segment containing the current time and the time local to it.
    fn active_segment(&self) -> Option<(Segment, f32)> {
        let last = self.segments.len().checked_sub(1)?;
        let mut start = 0.0f64;
        for (i, seg) in self.segments.iter().enumerate() {
            let end = start + f64::from(seg.dt());
            if self.t < end || i == last {
                return Some((*seg, (self.t - start) as f32));
            }
            start = end;
        }
        None
    }

    fn finish(&mut self) {
        self.finished = true;
        log::debug!("motion finished after {:.3}s", self.duration);
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn pause(&mut self, pause: bool) {
        self.paused = pause;
    }

    pub fn restart(&mut self) {
        self.t = 0.0;
        self.paused = false;
        self.finished = false;
        self.direction = 1.0;
    }

    pub fn set_direction(&mut self, forward: bool) {
        self.direction = if forward { 1.0 } else { -1.0 };
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `true` while playing forward.
    #[inline]
    pub fn direction(&self) -> bool {
        self.direction > 0.0
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

fn check_dt(dt: f32) -> CoreResult<f32> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(CoreError::InvalidDuration(dt))
    }
}
