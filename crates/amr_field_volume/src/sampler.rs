//! Sampling strategies and the configuration-time facade over them.
//!
//! A strategy turns a physical position into a scalar value, a value plus the local cell width,
//! or a gradient. Positions outside the world bounds (or inside a root-tiling gap) always yield
//! the zero scalar or zero vector; "no data here" is a defined result, not an error.

use crate::accel::AmrAccel;
use crate::error::ConfigurationError;
use crate::field::Brick;

use amr_field_core::prelude::*;

/// The closed set of sampling strategies, chosen once at configuration time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SamplingMethod {
    /// Interpolate within the finest candidate at or below a configured traversal level.
    /// Cheapest query; visible resolution seams at brick boundaries.
    CurrentLevel,
    /// Interpolate within the globally finest candidate at the point. Always uses the best
    /// available resolution, at the cost of inspecting every candidate.
    FinestLevel,
    /// A selectable placeholder whose every invocation fails loudly.
    Octant,
}

impl SamplingMethod {
    /// Parses an externally resolved method name. Accepts `"finest"`/`"finestLevel"`,
    /// `"current"`/`"currentLevel"`, and `"octant"`, case-sensitively.
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        match name {
            "finest" | "finestLevel" => Ok(SamplingMethod::FinestLevel),
            "current" | "currentLevel" => Ok(SamplingMethod::CurrentLevel),
            "octant" => Ok(SamplingMethod::Octant),
            _ => Err(ConfigurationError(name.to_owned())),
        }
    }
}

impl Default for SamplingMethod {
    fn default() -> Self {
        SamplingMethod::CurrentLevel
    }
}

/// Samples within the finest candidate brick that belongs to the configured traversal level or a
/// coarser one. With no configured level, the finest candidate wins outright.
#[derive(Clone, Copy)]
pub struct CurrentLevelSampler<'a> {
    accel: &'a AmrAccel<'a>,
    current_level: Option<i32>,
}

impl<'a> CurrentLevelSampler<'a> {
    pub fn new(accel: &'a AmrAccel<'a>) -> Self {
        Self {
            accel,
            current_level: None,
        }
    }

    pub fn at_level(accel: &'a AmrAccel<'a>, level: i32) -> Self {
        Self {
            accel,
            current_level: Some(level),
        }
    }

    fn select_brick(&self, p: Point3f) -> Option<&Brick<'a>> {
        let candidates = self.accel.find_candidates(p);
        let bricks = self.accel.field().bricks();

        match self.current_level {
            // Candidates are ordered coarsest to finest, so the last one is the finest present.
            None => candidates.last().map(|&id| &bricks[id]),
            Some(level) => candidates
                .iter()
                .rev()
                .find(|&&id| bricks[id].level() <= level)
                // Every candidate is finer than the traversal level; fall back to the coarsest.
                .or_else(|| candidates.first())
                .map(|&id| &bricks[id]),
        }
    }

    pub fn sample(&self, p: Point3f) -> f32 {
        self.select_brick(p)
            .map_or(0.0, |b| b.sample_trilinear(p))
    }

    pub fn sample_with_width(&self, p: Point3f) -> (f32, f32) {
        self.select_brick(p)
            .map_or((0.0, 0.0), |b| (b.sample_trilinear(p), b.cell_width()))
    }

    pub fn gradient(&self, p: Point3f) -> Point3f {
        match self.select_brick(p) {
            None => Point3f::ZERO,
            Some(b) => central_difference(|q| self.sample(q), p, 0.5 * b.cell_width()),
        }
    }
}

/// Samples within the candidate brick with the globally smallest cell width at the point.
#[derive(Clone, Copy)]
pub struct FinestLevelSampler<'a> {
    accel: &'a AmrAccel<'a>,
}

impl<'a> FinestLevelSampler<'a> {
    pub fn new(accel: &'a AmrAccel<'a>) -> Self {
        Self { accel }
    }

    fn select_brick(&self, p: Point3f) -> Option<&Brick<'a>> {
        self.accel.finest_brick_at(p).map(|(_, b)| b)
    }

    pub fn sample(&self, p: Point3f) -> f32 {
        self.select_brick(p)
            .map_or(0.0, |b| b.sample_trilinear(p))
    }

    pub fn sample_with_width(&self, p: Point3f) -> (f32, f32) {
        self.select_brick(p)
            .map_or((0.0, 0.0), |b| (b.sample_trilinear(p), b.cell_width()))
    }

    pub fn gradient(&self, p: Point3f) -> Point3f {
        match self.select_brick(p) {
            None => Point3f::ZERO,
            Some(b) => central_difference(|q| self.sample(q), p, 0.5 * b.cell_width()),
        }
    }
}

/// Central finite differences with step `h`, sampling through `f` on both sides of `p` along
/// each axis.
fn central_difference(f: impl Fn(Point3f) -> f32, p: Point3f, h: f32) -> Point3f {
    let mut gradient = Point3f::ZERO;
    for &axis in Axis3::ALL.iter() {
        let mut hi = p;
        let mut lo = p;
        *hi.at_mut(axis.index()) += h;
        *lo.at_mut(axis.index()) -= h;

        *gradient.at_mut(axis.index()) = (f(hi) - f(lo)) / (2.0 * h);
    }

    gradient
}

enum Strategy<'a> {
    Current(CurrentLevelSampler<'a>),
    Finest(FinestLevelSampler<'a>),
    Octant,
}

/// The single non-generic entry point handed to the rendering pipeline. Wraps the strategy chosen
/// at configuration time and forwards each query to it unchanged.
pub struct VolumeSampler<'a> {
    strategy: Strategy<'a>,
    method: SamplingMethod,
}

impl<'a> VolumeSampler<'a> {
    pub fn new(accel: &'a AmrAccel<'a>, method: SamplingMethod) -> Self {
        let strategy = match method {
            SamplingMethod::CurrentLevel => Strategy::Current(CurrentLevelSampler::new(accel)),
            SamplingMethod::FinestLevel => Strategy::Finest(FinestLevelSampler::new(accel)),
            SamplingMethod::Octant => Strategy::Octant,
        };

        Self { strategy, method }
    }

    /// Resolves a configuration into a sampler: an optional method name (default: `"current"`)
    /// and an optional traversal level for the current-level strategy. Unknown names fail here,
    /// before any sampling occurs.
    pub fn from_config(
        accel: &'a AmrAccel<'a>,
        method_name: Option<&str>,
        current_level: Option<i32>,
    ) -> Result<Self, ConfigurationError> {
        let method = match method_name {
            None => SamplingMethod::default(),
            Some(name) => SamplingMethod::from_name(name)?,
        };

        let mut sampler = Self::new(accel, method);
        if let (Strategy::Current(current), Some(level)) = (&mut sampler.strategy, current_level) {
            *current = CurrentLevelSampler::at_level(accel, level);
        }

        Ok(sampler)
    }

    #[inline]
    pub fn method(&self) -> SamplingMethod {
        self.method
    }

    /// The scalar field value at `p`, or 0 where there is no data.
    pub fn sample(&self, p: Point3f) -> f32 {
        match &self.strategy {
            Strategy::Current(s) => s.sample(p),
            Strategy::Finest(s) => s.sample(p),
            Strategy::Octant => unimplemented!("octant sampling method"),
        }
    }

    /// The scalar field value at `p` together with the cell width of the brick it came from, or
    /// `(0, 0)` where there is no data.
    pub fn sample_with_width(&self, p: Point3f) -> (f32, f32) {
        match &self.strategy {
            Strategy::Current(s) => s.sample_with_width(p),
            Strategy::Finest(s) => s.sample_with_width(p),
            Strategy::Octant => unimplemented!("octant sampling method"),
        }
    }

    /// The gradient of the field at `p`, or the zero vector where there is no data.
    pub fn gradient(&self, p: Point3f) -> Point3f {
        match &self.strategy {
            Strategy::Current(s) => s.gradient(p),
            Strategy::Finest(s) => s.gradient(p),
            Strategy::Octant => unimplemented!("octant sampling method"),
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
