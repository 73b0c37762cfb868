//! Pulse shapes.
//!
//! A shape turns a point count into an amplitude array sampled on the unit
//! interval. Shapes are named by a descriptor string, `<name>` optionally
//! followed by up to two numeric parameters separated by underscores:
//!
//! | Descriptor | Shape | Parameters (defaults) |
//! |------------|-------|-----------------------|
//! | `square` | constant 1 | - |
//! | `gauss`, `gaussian` | Gaussian bump | center (0.5), sigma (1/6) |
//! | `ramp` | linear ramp | percent (40) |
//! | `tan`, `adiabatic` | hyperbolic-sine ramp | percent (50), curvature (0.1) |
//! | `fid` | free induction decay | frequency (10), decay (5) |
//! | `fid2` | free induction decay with jitter | frequency (10), decay (5) |
//! | `grad` | gradient | rise (8) |
//! | `sine`, `grad2` | single sine lobe | - |
//!
//! A negative ramp percent reverses the ramp. Unknown names are reported
//! and drawn as squares.

mod generators;

pub use generators::{linspace, normalize};

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::error::{PulseplotError, Result};

/// Fixed seed of the `fid2` jitter; the same descriptor always draws the same.
const JITTER_SEED: u64 = 0x5eed_f1d2;

/// Resolve a shape descriptor into `npoints` amplitude samples.
pub fn resolve(descriptor: &str, npoints: usize) -> Result<Vec<f64>> {
    Ok(Shape::parse(descriptor)?.samples(npoints))
}

/// The known shape families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    /// Constant amplitude, also the fallback for unknown names
    #[default]
    Square,
    /// Gaussian bump renormalized to [0, 1]
    Gaussian,
    /// Linear ramp ending at 1
    Ramp,
    /// Adiabatic (tangential) ramp
    Tangent,
    /// Free induction decay
    Fid,
    /// Free induction decay with uniform jitter
    FidJitter,
    /// Super-Gaussian gradient lobe
    Gradient,
    /// One half-period of a sine
    Sine,
}

impl ShapeKind {
    /// Parse a shape family from its descriptor name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "square" => Some(Self::Square),
            "gauss" | "gaussian" => Some(Self::Gaussian),
            "ramp" => Some(Self::Ramp),
            "tan" | "adiabatic" => Some(Self::Tangent),
            "fid" => Some(Self::Fid),
            "fid2" => Some(Self::FidJitter),
            "grad" => Some(Self::Gradient),
            "sine" | "grad2" => Some(Self::Sine),
            _ => None,
        }
    }

    /// Canonical descriptor name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Gaussian => "gauss",
            Self::Ramp => "ramp",
            Self::Tangent => "tan",
            Self::Fid => "fid",
            Self::FidJitter => "fid2",
            Self::Gradient => "grad",
            Self::Sine => "sine",
        }
    }
}

/// A parsed shape descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    descriptor: String,
    kind: ShapeKind,
    params: [Option<f64>; 2],
}

impl Shape {
    /// Parse a descriptor such as `gauss`, `ramp_-50` or `tan_50_0.2`.
    ///
    /// Segments past the second parameter are ignored. A parameter that is
    /// not a number is an error; an unknown name falls back to a square.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let mut parts = descriptor.split('_');
        let name = parts.next().unwrap_or_default();

        let mut params = [None; 2];
        for slot in params.iter_mut() {
            match parts.next() {
                Some(text) => {
                    let value = text.trim().parse::<f64>().map_err(|_| PulseplotError::InvalidShape {
                        descriptor: descriptor.to_string(),
                    })?;
                    *slot = Some(value);
                }
                None => break,
            }
        }

        let kind = ShapeKind::from_name(name).unwrap_or_else(|| {
            warn!(shape = %name, "Did not understand the shape, changing to a square shape");
            ShapeKind::Square
        });

        Ok(Self {
            descriptor: descriptor.to_string(),
            kind,
            params,
        })
    }

    /// The plain square shape.
    pub fn square() -> Self {
        Self {
            descriptor: "square".to_string(),
            kind: ShapeKind::Square,
            params: [None; 2],
        }
    }

    /// The descriptor this shape was parsed from.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// The resolved shape family.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The numeric descriptor parameters.
    pub fn params(&self) -> [Option<f64>; 2] {
        self.params
    }

    /// Decay-type shapes are drawn open and without a baseline return.
    pub fn is_decay(&self) -> bool {
        self.descriptor.starts_with("fid")
    }

    /// Sample the shape at `npoints` evenly spaced points of [0, 1].
    pub fn samples(&self, npoints: usize) -> Vec<f64> {
        let [p1, p2] = self.params;
        match self.kind {
            ShapeKind::Square => generators::square(npoints),
            ShapeKind::Gaussian => generators::gaussian(npoints, p1, p2),
            ShapeKind::Ramp => generators::ramp(npoints, p1),
            ShapeKind::Tangent => generators::tangent(npoints, p1, p2),
            ShapeKind::Fid => generators::fid(npoints, p1, p2),
            ShapeKind::FidJitter => {
                let mut rng = StdRng::seed_from_u64(JITTER_SEED ^ npoints as u64);
                generators::fid_jitter(npoints, p1, p2, &mut rng)
            }
            ShapeKind::Gradient => generators::gradient(npoints, p1),
            ShapeKind::Sine => generators::sine(npoints),
        }
    }
}

/// A caller-supplied amplitude function over the unit interval.
#[derive(Clone)]
pub struct ShapeFn(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl ShapeFn {
    /// Wrap a function.
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluate at one point.
    pub fn eval(&self, x: f64) -> f64 {
        (self.0)(x)
    }
}

impl fmt::Debug for ShapeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShapeFn(..)")
    }
}

impl PartialEq for ShapeFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// The shape carried by a pulse.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSpec {
    /// A descriptor resolved through the shape table
    Named(Shape),
    /// A function supplied through the external parameter table
    Custom(ShapeFn),
}

impl ShapeSpec {
    /// Amplitude samples over the unit interval.
    pub fn samples(&self, npoints: usize) -> Vec<f64> {
        match self {
            Self::Named(shape) => shape.samples(npoints),
            Self::Custom(f) => linspace(0.0, 1.0, npoints).into_iter().map(|x| f.eval(x)).collect(),
        }
    }

    /// The descriptor string for named shapes.
    pub fn descriptor(&self) -> Option<&str> {
        match self {
            Self::Named(shape) => Some(shape.descriptor()),
            Self::Custom(_) => None,
        }
    }

    /// Whether this is a decay-type named shape.
    pub fn is_decay(&self) -> bool {
        matches!(self, Self::Named(shape) if shape.is_decay())
    }
}

impl Serialize for ShapeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.descriptor().unwrap_or("custom"))
    }
}
