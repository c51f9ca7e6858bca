use crate::algorithms::select::{BranchParams, Composition};
use crate::connectivity::MatchStrategy;
use crate::geometry::limits;
use crate::model::{EndpointRef, LineDecl, Vec2};
use crate::sampling::Sampler;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("too many {what}: {got} exceeds {max}")]
    TooLarge { what: &'static str, max: usize, got: usize },
    #[error("parameter '{param}' must be finite")]
    NonFinite { param: String },
    #[error("parameter '{param}' out of range [{min}, {max}]: {got}")]
    OutOfRange { param: String, min: f32, max: f32, got: f32 },
    #[error("range '{param}' has min {min} above max {max}")]
    InvertedRange { param: String, min: f32, max: f32 },
}

impl ConfigError {
    /// Stable machine-readable code, shared with the wasm result envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Parse(_) => "parse",
            ConfigError::TooLarge { .. } => "too_large",
            ConfigError::NonFinite { .. } => "non_finite",
            ConfigError::OutOfRange { .. } => "out_of_range",
            ConfigError::InvertedRange { .. } => "inverted_range",
        }
    }
}

/// Numeric range; accepts either a bare number or `{min, max}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RangeDe")]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeDe {
    Fixed(f32),
    Span { min: f32, max: f32 },
}

impl From<RangeDe> for Range {
    fn from(r: RangeDe) -> Self {
        match r {
            RangeDe::Fixed(v) => Range { min: v, max: v },
            RangeDe::Span { min, max } => Range { min, max },
        }
    }
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Range { min, max }
    }
    pub fn draw<S: Sampler>(&self, sampler: &mut S) -> f32 {
        sampler.range(self.min, self.max)
    }
    /// Integer draw in [round(min), round(max)], negatives treated as zero.
    pub fn draw_count<S: Sampler>(&self, sampler: &mut S) -> u32 {
        let lo = self.min.max(0.0).round() as u32;
        let hi = self.max.max(0.0).round() as u32;
        sampler.int_inclusive(lo, hi)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Straight,
    Curved,
    #[default]
    Both,
}

/// Named polygon kinds. Unknown names fall back to a triangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubShape {
    #[default]
    Triangle,
    Square,
    Pentagon,
    Hexagon,
    Circle,
}

impl SubShape {
    pub fn sides(self) -> u32 {
        match self {
            SubShape::Triangle => 3,
            SubShape::Square => 4,
            SubShape::Pentagon => 5,
            SubShape::Hexagon => 6,
            SubShape::Circle => 12,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            SubShape::Triangle => "Triangle",
            SubShape::Square => "Square",
            SubShape::Pentagon => "Pentagon",
            SubShape::Hexagon => "Hexagon",
            SubShape::Circle => "Circle",
        }
    }
}

impl From<String> for SubShape {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Square" => SubShape::Square,
            "Pentagon" => SubShape::Pentagon,
            "Hexagon" => SubShape::Hexagon,
            "Circle" => SubShape::Circle,
            _ => SubShape::Triangle,
        }
    }
}

impl From<SubShape> for String {
    fn from(s: SubShape) -> Self {
        s.name().to_string()
    }
}

/// `"atEnd"` anchors polygons on path endpoints; anything else places them
/// along the path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Connection {
    AtEnd,
    #[default]
    Along,
}

impl From<String> for Connection {
    fn from(s: String) -> Self {
        if s == "atEnd" { Connection::AtEnd } else { Connection::Along }
    }
}

impl From<Connection> for String {
    fn from(c: Connection) -> Self {
        match c {
            Connection::AtEnd => "atEnd".to_string(),
            Connection::Along => "along".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RotationType {
    /// Follow the path tangent at the anchor.
    Absolute,
    /// Draw from the configured angle range.
    #[default]
    Relative,
}

impl From<String> for RotationType {
    fn from(s: String) -> Self {
        if s == "absolute" { RotationType::Absolute } else { RotationType::Relative }
    }
}

impl From<RotationType> for String {
    fn from(r: RotationType) -> Self {
        match r {
            RotationType::Absolute => "absolute".to_string(),
            RotationType::Relative => "relative".to_string(),
        }
    }
}

fn default_shape_name() -> String { "shape".to_string() }
fn default_angle() -> Range { Range::new(0.0, 360.0) }
fn default_amount() -> Range { Range::new(1.0, 1.0) }
fn default_size() -> Range { Range::new(20.0, 20.0) }
fn default_distort() -> Range { Range::new(0.0, 0.0) }
fn default_line_count() -> Range { Range::new(1.0, 1.0) }
fn default_line_width() -> Range { Range::new(2.0, 15.0) }
fn default_branch() -> f32 { BranchParams::default().branch }
fn default_fallback() -> f32 { BranchParams::default().fallback }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeConfig {
    #[serde(default = "default_shape_name")]
    pub name: String,
    #[serde(default)]
    pub sub_shape: SubShape,
    /// Explicit side count; overrides `sub_shape` and is clamped to
    /// [MIN_POLYGON_SIDES, MAX_POLYGON_SIDES].
    #[serde(default)]
    pub sides: Option<u32>,
    #[serde(default)]
    pub connection: Connection,
    #[serde(default)]
    pub rotation_type: RotationType,
    /// Degrees.
    #[serde(default = "default_angle")]
    pub angle: Range,
    #[serde(default = "default_amount")]
    pub amount: Range,
    #[serde(default = "default_size")]
    pub size: Range,
    #[serde(default = "default_distort")]
    pub distort: Range,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        ShapeConfig {
            name: default_shape_name(),
            sub_shape: SubShape::default(),
            sides: None,
            connection: Connection::default(),
            rotation_type: RotationType::default(),
            angle: default_angle(),
            amount: default_amount(),
            size: default_size(),
            distort: default_distort(),
        }
    }
}

impl ShapeConfig {
    pub fn side_count(&self) -> u32 {
        limits::clamp_sides(self.sides.unwrap_or_else(|| self.sub_shape.sides()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub points: Vec<Vec2>,
    #[serde(default)]
    pub lines: Vec<LineDecl>,
    #[serde(default)]
    pub line_composition: Composition,
    #[serde(default)]
    pub line_type: LineType,
    #[serde(default = "default_line_count")]
    pub number_of_lines: Range,
    #[serde(default = "default_line_width")]
    pub line_width: Range,
    #[serde(default)]
    pub miss_area: f32,
    #[serde(default)]
    pub matching: MatchStrategy,
    #[serde(default = "default_branch")]
    pub branch_probability: f32,
    #[serde(default = "default_fallback")]
    pub fallback_branch_probability: f32,
    #[serde(default)]
    pub shapes: Vec<ShapeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            points: Vec::new(),
            lines: Vec::new(),
            line_composition: Composition::default(),
            line_type: LineType::default(),
            number_of_lines: default_line_count(),
            line_width: default_line_width(),
            miss_area: 0.0,
            matching: MatchStrategy::default(),
            branch_probability: default_branch(),
            fallback_branch_probability: default_fallback(),
            shapes: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Config, ConfigError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_value(v: Value) -> Result<Config, ConfigError> {
        let cfg: Config = serde_json::from_value(v)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn branch_params(&self) -> BranchParams {
        BranchParams { branch: self.branch_probability, fallback: self.fallback_branch_probability }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Caps: sizes
        cap("points", self.points.len(), limits::MAX_POINTS)?;
        cap("lines", self.lines.len(), limits::MAX_LINES)?;
        cap("shapes", self.shapes.len(), limits::MAX_SHAPES)?;
        for p in &self.points {
            coord("points.x", p.x)?;
            coord("points.y", p.y)?;
        }
        for l in &self.lines {
            for r in [&l.start, &l.end] {
                if let EndpointRef::Coord { x, y } = *r {
                    coord("lines.x", x)?;
                    coord("lines.y", y)?;
                }
            }
        }
        range("numberOfLines", &self.number_of_lines, 0.0, limits::MAX_LINES as f32)?;
        range("lineWidth", &self.line_width, 0.0, limits::WIDTH_MAX)?;
        if !limits::in_width_bounds(self.line_width.min) {
            return Err(ConfigError::OutOfRange {
                param: "lineWidth.min".to_string(),
                min: 0.0,
                max: limits::WIDTH_MAX,
                got: self.line_width.min,
            });
        }
        bounded("missArea", self.miss_area, 0.0, limits::MISS_AREA_MAX)?;
        bounded("branchProbability", self.branch_probability, 0.0, 1.0)?;
        bounded("fallbackBranchProbability", self.fallback_branch_probability, 0.0, 1.0)?;
        for s in &self.shapes {
            let field = |f: &str| format!("shapes.{}.{}", s.name, f);
            range(&field("angle"), &s.angle, -limits::ANGLE_MAX_DEG, limits::ANGLE_MAX_DEG)?;
            range(&field("amount"), &s.amount, 0.0, limits::MAX_POLYGONS_PER_SHAPE as f32)?;
            range(&field("size"), &s.size, 0.0, limits::COORD_MAX)?;
            range(&field("distort"), &s.distort, limits::COORD_MIN, limits::COORD_MAX)?;
        }
        Ok(())
    }
}

fn cap(what: &'static str, got: usize, max: usize) -> Result<(), ConfigError> {
    if got > max {
        return Err(ConfigError::TooLarge { what, max, got });
    }
    Ok(())
}

fn coord(param: &str, v: f32) -> Result<(), ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NonFinite { param: param.to_string() });
    }
    if !limits::in_coord_bounds(v) {
        return Err(ConfigError::OutOfRange {
            param: param.to_string(),
            min: limits::COORD_MIN,
            max: limits::COORD_MAX,
            got: v,
        });
    }
    Ok(())
}

fn bounded(param: &str, v: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NonFinite { param: param.to_string() });
    }
    if v < min || v > max {
        return Err(ConfigError::OutOfRange { param: param.to_string(), min, max, got: v });
    }
    Ok(())
}

fn range(param: &str, r: &Range, min: f32, max: f32) -> Result<(), ConfigError> {
    bounded(&format!("{}.min", param), r.min, min, max)?;
    bounded(&format!("{}.max", param), r.max, min, max)?;
    if r.min > r.max {
        return Err(ConfigError::InvertedRange { param: param.to_string(), min: r.min, max: r.max });
    }
    Ok(())
}
