use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geometry::viewport::Viewport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point { x: self.x + dx, y: self.y + dy }
    }

    pub fn dist_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Reflection of `self` through `center`.
    pub fn mirror_through(self, center: Point) -> Point {
        Point {
            x: center.x - (self.x - center.x),
            y: center.y - (self.y - center.y),
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Joint type of an anchor. Persisted as `"square"` / `"round"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotKind {
    #[serde(rename = "square")]
    Corner,
    #[serde(rename = "round")]
    Round,
}

impl DotKind {
    pub fn toggled(self) -> DotKind {
        match self {
            DotKind::Corner => DotKind::Round,
            DotKind::Round => DotKind::Corner,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Space {
    #[default]
    User,
    Surface,
}

/// Which of a dot's two handles. `In` is `h1` (towards the previous dot),
/// `Out` is `h2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    In,
    Out,
}

impl HandleSide {
    pub fn opposite(self) -> HandleSide {
        match self {
            HandleSide::In => HandleSide::Out,
            HandleSide::Out => HandleSide::In,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: DotKind,
    pub h1: Point,
    pub h2: Point,
    #[serde(skip)]
    pub space: Space,
}

impl Dot {
    /// A user-space dot with both handles placed on the dot itself.
    pub fn new(x: f64, y: f64, kind: DotKind) -> Self {
        let p = Point::new(x, y);
        Dot { x, y, kind, h1: p, h2: p, space: Space::User }
    }

    pub fn with_handles(mut self, h1: Point, h2: Point) -> Self {
        self.h1 = h1;
        self.h2 = h2;
        self
    }

    /// Corner dot with horizontal handles `span` units either side.
    pub fn corner_with_span(x: f64, y: f64, span: f64) -> Self {
        Dot::new(x, y, DotKind::Corner)
            .with_handles(Point::new(x - span, y), Point::new(x + span, y))
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn handle(&self, side: HandleSide) -> Point {
        match side {
            HandleSide::In => self.h1,
            HandleSide::Out => self.h2,
        }
    }

    pub fn handle_mut(&mut self, side: HandleSide) -> &mut Point {
        match side {
            HandleSide::In => &mut self.h1,
            HandleSide::Out => &mut self.h2,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos().is_finite() && self.h1.is_finite() && self.h2.is_finite()
    }

    /// Surface-space copy. Panics in debug builds if already in surface space.
    pub fn to_surface(&self, vp: &Viewport) -> Dot {
        debug_assert_eq!(self.space, Space::User, "dot is already in surface space");
        let p = vp.to_surface(self.pos());
        Dot {
            x: p.x,
            y: p.y,
            kind: self.kind,
            h1: vp.to_surface(self.h1),
            h2: vp.to_surface(self.h2),
            space: Space::Surface,
        }
    }

    pub fn to_user(&self, vp: &Viewport) -> Dot {
        debug_assert_eq!(self.space, Space::Surface, "dot is already in user space");
        let p = vp.to_user(self.pos());
        Dot {
            x: p.x,
            y: p.y,
            kind: self.kind,
            h1: vp.to_user(self.h1),
            h2: vp.to_user(self.h2),
            space: Space::User,
        }
    }
}

/// Partial update applied to the selected dot by `Editor::update_selected_dot`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<DotKind>,
    pub h1: Option<Point>,
    pub h2: Option<Point>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Units {
    Px,
    Percent,
    Deg,
    Rad,
    Turn,
    Em,
    Rem,
    Vw,
    Vh,
    #[default]
    None,
}

impl Units {
    pub const ALL: [Units; 10] = [
        Units::Px,
        Units::Percent,
        Units::Deg,
        Units::Rad,
        Units::Turn,
        Units::Em,
        Units::Rem,
        Units::Vw,
        Units::Vh,
        Units::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Units::Px => "px",
            Units::Percent => "%",
            Units::Deg => "deg",
            Units::Rad => "rad",
            Units::Turn => "turn",
            Units::Em => "em",
            Units::Rem => "rem",
            Units::Vw => "vw",
            Units::Vh => "vh",
            Units::None => "",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownUnits(pub String);

impl fmt::Display for UnknownUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown units '{}'", self.0)
    }
}

impl std::error::Error for UnknownUnits {}

impl FromStr for Units {
    type Err = UnknownUnits;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::ALL
            .iter()
            .copied()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| UnknownUnits(s.to_string()))
    }
}

impl Serialize for Units {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Units {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
