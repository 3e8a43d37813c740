//! Per-geometry descriptors and their WKB/WKT type encodings.

use std::fmt::{self, Display};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WkError};

/// Type-code bit flagging Z values in EWKB.
pub const EWKB_Z_BIT: u32 = 0x80000000;
/// Type-code bit flagging M values in EWKB.
pub const EWKB_M_BIT: u32 = 0x40000000;
/// Type-code bit flagging an embedded SRID in EWKB.
pub const EWKB_SRID_BIT: u32 = 0x20000000;

/// The seven simple-feature geometry kinds, numbered as in WKB.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[repr(u32)]
pub enum GeometryType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryType {
    /// The upper-case WKT keyword.
    pub fn wkt_name(&self) -> &'static str {
        use GeometryType::*;
        match self {
            Point => "POINT",
            LineString => "LINESTRING",
            Polygon => "POLYGON",
            MultiPoint => "MULTIPOINT",
            MultiLineString => "MULTILINESTRING",
            MultiPolygon => "MULTIPOLYGON",
            GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Inverse of [`GeometryType::wkt_name`]; keywords are case-sensitive.
    pub fn from_wkt_name(name: &str) -> Option<Self> {
        use GeometryType::*;
        match name {
            "POINT" => Some(Point),
            "LINESTRING" => Some(LineString),
            "POLYGON" => Some(Polygon),
            "MULTIPOINT" => Some(MultiPoint),
            "MULTILINESTRING" => Some(MultiLineString),
            "MULTIPOLYGON" => Some(MultiPolygon),
            "GEOMETRYCOLLECTION" => Some(GeometryCollection),
            _ => None,
        }
    }

    /// Multi* geometries whose parts are written without their own keyword.
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint | GeometryType::MultiLineString | GeometryType::MultiPolygon
        )
    }

    /// Any geometry that holds child geometries rather than coordinates or rings.
    pub fn is_collection(&self) -> bool {
        self.is_multi() || *self == GeometryType::GeometryCollection
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wkt_name())
    }
}

/// A decoded WKB geometry type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EwkbType {
    pub geometry_type: GeometryType,
    pub has_z: bool,
    pub has_m: bool,
    pub has_srid: bool,
}

impl EwkbType {
    /// Decodes both EWKB high-bit flags and the ISO 1000/2000/3000 offsets.
    pub fn decode(code: u32) -> Result<Self> {
        let simple = code & 0x0000ffff;
        let (base, iso_z, iso_m) = if simple >= 3000 {
            (simple - 3000, true, true)
        } else if simple >= 2000 {
            (simple - 2000, false, true)
        } else if simple >= 1000 {
            (simple - 1000, true, false)
        } else {
            (simple, false, false)
        };

        let geometry_type = GeometryType::try_from_primitive(base)
            .map_err(|_| WkError::WkbParse(format!("Unrecognized geometry type code: {code}")))?;

        Ok(Self {
            geometry_type,
            has_z: code & EWKB_Z_BIT != 0 || iso_z,
            has_m: code & EWKB_M_BIT != 0 || iso_m,
            has_srid: code & EWKB_SRID_BIT != 0,
        })
    }

    /// Encodes with EWKB bit flags only.
    pub fn encode(&self) -> u32 {
        let mut code: u32 = self.geometry_type.into();
        if self.has_z {
            code |= EWKB_Z_BIT;
        }
        if self.has_m {
            code |= EWKB_M_BIT;
        }
        if self.has_srid {
            code |= EWKB_SRID_BIT;
        }
        code
    }
}

/// Describes one geometry node as it passes through a handler.
///
/// `size` counts coordinates for points and linestrings, rings for polygons and parts for
/// collections. `None` means it isn't known yet, which is the common case for WKT until the
/// closing parenthesis has been read.
///
/// `handle` identifies the node within a feature. Readers mint a new one for each
/// `geometry_start` and repeat it on every event belonging to that node, so a handler can key
/// per-geometry state on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeometryMeta {
    pub geometry_type: GeometryType,
    pub has_z: bool,
    pub has_m: bool,
    pub srid: Option<u32>,
    pub size: Option<u32>,
    pub handle: u32,
}

impl GeometryMeta {
    pub fn new(geometry_type: GeometryType) -> Self {
        Self {
            geometry_type,
            has_z: false,
            has_m: false,
            srid: None,
            size: None,
            handle: 0,
        }
    }

    pub fn with_dims(mut self, has_z: bool, has_m: bool) -> Self {
        self.has_z = has_z;
        self.has_m = has_m;
        self
    }

    pub fn with_srid(mut self, srid: u32) -> Self {
        self.srid = Some(srid);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_handle(mut self, handle: u32) -> Self {
        self.handle = handle;
        self
    }

    pub fn has_srid(&self) -> bool {
        self.srid.is_some()
    }

    pub fn has_size(&self) -> bool {
        self.size.is_some()
    }

    /// True when the size is known to be zero.
    pub fn is_empty(&self) -> bool {
        self.size == Some(0)
    }

    /// A meta for a part of this geometry: same dimensions, never an SRID.
    pub fn child(&self, geometry_type: GeometryType) -> Self {
        Self::new(geometry_type).with_dims(self.has_z, self.has_m)
    }

    /// The EWKB type code for this geometry.
    pub fn ewkb_type(&self) -> u32 {
        EwkbType {
            geometry_type: self.geometry_type,
            has_z: self.has_z,
            has_m: self.has_m,
            has_srid: self.has_srid(),
        }
        .encode()
    }

    /// The WKT type keyword including its dimension suffix, e.g. `POINT ZM`.
    pub fn wkt_type(&self) -> String {
        let mut out = self.geometry_type.wkt_name().to_string();
        match (self.has_z, self.has_m) {
            (true, true) => out.push_str(" ZM"),
            (true, false) => out.push_str(" Z"),
            (false, true) => out.push_str(" M"),
            (false, false) => (),
        }
        out
    }
}

impl From<EwkbType> for GeometryMeta {
    fn from(value: EwkbType) -> Self {
        Self::new(value.geometry_type).with_dims(value.has_z, value.has_m)
    }
}

impl Display for GeometryMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wkt_type())?;
        if let Some(srid) = self.srid {
            write!(f, " SRID={srid}")?;
        }
        match self.size {
            Some(size) => write!(f, " [{size}]"),
            None => f.write_str(" [unknown]"),
        }
    }
}
