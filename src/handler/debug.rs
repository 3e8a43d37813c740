use std::fmt;
use std::io::Write;

use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::{GeometryHandler, PART_ID_NONE};
use crate::meta::GeometryMeta;

/// Writes one indented line per event, for inspecting what a reader emits.
///
/// Parse errors are printed and swallowed so a whole collection can be traced.
pub struct DebugHandler<W> {
    out: W,
    level: usize,
}

impl<W: Write> DebugHandler<W> {
    pub fn new(out: W) -> Self {
        Self { out, level: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        write!(self.out, "{:indent$}", "", indent = self.level * 2)?;
        self.out.write_fmt(args)?;
        writeln!(self.out)?;
        Ok(())
    }
}

struct PartId(u32);

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == PART_ID_NONE {
            f.write_str("PART_ID_NONE")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

struct Size(Option<u32>);

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(size) => write!(f, "{size}"),
            None => f.write_str("unknown"),
        }
    }
}

struct DebugCoord<'a>(&'a Coord);

impl fmt::Display for DebugCoord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "Coord(x = {}, y = {}", c.x, c.y)?;
        if c.has_z {
            write!(f, ", z = {}", c.z)?;
        }
        if c.has_m {
            write!(f, ", m = {}", c.m)?;
        }
        f.write_str(")")
    }
}

impl<W: Write> GeometryHandler for DebugHandler<W> {
    fn initialize(&mut self) -> Result<()> {
        self.line(format_args!("initialize()"))
    }

    fn feature_start(&mut self, feature_id: usize) -> Result<()> {
        self.line(format_args!("feature_start({feature_id})"))?;
        self.level += 1;
        Ok(())
    }

    fn null_feature(&mut self, feature_id: usize) -> Result<()> {
        self.line(format_args!("null_feature({feature_id})"))
    }

    fn geometry_start(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        self.line(format_args!("geometry_start({meta}, {})", PartId(part_id)))?;
        self.level += 1;
        Ok(())
    }

    fn ring_start(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        self.line(format_args!("ring_start({meta}, {}, {ring_id})", Size(size)))?;
        self.level += 1;
        Ok(())
    }

    fn coord(&mut self, meta: &GeometryMeta, coord: &Coord, coord_id: u32) -> Result<()> {
        self.line(format_args!("coord({meta}, {}, {coord_id})", DebugCoord(coord)))
    }

    fn ring_end(&mut self, meta: &GeometryMeta, size: Option<u32>, ring_id: u32) -> Result<()> {
        self.level = self.level.saturating_sub(1);
        self.line(format_args!("ring_end({meta}, {}, {ring_id})", Size(size)))
    }

    fn geometry_end(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        self.level = self.level.saturating_sub(1);
        self.line(format_args!("geometry_end({meta}, {})", PartId(part_id)))
    }

    fn feature_end(&mut self, feature_id: usize) -> Result<()> {
        self.level = self.level.saturating_sub(1);
        self.line(format_args!("feature_end({feature_id})"))
    }

    fn next_error(&mut self, error: &WkError, feature_id: usize) -> Result<bool> {
        self.level = 0;
        self.line(format_args!("next_error('{error}', {feature_id})"))?;
        Ok(true)
    }

    fn deinitialize(&mut self) -> Result<()> {
        self.line(format_args!("deinitialize()"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkt::WktStreamer;
    use crate::io::{translate, WktProvider};

    fn trace(features: Vec<Option<&str>>) -> String {
        let mut handler = DebugHandler::new(Vec::new());
        translate(WktStreamer::new(WktProvider::new(features)), &mut handler).unwrap();
        String::from_utf8(handler.into_inner()).unwrap()
    }

    #[test]
    fn traces_point() {
        let expected = "\
initialize()
feature_start(0)
  geometry_start(POINT SRID=4326 [unknown], PART_ID_NONE)
    coord(POINT SRID=4326 [unknown], Coord(x = 1, y = 2), 0)
  geometry_end(POINT SRID=4326 [1], PART_ID_NONE)
feature_end(0)
feature_start(1)
  null_feature(1)
feature_end(1)
deinitialize()
";
        assert_eq!(trace(vec![Some("SRID=4326;POINT (1 2)"), None]), expected);
    }

    #[test]
    fn traces_rings_and_errors() {
        let out = trace(vec![Some("POLYGON Z ((0 0 1, 1 0 1, 0 0 1))"), Some("POINT (1 TWO)")]);
        assert!(out.contains("    ring_start(POLYGON Z [unknown], unknown, 0)\n"));
        assert!(out.contains("      coord(POLYGON Z [unknown], Coord(x = 1, y = 0, z = 1), 1)\n"));
        assert!(out.contains("    ring_end(POLYGON Z [unknown], 3, 0)\n"));
        assert!(out.contains("next_error('Expected a number but found 'TWO' (:9)', 1)\n"));
    }
}
