use crate::coord::Coord;
use crate::error::Result;
use crate::handler::{GeometryHandler, PART_ID_NONE};
use crate::io::wkt::tokenizer::Tokenizer;
use crate::io::{ReadFeature, StringProvider};
use crate::meta::{GeometryMeta, GeometryType};

/// Parses WKT features straight into handler events, without building a geometry.
///
/// Sizes are only known once a closing parenthesis has been read, so `geometry_start` and
/// `ring_start` usually report `None` and the count arrives with the matching end event. Use
/// [`WktReader`](super::WktReader) for handlers that need sizes up front.
pub struct WktStreamer<P> {
    provider: P,
}

impl<P: StringProvider> WktStreamer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn into_provider(self) -> P {
        self.provider
    }
}

impl<P: StringProvider> ReadFeature for WktStreamer<P> {
    type Provider = P;

    fn provider(&self) -> &P {
        &self.provider
    }

    fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    fn read_feature<H: GeometryHandler + ?Sized>(
        &mut self,
        feature_id: usize,
        handler: &mut H,
    ) -> Result<()> {
        handler.feature_start(feature_id)?;

        if self.provider.feature_is_null() {
            handler.null_feature(feature_id)?;
        } else {
            let text = self.provider.feature_string()?;
            WktParser::new(text, &mut *handler).read_geometry(PART_ID_NONE)?;
        }

        handler.feature_end(feature_id)
    }
}

/// Recursive-descent parser for one WKT geometry.
pub(crate) struct WktParser<'a, 'h, H: ?Sized> {
    s: Tokenizer<'a>,
    handler: &'h mut H,
    next_handle: u32,
}

impl<'a, 'h, H: GeometryHandler + ?Sized> WktParser<'a, 'h, H> {
    pub fn new(text: &'a str, handler: &'h mut H) -> Self {
        Self {
            s: Tokenizer::new(text),
            handler,
            next_handle: 0,
        }
    }

    fn mint(&mut self, mut meta: GeometryMeta) -> GeometryMeta {
        meta.handle = self.next_handle;
        self.next_handle += 1;
        meta
    }

    /// Parses a geometry that starts with its own type keyword.
    pub fn read_geometry(&mut self, part_id: u32) -> Result<()> {
        let mut meta = self.assert_geometry_meta()?;
        if part_id != PART_ID_NONE {
            meta.srid = None;
        }
        let meta = self.mint(meta);
        self.read_geometry_body(meta, part_id)
    }

    fn read_geometry_body(&mut self, mut meta: GeometryMeta, part_id: u32) -> Result<()> {
        self.handler.geometry_start(&meta, part_id)?;

        let size = match meta.geometry_type {
            GeometryType::Point => self.read_point(&meta)?,
            GeometryType::LineString => self.read_coords(&meta)?,
            GeometryType::Polygon => self.read_rings(&meta)?,
            GeometryType::MultiPoint => self.read_multi_point(&meta)?,
            GeometryType::MultiLineString => {
                self.read_children(&meta, GeometryType::LineString)?
            }
            GeometryType::MultiPolygon => self.read_children(&meta, GeometryType::Polygon)?,
            GeometryType::GeometryCollection => self.read_collection()?,
        };

        if meta.size.is_none() {
            meta.size = Some(size);
        }
        self.handler.geometry_end(&meta, part_id)
    }

    /// `[SRID=<int>;]TYPE[ Z][ M][ EMPTY]`; `EMPTY` is only peeked at.
    fn assert_geometry_meta(&mut self) -> Result<GeometryMeta> {
        let mut word = self.s.assert_word()?;
        let mut srid = None;

        if word == "SRID" {
            self.s.assert_char(b'=')?;
            srid = Some(self.s.assert_integer()?);
            self.s.assert_char(b';')?;
            word = self.s.assert_word()?;
        }

        let geometry_type = GeometryType::from_wkt_name(word)
            .ok_or_else(|| self.s.error_before("a geometry type", word))?;

        let has_z = self.s.is(b'Z');
        if has_z {
            self.s.assert_char(b'Z')?;
        }
        let has_m = self.s.is(b'M');
        if has_m {
            self.s.assert_char(b'M')?;
        }

        let mut meta = GeometryMeta::new(geometry_type).with_dims(has_z, has_m);
        meta.srid = srid;
        if self.s.is_empty_keyword() {
            meta.size = Some(0);
        }
        Ok(meta)
    }

    fn child_meta(&mut self, parent: &GeometryMeta, geometry_type: GeometryType) -> GeometryMeta {
        let mut child = parent.child(geometry_type);
        if self.s.is_empty_keyword() {
            child.size = Some(0);
        }
        self.mint(child)
    }

    fn read_point(&mut self, meta: &GeometryMeta) -> Result<u32> {
        if self.s.assert_empty_or_open()? {
            return Ok(0);
        }
        self.read_point_coord(meta)?;
        self.s.assert_char(b')')?;
        Ok(1)
    }

    fn read_point_coord(&mut self, meta: &GeometryMeta) -> Result<()> {
        let coord = self.read_coord(meta)?;
        self.handler.coord(meta, &coord, 0)
    }

    /// A parenthesised coordinate list, returning its length.
    fn read_coords(&mut self, meta: &GeometryMeta) -> Result<u32> {
        if self.s.assert_empty_or_open()? {
            return Ok(0);
        }

        let mut coord_id = 0;
        loop {
            let coord = self.read_coord(meta)?;
            self.handler.coord(meta, &coord, coord_id)?;
            coord_id += 1;
            if self.s.assert_one_of(b",)")? == b')' {
                return Ok(coord_id);
            }
        }
    }

    fn read_rings(&mut self, meta: &GeometryMeta) -> Result<u32> {
        if self.s.assert_empty_or_open()? {
            return Ok(0);
        }

        let mut ring_id = 0;
        loop {
            self.handler.ring_start(meta, None, ring_id)?;
            let size = self.read_coords(meta)?;
            self.handler.ring_end(meta, Some(size), ring_id)?;
            ring_id += 1;
            if self.s.assert_one_of(b",)")? == b')' {
                return Ok(ring_id);
            }
        }
    }

    /// Accepts both `(0 0, 1 1)` and `((0 0), (1 1))`.
    fn read_multi_point(&mut self, meta: &GeometryMeta) -> Result<u32> {
        if self.s.assert_empty_or_open()? {
            return Ok(0);
        }

        let mut part_id = 0;
        if self.s.is_number() {
            loop {
                let mut child = self.child_meta(meta, GeometryType::Point);
                self.handler.geometry_start(&child, part_id)?;
                if child.is_empty() {
                    self.s.skip_token();
                } else {
                    self.read_point_coord(&child)?;
                    child.size = Some(1);
                }
                self.handler.geometry_end(&child, part_id)?;

                part_id += 1;
                if self.s.assert_one_of(b",)")? == b')' {
                    return Ok(part_id);
                }
            }
        }

        loop {
            let child = self.child_meta(meta, GeometryType::Point);
            self.read_geometry_body(child, part_id)?;
            part_id += 1;
            if self.s.assert_one_of(b",)")? == b')' {
                return Ok(part_id);
            }
        }
    }

    /// Parts of a multi geometry: bodies without their own type keyword.
    fn read_children(&mut self, meta: &GeometryMeta, child_type: GeometryType) -> Result<u32> {
        if self.s.assert_empty_or_open()? {
            return Ok(0);
        }

        let mut part_id = 0;
        loop {
            let child = self.child_meta(meta, child_type);
            self.read_geometry_body(child, part_id)?;
            part_id += 1;
            if self.s.assert_one_of(b",)")? == b')' {
                return Ok(part_id);
            }
        }
    }

    /// Parts of a collection, each with a full type keyword and never an SRID.
    fn read_collection(&mut self) -> Result<u32> {
        if self.s.assert_empty_or_open()? {
            return Ok(0);
        }

        let mut part_id = 0;
        loop {
            self.read_geometry(part_id)?;
            part_id += 1;
            if self.s.assert_one_of(b",)")? == b')' {
                return Ok(part_id);
            }
        }
    }

    /// Reads as many ordinates as the enclosing geometry declared.
    fn read_coord(&mut self, meta: &GeometryMeta) -> Result<Coord> {
        let mut coord = Coord::with_dims(meta.has_z, meta.has_m);
        coord[0] = self.s.assert_number()?;
        for i in 1..coord.dim() {
            self.s.assert_whitespace()?;
            coord[i] = self.s.assert_number()?;
        }
        Ok(coord)
    }
}
