use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Result, WkError};
use crate::io::wkb::Endianness;

/// A cursor over an ordered collection of raw features.
///
/// The cursor starts before the first feature; [`Provider::seek_next_feature`] must be called
/// before the first feature can be read.
pub trait Provider {
    /// Advances to the next feature, returning false once the collection is exhausted.
    fn seek_next_feature(&mut self) -> bool;

    /// Whether the current feature is null, without decoding it.
    fn feature_is_null(&self) -> bool;

    fn n_features(&self) -> usize;

    /// Rewinds to before the first feature.
    fn reset(&mut self);
}

/// A provider of binary features read through a bounds-checked cursor.
pub trait BytesProvider: Provider {
    fn read_u8(&mut self) -> Result<u8>;

    fn read_u32(&mut self, endian: Endianness) -> Result<u32>;

    fn read_f64(&mut self, endian: Endianness) -> Result<f64>;
}

/// A provider of text features.
pub trait StringProvider: Provider {
    fn feature_string(&self) -> Result<&str>;
}

/// Binary features backed by a `Vec`; `None` marks a null feature.
#[derive(Debug, Clone)]
pub struct WkbProvider<T> {
    features: Vec<Option<T>>,
    index: Option<usize>,
    offset: usize,
}

impl<T: AsRef<[u8]>> WkbProvider<T> {
    pub fn new(features: Vec<Option<T>>) -> Self {
        Self {
            features,
            index: None,
            offset: 0,
        }
    }

    fn read_bytes(&mut self, n: usize) -> Result<&[u8]> {
        let index = self
            .index
            .ok_or_else(|| WkError::IndexOutOfRange("no current feature".to_string()))?;
        let buf = self
            .features
            .get(index)
            .and_then(|feature| feature.as_ref())
            .ok_or_else(|| WkError::IndexOutOfRange(format!("no WKB at feature {index}")))?
            .as_ref();

        let end = self.offset + n;
        if end > buf.len() {
            return Err(WkError::WkbParse("Reached end of WKB input".to_string()));
        }

        let out = &buf[self.offset..end];
        self.offset = end;
        Ok(out)
    }
}

impl<T: AsRef<[u8]>> Provider for WkbProvider<T> {
    fn seek_next_feature(&mut self) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        self.offset = 0;
        if next < self.features.len() {
            self.index = Some(next);
            true
        } else {
            self.index = Some(self.features.len());
            false
        }
    }

    fn feature_is_null(&self) -> bool {
        self.index
            .and_then(|i| self.features.get(i))
            .map_or(true, |feature| feature.is_none())
    }

    fn n_features(&self) -> usize {
        self.features.len()
    }

    fn reset(&mut self) {
        self.index = None;
        self.offset = 0;
    }
}

impl<T: AsRef<[u8]>> BytesProvider for WkbProvider<T> {
    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self, endian: Endianness) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(match endian {
            Endianness::BigEndian => BigEndian::read_u32(bytes),
            Endianness::LittleEndian => LittleEndian::read_u32(bytes),
        })
    }

    fn read_f64(&mut self, endian: Endianness) -> Result<f64> {
        let bytes = self.read_bytes(8)?;
        Ok(match endian {
            Endianness::BigEndian => BigEndian::read_f64(bytes),
            Endianness::LittleEndian => LittleEndian::read_f64(bytes),
        })
    }
}

/// Text features backed by a `Vec`; `None` marks a null feature.
#[derive(Debug, Clone)]
pub struct WktProvider<T> {
    features: Vec<Option<T>>,
    index: Option<usize>,
}

impl<T: AsRef<str>> WktProvider<T> {
    pub fn new(features: Vec<Option<T>>) -> Self {
        Self {
            features,
            index: None,
        }
    }
}

impl<T: AsRef<str>> Provider for WktProvider<T> {
    fn seek_next_feature(&mut self) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        if next < self.features.len() {
            self.index = Some(next);
            true
        } else {
            self.index = Some(self.features.len());
            false
        }
    }

    fn feature_is_null(&self) -> bool {
        self.index
            .and_then(|i| self.features.get(i))
            .map_or(true, |feature| feature.is_none())
    }

    fn n_features(&self) -> usize {
        self.features.len()
    }

    fn reset(&mut self) {
        self.index = None;
    }
}

impl<T: AsRef<str>> StringProvider for WktProvider<T> {
    fn feature_string(&self) -> Result<&str> {
        let index = self
            .index
            .ok_or_else(|| WkError::IndexOutOfRange("no current feature".to_string()))?;
        self.features
            .get(index)
            .and_then(|feature| feature.as_ref())
            .map(|feature| feature.as_ref())
            .ok_or_else(|| WkError::IndexOutOfRange(format!("no WKT at feature {index}")))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cursor_walks_and_resets() {
        let mut provider = WktProvider::new(vec![Some("POINT (0 1)"), None]);
        assert_eq!(provider.n_features(), 2);
        assert!(provider.feature_string().is_err());

        assert!(provider.seek_next_feature());
        assert!(!provider.feature_is_null());
        assert_eq!(provider.feature_string().unwrap(), "POINT (0 1)");

        assert!(provider.seek_next_feature());
        assert!(provider.feature_is_null());
        assert!(!provider.seek_next_feature());
        assert!(!provider.seek_next_feature());

        provider.reset();
        assert!(provider.seek_next_feature());
        assert_eq!(provider.feature_string().unwrap(), "POINT (0 1)");
    }

    #[test]
    fn reads_both_byte_orders() {
        let mut provider = WkbProvider::new(vec![Some(vec![
            0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0,
        ])]);
        assert!(provider.seek_next_feature());
        assert_eq!(provider.read_u32(Endianness::BigEndian).unwrap(), 1);
        assert_eq!(provider.read_u32(Endianness::LittleEndian).unwrap(), 1);
        assert_eq!(provider.read_f64(Endianness::BigEndian).unwrap(), 1.0);
    }

    #[test]
    fn truncated_read_is_a_parse_error() {
        let mut provider = WkbProvider::new(vec![Some(vec![0x01, 0x01])]);
        assert!(provider.seek_next_feature());
        assert_eq!(provider.read_u8().unwrap(), 1);
        let err = provider.read_u32(Endianness::LittleEndian).unwrap_err();
        assert!(err.is_parse_error());
        assert_eq!(err.to_string(), "Reached end of WKB input");
    }
}
