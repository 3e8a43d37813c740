use std::mem;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::error::{Result, WkError};
use crate::io::wkb::Endianness;

/// A sink for one output record per feature.
pub trait Exporter {
    /// Clears any partial output before a feature is written.
    fn prepare_next_feature(&mut self) -> Result<()>;

    /// Marks the current feature as null.
    fn write_null(&mut self) -> Result<()>;

    /// Commits the current feature and advances.
    fn write_next_feature(&mut self) -> Result<()>;

    fn n_features(&self) -> usize;
}

/// An exporter accepting raw binary values.
pub trait BytesExporter: Exporter {
    fn write_u8(&mut self, value: u8) -> Result<()>;

    fn write_u32(&mut self, value: u32, endian: Endianness) -> Result<()>;

    fn write_f64(&mut self, value: f64, endian: Endianness) -> Result<()>;
}

/// An exporter accepting text, with control over how numbers are rendered.
pub trait StringExporter: Exporter {
    fn write_str(&mut self, value: &str) -> Result<()>;

    fn write_f64(&mut self, value: f64) -> Result<()>;

    fn write_u32(&mut self, value: u32) -> Result<()>;

    /// Significant digits when trimming, decimal places otherwise.
    fn set_rounding_precision(&mut self, precision: usize);

    /// Whether to drop trailing zeros from formatted numbers.
    fn set_trim(&mut self, trim: bool);
}

/// Shared bookkeeping for the `Vec`-backed exporters.
#[derive(Debug, Clone)]
struct Slots<T> {
    output: Vec<Option<T>>,
    index: usize,
    is_null: bool,
}

impl<T> Slots<T> {
    fn new(n_features: usize) -> Self {
        Self {
            output: (0..n_features).map(|_| None).collect(),
            index: 0,
            is_null: false,
        }
    }

    fn commit(&mut self, value: T) -> Result<()> {
        let index = self.index;
        let n = self.output.len();
        let slot = self.output.get_mut(index).ok_or_else(|| {
            WkError::IndexOutOfRange(format!("feature {index} of an exporter sized for {n}"))
        })?;
        *slot = if self.is_null { None } else { Some(value) };
        self.index += 1;
        Ok(())
    }
}

/// Collects one WKB buffer per feature.
#[derive(Debug, Clone)]
pub struct WkbExporter {
    slots: Slots<Vec<u8>>,
    buffer: Vec<u8>,
}

impl WkbExporter {
    pub fn new(n_features: usize) -> Self {
        Self {
            slots: Slots::new(n_features),
            buffer: Vec::new(),
        }
    }

    pub fn into_output(self) -> Vec<Option<Vec<u8>>> {
        self.slots.output
    }
}

impl Exporter for WkbExporter {
    fn prepare_next_feature(&mut self) -> Result<()> {
        self.slots.is_null = false;
        self.buffer.clear();
        Ok(())
    }

    fn write_null(&mut self) -> Result<()> {
        self.slots.is_null = true;
        Ok(())
    }

    fn write_next_feature(&mut self) -> Result<()> {
        let buffer = mem::take(&mut self.buffer);
        self.slots.commit(buffer)
    }

    fn n_features(&self) -> usize {
        self.slots.output.len()
    }
}

impl BytesExporter for WkbExporter {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buffer.write_u8(value)?;
        Ok(())
    }

    fn write_u32(&mut self, value: u32, endian: Endianness) -> Result<()> {
        match endian {
            Endianness::BigEndian => self.buffer.write_u32::<BigEndian>(value)?,
            Endianness::LittleEndian => self.buffer.write_u32::<LittleEndian>(value)?,
        }
        Ok(())
    }

    fn write_f64(&mut self, value: f64, endian: Endianness) -> Result<()> {
        match endian {
            Endianness::BigEndian => self.buffer.write_f64::<BigEndian>(value)?,
            Endianness::LittleEndian => self.buffer.write_f64::<LittleEndian>(value)?,
        }
        Ok(())
    }
}

/// Collects one WKT string per feature.
#[derive(Debug, Clone)]
pub struct WktExporter {
    slots: Slots<String>,
    buffer: String,
    precision: usize,
    trim: bool,
}

impl WktExporter {
    pub fn new(n_features: usize) -> Self {
        Self {
            slots: Slots::new(n_features),
            buffer: String::new(),
            precision: 16,
            trim: true,
        }
    }

    pub fn into_output(self) -> Vec<Option<String>> {
        self.slots.output
    }
}

impl Exporter for WktExporter {
    fn prepare_next_feature(&mut self) -> Result<()> {
        self.slots.is_null = false;
        self.buffer.clear();
        Ok(())
    }

    fn write_null(&mut self) -> Result<()> {
        self.slots.is_null = true;
        Ok(())
    }

    fn write_next_feature(&mut self) -> Result<()> {
        let buffer = mem::take(&mut self.buffer);
        self.slots.commit(buffer)
    }

    fn n_features(&self) -> usize {
        self.slots.output.len()
    }
}

impl StringExporter for WktExporter {
    fn write_str(&mut self, value: &str) -> Result<()> {
        self.buffer.push_str(value);
        Ok(())
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.buffer
            .push_str(&format_f64(value, self.precision, self.trim));
        Ok(())
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buffer.push_str(&value.to_string());
        Ok(())
    }

    fn set_rounding_precision(&mut self, precision: usize) {
        self.precision = precision;
    }

    fn set_trim(&mut self, trim: bool) {
        self.trim = trim;
    }
}

/// Renders a double with a `.` decimal separator regardless of locale.
///
/// With `trim`, `precision` counts significant digits and the shorter of fixed or scientific
/// notation is picked, with trailing zeros removed (`printf("%g")`). Without it, `precision`
/// counts digits after the decimal point.
pub fn format_f64(value: f64, precision: usize, trim: bool) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if !trim {
        return format!("{value:.precision$}");
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = match exponent.parse() {
        Ok(exponent) => exponent,
        Err(_) => return scientific,
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_zeros(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
