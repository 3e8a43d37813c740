//! A single coordinate with optional Z and M ordinates.

use std::ops::{Index, IndexMut};

/// An `(x, y, z?, m?)` tuple of doubles.
///
/// `has_z` and `has_m` declare which of the last two slots are meaningful. Logical indices are
/// packed: `0` is x, `1` is y, `2` is z if present and m otherwise, `3` is m when both are
/// present.
///
/// [`Coord::default`] is the "absent" sentinel: all four values NaN, no Z or M.
#[derive(Debug, Clone, Copy)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
    pub has_z: bool,
    pub has_m: bool,
}

impl Coord {
    pub fn new(x: f64, y: f64, z: f64, m: f64, has_z: bool, has_m: bool) -> Self {
        Self {
            x,
            y,
            z,
            m,
            has_z,
            has_m,
        }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Self::new(x, y, f64::NAN, f64::NAN, false, false)
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, f64::NAN, true, false)
    }

    pub fn xym(x: f64, y: f64, m: f64) -> Self {
        Self::new(x, y, f64::NAN, m, false, true)
    }

    pub fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self::new(x, y, z, m, true, true)
    }

    /// An all-NaN coordinate carrying the given dimension flags, ready to be filled by index.
    pub fn with_dims(has_z: bool, has_m: bool) -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN, has_z, has_m)
    }

    /// Number of meaningful ordinates (2, 3 or 4).
    pub fn dim(&self) -> usize {
        2 + self.has_z as usize + self.has_m as usize
    }

    /// True for the sentinel produced by [`Coord::default`].
    pub fn is_absent(&self) -> bool {
        !self.has_z
            && !self.has_m
            && self.x.is_nan()
            && self.y.is_nan()
            && self.z.is_nan()
            && self.m.is_nan()
    }

    /// Checked access by logical index.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.slot(i).map(|slot| match slot {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => self.m,
        })
    }

    /// Maps a logical index onto the physical x/y/z/m slot.
    fn slot(&self, i: usize) -> Option<usize> {
        match i {
            0 | 1 => Some(i),
            2 if self.has_z => Some(2),
            2 if self.has_m => Some(3),
            3 if self.has_z && self.has_m => Some(3),
            _ => None,
        }
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self::with_dims(false, false)
    }
}

impl Index<usize> for Coord {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        match self.slot(i) {
            Some(0) => &self.x,
            Some(1) => &self.y,
            Some(2) => &self.z,
            Some(_) => &self.m,
            None => panic!("Coordinate subscript out of range: {i}"),
        }
    }
}

impl IndexMut<usize> for Coord {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        match self.slot(i) {
            Some(0) => &mut self.x,
            Some(1) => &mut self.y,
            Some(2) => &mut self.z,
            Some(_) => &mut self.m,
            None => panic!("Coordinate subscript out of range: {i}"),
        }
    }
}

/// Structural equality: same dimension flags and `==` at every logical index, so NaN never
/// compares equal.
impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        if self.has_z != other.has_z || self.has_m != other.has_m {
            return false;
        }

        (0..self.dim()).all(|i| self[i] == other[i])
    }
}
