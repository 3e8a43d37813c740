use serde::{Deserialize, Serialize};

use crate::error::{Result, WkError};
use crate::meta::GeometryMeta;

/// How a writer treats one optional part of the incoming meta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inclusion {
    /// Always write it; an error if the source doesn't have it.
    Include,
    /// Never write it.
    Exclude,
    /// Write it when the source has it.
    #[default]
    PassThrough,
}

impl Inclusion {
    fn resolve(self, present: bool, label: &'static str) -> Result<bool> {
        match self {
            Inclusion::Include if !present => Err(WkError::IncludeUndefined(label)),
            Inclusion::Include => Ok(true),
            Inclusion::Exclude => Ok(false),
            Inclusion::PassThrough => Ok(present),
        }
    }
}

/// Z, M and SRID inclusion for a writer, fixed for the duration of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionPolicy {
    pub include_z: Inclusion,
    pub include_m: Inclusion,
    pub include_srid: Inclusion,
}

impl DimensionPolicy {
    /// The meta a writer actually encodes for `meta`.
    ///
    /// An SRID only belongs to the outermost geometry of a feature, so nested parts always lose
    /// theirs and `include_srid` is only checked when `top_level` is set.
    pub fn effective_meta(&self, meta: &GeometryMeta, top_level: bool) -> Result<GeometryMeta> {
        let mut out = meta.clone();
        out.has_z = self.include_z.resolve(meta.has_z, "Z")?;
        out.has_m = self.include_m.resolve(meta.has_m, "M")?;
        if !top_level || !self.include_srid.resolve(meta.has_srid(), "SRID")? {
            out.srid = None;
        }
        Ok(out)
    }
}
