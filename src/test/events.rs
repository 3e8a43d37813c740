use crate::coord::Coord;
use crate::error::{Result, WkError};
use crate::handler::{GeometryHandler, PART_ID_NONE};
use crate::meta::GeometryMeta;

/// Records every event as a compact string.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    pub events: Vec<String>,
    pub errors: Vec<(usize, String)>,
    swallow: bool,
}

impl EventLog {
    /// A log whose `next_error` accepts every error.
    pub fn swallowing() -> Self {
        Self {
            swallow: true,
            ..Default::default()
        }
    }

    /// The metas passed to `geometry_start`, in order.
    pub fn started(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.starts_with("geometry_start"))
            .map(|e| e.as_str())
            .collect()
    }
}

fn part(part_id: u32) -> String {
    if part_id == PART_ID_NONE {
        "NONE".to_string()
    } else {
        part_id.to_string()
    }
}

fn size(size: Option<u32>) -> String {
    size.map_or("?".to_string(), |s| s.to_string())
}

impl GeometryHandler for EventLog {
    fn feature_start(&mut self, feature_id: usize) -> Result<()> {
        self.events.push(format!("feature_start({feature_id})"));
        Ok(())
    }

    fn null_feature(&mut self, feature_id: usize) -> Result<()> {
        self.events.push(format!("null_feature({feature_id})"));
        Ok(())
    }

    fn geometry_start(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        self.events
            .push(format!("geometry_start({meta}, {})", part(part_id)));
        Ok(())
    }

    fn ring_start(&mut self, _meta: &GeometryMeta, n: Option<u32>, ring_id: u32) -> Result<()> {
        self.events
            .push(format!("ring_start({}, {ring_id})", size(n)));
        Ok(())
    }

    fn coord(&mut self, _meta: &GeometryMeta, coord: &Coord, coord_id: u32) -> Result<()> {
        let values = (0..coord.dim())
            .map(|i| coord[i].to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.events.push(format!("coord({values}, {coord_id})"));
        Ok(())
    }

    fn ring_end(&mut self, _meta: &GeometryMeta, n: Option<u32>, ring_id: u32) -> Result<()> {
        self.events.push(format!("ring_end({}, {ring_id})", size(n)));
        Ok(())
    }

    fn geometry_end(&mut self, meta: &GeometryMeta, part_id: u32) -> Result<()> {
        self.events
            .push(format!("geometry_end({meta}, {})", part(part_id)));
        Ok(())
    }

    fn feature_end(&mut self, feature_id: usize) -> Result<()> {
        self.events.push(format!("feature_end({feature_id})"));
        Ok(())
    }

    fn next_error(&mut self, error: &WkError, feature_id: usize) -> Result<bool> {
        self.errors.push((feature_id, error.to_string()));
        Ok(self.swallow)
    }
}
