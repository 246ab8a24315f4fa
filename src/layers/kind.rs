use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// WMS layer with a time dimension; the only kind that gets `TIME`.
    WmsTime,
    Wms,
    Tile,
    Vector,
}

impl LayerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WmsTime => "WMSTime",
            Self::Wms => "WMS",
            Self::Tile => "Tile",
            Self::Vector => "Vector",
        }
    }

    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::WmsTime)
    }
}

impl FromStr for LayerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wmstime" | "wms-time" | "wms_time" => Ok(Self::WmsTime),
            "wms" => Ok(Self::Wms),
            "tile" | "wmts" | "xyz" => Ok(Self::Tile),
            "vector" | "wfs" => Ok(Self::Vector),
            _ => Err(ValidationError::UnknownLayerKind {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
