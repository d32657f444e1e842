//! Where boundary data comes from

use super::features::{parse_boundaries, retain_ghana};
use crate::api::Backend;
use crate::error::Result;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Boundary data location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeoSource {
    /// The backend's `/geo/gha_adm1` endpoint
    Backend,
    Url(String),
    File(PathBuf),
}

impl Default for GeoSource {
    fn default() -> Self {
        Self::Backend
    }
}

impl FromStr for GeoSource {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.is_empty() || s.eq_ignore_ascii_case("backend") {
            Self::Backend
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::File(PathBuf::from(s))
        })
    }
}

impl TryFrom<String> for GeoSource {
    type Error = Infallible;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeoSource> for String {
    fn from(source: GeoSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for GeoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend => f.write_str("backend"),
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Boundaries loaded and filtered to Ghana
#[derive(Debug, Clone)]
pub struct Boundaries {
    pub collection: FeatureCollection,
    /// Features removed as belonging to another country
    pub dropped: usize,
}

/// Load boundaries from `source`, optionally dropping non-Ghanaian features
pub async fn load_boundaries(
    source: &GeoSource,
    backend: &dyn Backend,
    filter_ghana: bool,
) -> Result<Boundaries> {
    let mut collection = match source {
        GeoSource::Backend => backend.boundaries(None).await?,
        GeoSource::Url(url) => backend.boundaries(Some(url)).await?,
        GeoSource::File(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            parse_boundaries(&text)?
        }
    };

    let dropped = if filter_ghana {
        retain_ghana(&mut collection)
    } else {
        0
    };

    info!(
        "Loaded {} boundary features from {}",
        collection.features.len(),
        source
    );

    Ok(Boundaries {
        collection,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!("backend".parse::<GeoSource>().unwrap(), GeoSource::Backend);
        assert_eq!("".parse::<GeoSource>().unwrap(), GeoSource::Backend);
        assert_eq!(
            "https://example.org/gha.geojson".parse::<GeoSource>().unwrap(),
            GeoSource::Url("https://example.org/gha.geojson".to_string())
        );
        assert_eq!(
            "data/ghana-adm1.geojson".parse::<GeoSource>().unwrap(),
            GeoSource::File(PathBuf::from("data/ghana-adm1.geojson"))
        );
    }

    #[test]
    fn test_source_round_trips_through_string() {
        let source: GeoSource = serde_json::from_str("\"/tmp/adm1.geojson\"").unwrap();
        assert_eq!(source, GeoSource::File(PathBuf::from("/tmp/adm1.geojson")));
        assert_eq!(serde_json::to_string(&GeoSource::Backend).unwrap(), "\"backend\"");
    }
}
