use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A surf spot listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Beach {
    pub id: String,
    pub formal_name: String,
    pub local_name: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Beach {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Local name when the beach has one, otherwise the formal name.
    pub fn display_name(&self) -> &str {
        self.local_name.as_deref().unwrap_or(&self.formal_name)
    }
}

/// A beach annotated with its distance from the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyBeach {
    #[serde(flatten)]
    pub beach: Beach,
    pub distance_km: f64,
}

impl NearbyBeach {
    pub fn from_origin(beach: Beach, origin: &Coordinates) -> Self {
        let distance_km = origin.distance_km(&beach.coordinates());
        Self { beach, distance_km }
    }
}
