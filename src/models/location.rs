use serde::{Deserialize, Serialize};

pub const DEFAULT_LATITUDE: &str = "22.57";
pub const DEFAULT_LONGITUDE: &str = "88.36";

/// Field coordinates exactly as typed.
///
/// Both parts stay free text so half-typed values like `"22."` or `"-"` are
/// representable while the user edits. Nothing here parses them; the
/// services decide what a valid coordinate is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinate {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// `"<lat>,<lon>"` as sent in the recommendation request.
    pub fn as_location(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
    }
}
