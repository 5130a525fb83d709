//! Request and response bodies for the auto-data and recommendation services.

use super::profiles::{MarketProfile, SoilProfile, WeatherProfile};
use super::recommendation::Recommendation;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Partial environment snapshot for a coordinate. Any section may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoDataSnapshot {
    #[serde(default)]
    pub soil: Option<SoilProfile>,
    #[serde(default)]
    pub weather: Option<WeatherProfile>,
    #[serde(default)]
    pub market: Option<MarketProfile>,
}

impl AutoDataSnapshot {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref soil) = self.soil {
            soil.validate()?;
        }
        if let Some(ref weather) = self.weather {
            weather.validate()?;
        }
        if let Some(ref market) = self.market {
            market.validate()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.soil.is_none() && self.weather.is_none() && self.market.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub location: String,
    pub soil: SoilProfile,
    pub weather: WeatherProfile,
    pub previous_crops: Vec<String>,
    pub market: MarketProfile,
    pub preferred_language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    /// Absent (or null) means the service had nothing to suggest.
    #[serde(default)]
    pub recommendations: Option<Vec<Recommendation>>,
}

impl RecommendationResponse {
    pub fn validate(&self) -> Result<()> {
        for rec in self.recommendations.iter().flatten() {
            rec.validate()?;
        }
        Ok(())
    }

    pub fn into_list(self) -> Vec<Recommendation> {
        self.recommendations.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_with_only_weather() {
        let snap: AutoDataSnapshot =
            serde_json::from_str(r#"{"weather":{"rainfall_mm":900,"temperature_c":24.5}}"#)
                .unwrap();
        assert!(snap.soil.is_none());
        assert!(snap.market.is_none());
        assert_eq!(snap.weather.unwrap().rainfall_mm, 900.0);
    }

    #[test]
    fn empty_snapshot() {
        let snap: AutoDataSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.is_empty());
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn snapshot_with_bad_market_fails_validation() {
        let snap: AutoDataSnapshot =
            serde_json::from_str(r#"{"market":{"demand_index":3.0,"price_index":0.2}}"#).unwrap();
        assert!(snap.validate().is_err());
    }

    #[test]
    fn snapshot_ignores_unknown_sections() {
        let snap: AutoDataSnapshot =
            serde_json::from_str(r#"{"source":"satellite","market":{"demand_index":0.1,"price_index":0.2}}"#)
                .unwrap();
        assert!(snap.market.is_some());
    }

    #[test]
    fn response_without_recommendations_is_empty() {
        let resp: RecommendationResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.validate().is_ok());
        assert!(resp.into_list().is_empty());

        let resp: RecommendationResponse =
            serde_json::from_str(r#"{"recommendations":null}"#).unwrap();
        assert!(resp.into_list().is_empty());
    }

    #[test]
    fn request_serializes_wire_field_names() {
        let req = RecommendationRequest {
            location: "22.57,88.36".into(),
            soil: SoilProfile::default(),
            weather: WeatherProfile::default(),
            previous_crops: vec!["rice".into()],
            market: MarketProfile::default(),
            preferred_language: "en".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["location"], "22.57,88.36");
        assert_eq!(value["previous_crops"][0], "rice");
        assert_eq!(value["preferred_language"], "en");
        assert_eq!(value["weather"]["rainfall_mm"], 1200.0);
        assert_eq!(value["market"]["demand_index"], 0.6);
        assert_eq!(value["soil"]["ph"], 6.8);
    }
}
