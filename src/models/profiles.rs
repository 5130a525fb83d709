use crate::error::{CropwiseError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub ph: f64,
    /// Volumetric moisture, percent
    pub moisture: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl Default for SoilProfile {
    fn default() -> Self {
        Self {
            ph: 6.8,
            moisture: 25.0,
            nitrogen: 50.0,
            phosphorus: 30.0,
            potassium: 40.0,
        }
    }
}

impl SoilProfile {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("soil.ph", self.ph)?;
        ensure_finite("soil.moisture", self.moisture)?;
        ensure_finite("soil.nitrogen", self.nitrogen)?;
        ensure_finite("soil.phosphorus", self.phosphorus)?;
        ensure_finite("soil.potassium", self.potassium)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherProfile {
    #[serde(alias = "rainfallMm")]
    pub rainfall_mm: f64,
    #[serde(alias = "temperatureC")]
    pub temperature_c: f64,
}

impl Default for WeatherProfile {
    fn default() -> Self {
        Self {
            rainfall_mm: 1200.0,
            temperature_c: 27.0,
        }
    }
}

impl WeatherProfile {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("weather.rainfall_mm", self.rainfall_mm)?;
        ensure_finite("weather.temperature_c", self.temperature_c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketProfile {
    #[serde(alias = "demandIndex")]
    pub demand_index: f64,
    #[serde(alias = "priceIndex")]
    pub price_index: f64,
}

impl Default for MarketProfile {
    fn default() -> Self {
        Self {
            demand_index: 0.6,
            price_index: 0.5,
        }
    }
}

impl MarketProfile {
    pub fn validate(&self) -> Result<()> {
        ensure_unit_interval("market.demand_index", self.demand_index)?;
        ensure_unit_interval("market.price_index", self.price_index)
    }
}

pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CropwiseError::InvalidData(format!(
            "{} is not a finite number",
            field
        )))
    }
}

pub(crate) fn ensure_unit_interval(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CropwiseError::InvalidData(format!(
            "{} = {} is outside [0, 1]",
            field, value
        )))
    }
}
