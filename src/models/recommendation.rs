use super::profiles::{ensure_finite, ensure_unit_interval};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One ranked crop suggestion from the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(alias = "cropName")]
    pub crop_name: String,
    pub score: f64,
    #[serde(alias = "expectedYieldTonsPerHectare")]
    pub expected_yield_tons_per_hectare: f64,
    /// 0..=1
    #[serde(alias = "profitIndex")]
    pub profit_index: f64,
    /// 0..=1
    #[serde(alias = "sustainabilityScore")]
    pub sustainability_score: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Recommendation {
    pub fn validate(&self) -> Result<()> {
        let ctx = |field: &str| format!("recommendation[{}].{}", self.crop_name, field);
        ensure_finite(&ctx("score"), self.score)?;
        ensure_finite(
            &ctx("expected_yield_tons_per_hectare"),
            self.expected_yield_tons_per_hectare,
        )?;
        ensure_unit_interval(&ctx("profit_index"), self.profit_index)?;
        ensure_unit_interval(&ctx("sustainability_score"), self.sustainability_score)
    }

    pub fn yield_label(&self) -> String {
        format!("{:.1} t/ha", self.expected_yield_tons_per_hectare)
    }

    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Recommendation {
        Recommendation {
            crop_name: "Rice".into(),
            score: 87.5,
            expected_yield_tons_per_hectare: 4.26,
            profit_index: 0.7,
            sustainability_score: 0.8,
            notes: None,
        }
    }

    #[test]
    fn parses_snake_case_with_null_notes() {
        let rec: Recommendation = serde_json::from_str(
            r#"{"crop_name":"Maize","score":71,"expected_yield_tons_per_hectare":5.5,
                "profit_index":0.4,"sustainability_score":0.6,"notes":null}"#,
        )
        .unwrap();
        assert_eq!(rec.crop_name, "Maize");
        assert_eq!(rec.notes, None);
    }

    #[test]
    fn parses_camel_case_without_notes() {
        let rec: Recommendation = serde_json::from_str(
            r#"{"cropName":"Jute","score":64.2,"expectedYieldTonsPerHectare":2.1,
                "profitIndex":0.35,"sustainabilityScore":0.9}"#,
        )
        .unwrap();
        assert_eq!(rec.crop_name, "Jute");
        assert_eq!(rec.profit_index, 0.35);
        assert!(!rec.has_notes());
    }

    #[test]
    fn validate_rejects_profit_out_of_range() {
        let rec = Recommendation {
            profit_index: 1.2,
            ..sample()
        };
        assert!(rec.validate().is_err());
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn yield_label_rounds_to_one_decimal() {
        assert_eq!(sample().yield_label(), "4.3 t/ha");
    }

    #[test]
    fn blank_notes_do_not_count() {
        let rec = Recommendation {
            notes: Some("   ".into()),
            ..sample()
        };
        assert!(!rec.has_notes());
    }
}
