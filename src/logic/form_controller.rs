use crate::datasources::{AutoDataSource, RecommendationSource};
use crate::error::{CropwiseError, Result};
use crate::models::{
    parse_rotation, AutoDataSnapshot, Coordinate, FormField, MarketProfile, Recommendation,
    RecommendationRequest, RecommendationResponse, SoilProfile, WeatherProfile,
    DEFAULT_ROTATION_TEXT,
};
use crate::models::profiles::ensure_unit_interval;
use chrono::{DateTime, Local};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

pub const AUTO_FILL_WARNING: &str =
    "Auto-fill failed. Showing default values; you can edit the fields manually.";
pub const RECOMMEND_WARNING: &str =
    "Could not fetch recommendations. Check your connection and the API base URL configuration.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AutoFill,
    Recommend,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AutoFill => "auto-fill",
            Operation::Recommend => "recommend",
        }
    }

    fn warning(&self) -> &'static str {
        match self {
            Operation::AutoFill => AUTO_FILL_WARNING,
            Operation::Recommend => RECOMMEND_WARNING,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    pub auto_fill_in_flight: bool,
    pub recommend_in_flight: bool,
    pub warning: Option<String>,
}

impl RequestStatus {
    /// True while either operation awaits its response.
    pub fn in_flight(&self) -> bool {
        self.auto_fill_in_flight || self.recommend_in_flight
    }

    pub fn is_busy(&self, op: Operation) -> bool {
        match op {
            Operation::AutoFill => self.auto_fill_in_flight,
            Operation::Recommend => self.recommend_in_flight,
        }
    }

    fn set_busy(&mut self, op: Operation, busy: bool) {
        match op {
            Operation::AutoFill => self.auto_fill_in_flight = busy,
            Operation::Recommend => self.recommend_in_flight = busy,
        }
    }
}

/// Completed network call, tagged with the sequence number it was issued under.
#[derive(Debug)]
pub enum Outcome {
    AutoFill {
        seq: u64,
        result: Result<AutoDataSnapshot>,
    },
    Recommend {
        seq: u64,
        result: Result<RecommendationResponse>,
    },
}

impl Outcome {
    fn operation(&self) -> Operation {
        match self {
            Outcome::AutoFill { .. } => Operation::AutoFill,
            Outcome::Recommend { .. } => Operation::Recommend,
        }
    }

    fn seq(&self) -> u64 {
        match self {
            Outcome::AutoFill { seq, .. } | Outcome::Recommend { seq, .. } => *seq,
        }
    }
}

/// Render-ready snapshot of the controller.
#[derive(Debug)]
pub struct FormView<'a> {
    pub loading: bool,
    pub auto_filling: bool,
    pub recommending: bool,
    pub warning: Option<&'a str>,
    pub recommendations: &'a [Recommendation],
    pub rotation_history: Vec<String>,
    pub last_auto_fill: Option<DateTime<Local>>,
}

/// Owns the form inputs and reconciles the two service calls against them.
///
/// Calls run as spawned tasks and report back over a channel. Nothing
/// touches form state until the owner drains that channel with
/// [`poll_outcomes`](Self::poll_outcomes) or [`settle`](Self::settle), so
/// every update lands atomically between frames.
pub struct FormController {
    auto_data: Arc<dyn AutoDataSource>,
    recommender: Arc<dyn RecommendationSource>,
    language: String,

    coordinate: Coordinate,
    soil: SoilProfile,
    weather: WeatherProfile,
    market: MarketProfile,
    rotation_text: String,

    status: RequestStatus,
    recommendations: Vec<Recommendation>,
    last_auto_fill: Option<DateTime<Local>>,

    // Latest sequence issued per operation; older outcomes are stale.
    auto_fill_seq: u64,
    recommend_seq: u64,

    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    tasks: JoinSet<()>,

    initialized: bool,
    torn_down: bool,
}

impl FormController {
    pub fn new(
        auto_data: Arc<dyn AutoDataSource>,
        recommender: Arc<dyn RecommendationSource>,
        language: impl Into<String>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            auto_data,
            recommender,
            language: language.into(),
            coordinate: Coordinate::default(),
            soil: SoilProfile::default(),
            weather: WeatherProfile::default(),
            market: MarketProfile::default(),
            rotation_text: DEFAULT_ROTATION_TEXT.to_string(),
            status: RequestStatus::default(),
            recommendations: Vec::new(),
            last_auto_fill: None,
            auto_fill_seq: 0,
            recommend_seq: 0,
            outcome_tx,
            outcome_rx,
            tasks: JoinSet::new(),
            initialized: false,
            torn_down: false,
        }
    }

    /// On-create hook: kicks off the initial auto-fill without waiting for it.
    /// Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.initialized || self.torn_down {
            return;
        }
        self.initialized = true;
        self.auto_fill();
    }

    pub fn auto_fill(&mut self) {
        if self.torn_down {
            return;
        }
        self.auto_fill_seq += 1;
        let seq = self.auto_fill_seq;
        self.begin(Operation::AutoFill, seq);

        let source = Arc::clone(&self.auto_data);
        let coordinate = self.coordinate.clone();
        let tx = self.outcome_tx.clone();
        self.tasks.spawn(async move {
            let result = contain_panic(
                Operation::AutoFill,
                async move { source.fetch_snapshot(&coordinate).await },
            )
            .await;
            // Receiver is gone only after teardown.
            let _ = tx.send(Outcome::AutoFill { seq, result });
        });
    }

    pub fn get_recommendations(&mut self) {
        if self.torn_down {
            return;
        }
        self.recommend_seq += 1;
        let seq = self.recommend_seq;
        self.begin(Operation::Recommend, seq);

        let request = self.build_request();
        let source = Arc::clone(&self.recommender);
        let tx = self.outcome_tx.clone();
        self.tasks.spawn(async move {
            let result = contain_panic(
                Operation::Recommend,
                async move { source.recommend(&request).await },
            )
            .await;
            let _ = tx.send(Outcome::Recommend { seq, result });
        });
    }

    fn begin(&mut self, op: Operation, seq: u64) {
        tracing::debug!(operation = op.as_str(), seq, "request started");
        self.status.set_busy(op, true);
        self.status.warning = None;
    }

    pub fn build_request(&self) -> RecommendationRequest {
        RecommendationRequest {
            location: self.coordinate.as_location(),
            soil: self.soil,
            weather: self.weather,
            previous_crops: self.rotation_history(),
            market: self.market,
            preferred_language: self.language.clone(),
        }
    }

    /// Applies every outcome that has already arrived. Never blocks.
    pub fn poll_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        while self.tasks.try_join_next().is_some() {}
        applied
    }

    /// Waits for the next outcome and applies it. Returns false once the
    /// controller has been torn down.
    pub async fn next_outcome(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        match self.outcome_rx.recv().await {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Applies outcomes until no operation is in flight.
    pub async fn settle(&mut self) {
        while self.status.in_flight() {
            if !self.next_outcome().await {
                break;
            }
        }
        while self.tasks.try_join_next().is_some() {}
    }

    pub fn apply_outcome(&mut self, outcome: Outcome) {
        let op = outcome.operation();
        let seq = outcome.seq();

        if self.torn_down {
            tracing::debug!(operation = op.as_str(), seq, "dropping outcome after teardown");
            return;
        }

        let latest = match op {
            Operation::AutoFill => self.auto_fill_seq,
            Operation::Recommend => self.recommend_seq,
        };
        if seq != latest {
            tracing::debug!(
                operation = op.as_str(),
                seq,
                latest,
                "discarding stale outcome"
            );
            return;
        }

        match outcome {
            Outcome::AutoFill { result, .. } => match result {
                Ok(snapshot) => self.merge_snapshot(snapshot),
                Err(e) => self.fail(op, &e),
            },
            Outcome::Recommend { result, .. } => match result {
                Ok(response) => {
                    self.recommendations = response.into_list();
                    tracing::debug!(count = self.recommendations.len(), "recommendations replaced");
                }
                Err(e) => self.fail(op, &e),
            },
        }

        self.status.set_busy(op, false);
    }

    /// Section-level merge: a present section replaces the local profile
    /// wholesale, an absent one leaves it alone.
    fn merge_snapshot(&mut self, snapshot: AutoDataSnapshot) {
        if snapshot.is_empty() {
            tracing::debug!("auto-data returned no sections");
        }
        if let Some(soil) = snapshot.soil {
            self.soil = soil;
        }
        if let Some(weather) = snapshot.weather {
            self.weather = weather;
        }
        if let Some(market) = snapshot.market {
            self.market = market;
        }
        self.last_auto_fill = Some(Local::now());
    }

    fn fail(&mut self, op: Operation, error: &CropwiseError) {
        tracing::warn!(operation = op.as_str(), "request failed: {}", error);
        self.status.warning = Some(op.warning().to_string());
    }

    /// Stops in-flight work and detaches state from any late completion.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.tasks.abort_all();
        self.outcome_rx.close();
        self.status.auto_fill_in_flight = false;
        self.status.recommend_in_flight = false;
        tracing::debug!("form controller torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Applies typed user input to a field. Numeric fields keep their old
    /// value when the input does not parse.
    pub fn set_field(&mut self, field: FormField, input: &str) -> Result<()> {
        if field.is_numeric() {
            let value = parse_number(field, input)?;
            if matches!(field, FormField::DemandIndex | FormField::PriceIndex) {
                ensure_unit_interval(field.label(), value)?;
            }
            if let Some(slot) = self.numeric_slot(field) {
                *slot = value;
            }
            return Ok(());
        }

        match field {
            FormField::Latitude => self.coordinate.latitude = input.to_string(),
            FormField::Longitude => self.coordinate.longitude = input.to_string(),
            FormField::RotationHistory => self.rotation_text = input.to_string(),
            _ => {}
        }
        Ok(())
    }

    fn numeric_slot(&mut self, field: FormField) -> Option<&mut f64> {
        match field {
            FormField::Ph => Some(&mut self.soil.ph),
            FormField::Moisture => Some(&mut self.soil.moisture),
            FormField::Nitrogen => Some(&mut self.soil.nitrogen),
            FormField::Phosphorus => Some(&mut self.soil.phosphorus),
            FormField::Potassium => Some(&mut self.soil.potassium),
            FormField::Rainfall => Some(&mut self.weather.rainfall_mm),
            FormField::Temperature => Some(&mut self.weather.temperature_c),
            FormField::DemandIndex => Some(&mut self.market.demand_index),
            FormField::PriceIndex => Some(&mut self.market.price_index),
            FormField::Latitude | FormField::Longitude | FormField::RotationHistory => None,
        }
    }

    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::Latitude => self.coordinate.latitude.clone(),
            FormField::Longitude => self.coordinate.longitude.clone(),
            FormField::Ph => self.soil.ph.to_string(),
            FormField::Moisture => self.soil.moisture.to_string(),
            FormField::Nitrogen => self.soil.nitrogen.to_string(),
            FormField::Phosphorus => self.soil.phosphorus.to_string(),
            FormField::Potassium => self.soil.potassium.to_string(),
            FormField::Rainfall => self.weather.rainfall_mm.to_string(),
            FormField::Temperature => self.weather.temperature_c.to_string(),
            FormField::DemandIndex => self.market.demand_index.to_string(),
            FormField::PriceIndex => self.market.price_index.to_string(),
            FormField::RotationHistory => self.rotation_text.clone(),
        }
    }

    /// Derived on every call so it can never drift from the raw text.
    pub fn rotation_history(&self) -> Vec<String> {
        parse_rotation(&self.rotation_text)
    }

    pub fn view(&self) -> FormView<'_> {
        FormView {
            loading: self.status.in_flight(),
            auto_filling: self.status.auto_fill_in_flight,
            recommending: self.status.recommend_in_flight,
            warning: self.status.warning.as_deref(),
            recommendations: &self.recommendations,
            rotation_history: self.rotation_history(),
            last_auto_fill: self.last_auto_fill,
        }
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn soil(&self) -> &SoilProfile {
        &self.soil
    }

    pub fn weather(&self) -> &WeatherProfile {
        &self.weather
    }

    pub fn market(&self) -> &MarketProfile {
        &self.market
    }

    pub fn rotation_text(&self) -> &str {
        &self.rotation_text
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// A panicking source still has to report back, or its busy flag never clears.
async fn contain_panic<T>(op: Operation, call: impl Future<Output = Result<T>>) -> Result<T> {
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(operation = op.as_str(), "data source panicked");
            Err(CropwiseError::DataSourceUnavailable(format!(
                "{} source panicked",
                op.as_str()
            )))
        }
    }
}

fn parse_number(field: FormField, input: &str) -> Result<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CropwiseError::InvalidData(format!(
            "{} must be a number, got '{}'",
            field.label(),
            input
        ))),
    }
}
