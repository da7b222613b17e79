//! Message to reading: parse, geocode, convert time, compute, assemble,
//! interpret.
//!
//! A `Pipeline` holds only shared read-only handles, so one instance serves
//! any number of concurrent requests.

use std::sync::Arc;

use crate::chart::NatalChart;
use crate::ephemeris::{EphemerisProvider, GeoCoordinate};
use crate::error::ChartError;
use crate::geocode::Geocoder;
use crate::input::{parse_message, BirthInput, Message};
use crate::interpret::{build_prompt, DisabledInterpreter, InterpretationError, Interpreter};
use crate::time::{FixedZone, JulianDay};

/// Result of handling one message
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Greeting,
    Reading {
        chart: NatalChart,
        interpretation: Result<String, InterpretationError>,
    },
    Rejected(ChartError),
}

#[derive(Clone)]
pub struct Pipeline {
    ephemeris: Arc<dyn EphemerisProvider>,
    geocoder: Arc<dyn Geocoder>,
    interpreter: Arc<dyn Interpreter>,
    zone: FixedZone,
}

impl Pipeline {
    /// Pipeline with the default zone and no interpreter.
    pub fn new(ephemeris: Arc<dyn EphemerisProvider>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            ephemeris,
            geocoder,
            interpreter: Arc::new(DisabledInterpreter),
            zone: FixedZone::default(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: Arc<dyn Interpreter>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_zone(mut self, zone: FixedZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn zone(&self) -> &FixedZone {
        &self.zone
    }

    /// Chart for birth data at a known location. Synchronous and pure given the
    /// loaded ephemeris.
    pub fn compute_natal_chart(
        &self,
        input: &BirthInput,
        location: GeoCoordinate,
    ) -> Result<NatalChart, ChartError> {
        location.validate()?;
        let utc = self.zone.to_utc(input.date, input.time)?;
        let moment = JulianDay::from_datetime(utc);
        log::debug!(
            "{} {} ({}) -> {} UTC -> JD {:.6}",
            input.date,
            input.time,
            self.zone.label(),
            utc,
            moment.value()
        );
        let raw = self.ephemeris.calc_positions(moment, &location)?;
        NatalChart::assemble(raw, moment, location)
    }

    /// Geocode the birth place, then compute the chart.
    pub async fn compute_chart(&self, input: &BirthInput) -> Result<NatalChart, ChartError> {
        let location = self
            .geocoder
            .locate(&input.locality, &input.region)
            .await?;
        log::info!(
            "Geocoded {}, {} via {}: lat={:.4}, lon={:.4}",
            input.locality,
            input.region,
            self.geocoder.name(),
            location.latitude,
            location.longitude
        );
        self.compute_natal_chart(input, location)
    }

    /// Compute and interpret. Interpretation failure keeps the chart.
    pub async fn reading(&self, input: &BirthInput) -> Outcome {
        let chart = match self.compute_chart(input).await {
            Ok(chart) => chart,
            Err(err) => return self.reject(err),
        };
        log::info!("Chart computed ({} points)", chart.len());
        log::debug!("Interpretation prompt:\n{}", build_prompt(&chart));

        let interpretation = self.interpreter.interpret(&chart).await;
        match &interpretation {
            Ok(_) => log::info!("Interpretation generated by {}", self.interpreter.name()),
            Err(err) => log::warn!("Interpretation unavailable: {err}"),
        }
        Outcome::Reading {
            chart,
            interpretation,
        }
    }

    /// Full handling of one incoming message.
    pub async fn handle_message(&self, text: &str) -> Outcome {
        log::info!("Received message: {}", text.trim());
        match parse_message(text) {
            Ok(Message::Greeting) => Outcome::Greeting,
            Ok(Message::Birth(input)) => self.reading(&input).await,
            Err(err) => self.reject(err),
        }
    }

    fn reject(&self, err: ChartError) -> Outcome {
        if err.is_user_correctable() {
            log::warn!("Rejected request: {err}");
        } else {
            log::error!("Request failed: {err}");
        }
        Outcome::Rejected(err)
    }
}
