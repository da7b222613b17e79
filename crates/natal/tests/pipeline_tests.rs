use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use natal::ephemeris::houses::check_placidus_latitude;
use natal::ephemeris::{HousePositions, RawPositions};
use natal::reply::{self, reply_for};
use natal::{
    build_prompt, CelestialPosition, ChartError, ChartPoint, EphemerisProvider, FixedZone,
    GeoCoordinate, GeocodeError, Geocoder, HouseSystem, InputErrorKind, InterpretationError,
    Interpreter, JulianDay, NatalChart, Outcome, Pipeline,
};

/// Answers every request with the 1990-01-01 12:30 JST Tokyo chart and
/// records the moments it was asked for.
#[derive(Default)]
struct StubEphemeris {
    moments: Mutex<Vec<JulianDay>>,
}

impl EphemerisProvider for StubEphemeris {
    fn name(&self) -> &str {
        "stub"
    }

    fn calc_positions(
        &self,
        moment: JulianDay,
        location: &GeoCoordinate,
    ) -> Result<RawPositions, ChartError> {
        location.validate()?;
        check_placidus_latitude(location.latitude, moment)?;
        self.moments.lock().unwrap().push(moment);

        let bodies = [
            (ChartPoint::Sun, 280.46, 1.019),
            (ChartPoint::Moon, 328.51, 12.9),
            (ChartPoint::Mercury, 295.77, -0.225),
            (ChartPoint::Venus, 306.28, -0.116),
            (ChartPoint::Mars, 249.76, 0.69),
            (ChartPoint::Jupiter, 95.26, -0.135),
            (ChartPoint::Saturn, 285.57, 0.12),
            (ChartPoint::Uranus, 275.77, 0.06),
            (ChartPoint::Neptune, 282.03, 0.04),
            (ChartPoint::Pluto, 227.09, 0.03),
        ]
        .into_iter()
        .map(|(point, longitude, speed)| CelestialPosition {
            point,
            longitude,
            latitude: Some(0.0),
            speed: Some(speed),
        })
        .collect();
        let cusps = [
            34.64, 65.48, 88.92, 111.07, 136.38, 170.1, 214.64, 245.48, 268.92, 291.07, 316.38,
            350.1,
        ];
        Ok(RawPositions {
            bodies,
            houses: HousePositions {
                system: HouseSystem::Placidus,
                cusps,
                ascendant: cusps[0],
                midheaven: cusps[9],
            },
        })
    }
}

/// Knows exactly one place and counts lookups.
#[derive(Default)]
struct StubGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for StubGeocoder {
    fn name(&self) -> &str {
        "stub"
    }

    async fn locate(&self, locality: &str, region: &str) -> Result<GeoCoordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match (region, locality) {
            ("東京都", "港区") => Ok(GeoCoordinate::new(35.66, 139.75).unwrap()),
            _ => Err(GeocodeError::NotFound {
                region: region.to_string(),
                locality: locality.to_string(),
            }),
        }
    }
}

/// Records the prompt and answers with a canned reading or a failure.
struct StubInterpreter {
    answer: Result<String, InterpretationError>,
    prompts: Mutex<Vec<String>>,
}

impl StubInterpreter {
    fn new(answer: Result<String, InterpretationError>) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Interpreter for StubInterpreter {
    fn name(&self) -> &str {
        "stub"
    }

    async fn interpret(&self, chart: &NatalChart) -> Result<String, InterpretationError> {
        self.prompts.lock().unwrap().push(build_prompt(chart));
        self.answer.clone()
    }
}

fn pipeline(geocoder: Arc<StubGeocoder>) -> Pipeline {
    Pipeline::new(Arc::new(StubEphemeris::default()), geocoder)
}

#[tokio::test]
async fn test_scenario_tokyo_birth_message() {
    let geocoder = Arc::new(StubGeocoder::default());
    let outcome = pipeline(geocoder.clone())
        .handle_message("1990-01-01 12:30, 東京都, 港区")
        .await;

    let Outcome::Reading {
        chart,
        interpretation,
    } = &outcome
    else {
        panic!("expected a reading, got {outcome:?}");
    };
    assert_eq!(chart.len(), 12);
    for entry in chart.entries() {
        assert!((0.0..360.0).contains(&entry.longitude()), "{entry:?}");
    }
    assert_eq!(interpretation, &Err(InterpretationError::NotConfigured));
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_local_time_reaches_ephemeris_as_utc() {
    let ephemeris = Arc::new(StubEphemeris::default());
    let pipeline = Pipeline::new(ephemeris.clone(), Arc::new(StubGeocoder::default()));
    let outcome = pipeline.handle_message("1990-01-01 12:30, 東京都, 港区").await;
    assert!(matches!(outcome, Outcome::Reading { .. }));

    // 12:30 JST is 03:30 UTC
    let moments = ephemeris.moments.lock().unwrap();
    assert_eq!(moments.len(), 1);
    assert!((moments[0].value() - 2_447_892.645_833).abs() < 1e-5);
}

#[tokio::test]
async fn test_configured_zone_shifts_the_moment() {
    let ephemeris = Arc::new(StubEphemeris::default());
    let pipeline = Pipeline::new(ephemeris.clone(), Arc::new(StubGeocoder::default()))
        .with_zone(FixedZone::new("UTC", 0).unwrap());
    assert_eq!(pipeline.zone().label(), "UTC");
    assert_eq!(pipeline.zone().utc_offset_minutes(), 0);

    pipeline.handle_message("1990-01-01 12:30, 東京都, 港区").await;
    let moments = ephemeris.moments.lock().unwrap();
    assert!((moments[0].value() - 2_447_893.020_833).abs() < 1e-5);
}

#[tokio::test]
async fn test_scenario_wrong_shape() {
    let geocoder = Arc::new(StubGeocoder::default());
    let outcome = pipeline(geocoder.clone()).handle_message("hello").await;
    let Outcome::Rejected(err) = &outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(err.input_kind(), Some(InputErrorKind::WrongShape));
    assert_eq!(reply_for(&outcome), reply::WRONG_SHAPE_REPLY);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scenario_impossible_date() {
    let geocoder = Arc::new(StubGeocoder::default());
    let outcome = pipeline(geocoder.clone())
        .handle_message("1990-13-40 12:30, 東京都, 港区")
        .await;
    let Outcome::Rejected(err) = &outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(err.input_kind(), Some(InputErrorKind::InvalidDateTime));
    assert_eq!(reply_for(&outcome), reply::WRONG_DATE_TIME_REPLY);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scenario_place_not_found() {
    let geocoder = Arc::new(StubGeocoder::default());
    let outcome = pipeline(geocoder.clone())
        .handle_message("1990-01-01 12:30, 東京都, Nowhere")
        .await;
    assert_eq!(
        outcome,
        Outcome::Rejected(ChartError::GeocodeNotFound {
            region: "東京都".to_string(),
            locality: "Nowhere".to_string(),
        })
    );
    assert_eq!(reply_for(&outcome), reply::PLACE_NOT_FOUND_REPLY);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_greeting_gets_usage_reply() {
    let geocoder = Arc::new(StubGeocoder::default());
    let outcome = pipeline(geocoder).handle_message("こんにちは").await;
    assert_eq!(outcome, Outcome::Greeting);
    assert_eq!(reply_for(&outcome), reply::GREETING_REPLY);
}

#[tokio::test]
async fn test_interpretation_is_returned_with_chart() {
    let interpreter = Arc::new(StubInterpreter::new(Ok("情熱的な性格です。".to_string())));
    let pipeline = pipeline(Arc::new(StubGeocoder::default())).with_interpreter(interpreter.clone());
    let outcome = pipeline.handle_message("1990-01-01 12:30, 東京都, 港区").await;

    let reply = reply_for(&outcome);
    assert!(reply.starts_with("ホロスコープ診断結果です"));
    assert!(reply.contains("情熱的な性格です。"));

    let prompts = interpreter.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.starts_with("あなたは経験豊富な占星術師です。"));
    assert!(prompt.contains("- Sun: 山羊座 (280."));
    assert!(prompt.contains("- ASC: 牡牛座"));
    assert!(prompt.contains("- MC: 山羊座"));
    assert_eq!(prompt.lines().filter(|l| l.starts_with("- ")).count(), 12);
}

#[tokio::test]
async fn test_interpretation_failure_keeps_chart() {
    let interpreter = Arc::new(StubInterpreter::new(Err(InterpretationError::Timeout(60))));
    let pipeline = pipeline(Arc::new(StubGeocoder::default())).with_interpreter(interpreter);
    let outcome = pipeline.handle_message("1990-01-01 12:30, 東京都, 港区").await;

    let Outcome::Reading {
        chart,
        interpretation,
    } = &outcome
    else {
        panic!("expected a reading, got {outcome:?}");
    };
    assert_eq!(interpretation, &Err(InterpretationError::Timeout(60)));
    assert_eq!(chart.sign_of(ChartPoint::Sun).display_name(), "山羊座");

    let reply = reply_for(&outcome);
    assert!(reply.contains("Sun: 山羊座"));
    assert!(reply.contains("タイムアウト"));
}

#[tokio::test]
async fn test_polar_birthplace_gets_generic_reply() {
    let pipeline = pipeline(Arc::new(StubGeocoder::default()));
    let input = natal::parse_birth_input("1990-01-01 12:30, 北極, 北極点").unwrap();
    let err = pipeline
        .compute_natal_chart(&input, GeoCoordinate::new(89.0, 0.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, ChartError::CalculationError(_)));
    assert!(!err.is_user_correctable());
    assert_eq!(
        reply_for(&Outcome::Rejected(err)),
        reply::CALCULATION_FAILED_REPLY
    );
}

#[tokio::test]
async fn test_bundled_gazetteer_end_to_end() {
    let gazetteer = natal::Gazetteer::load(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../configs/gazetteer.toml"
    )))
    .unwrap();
    let pipeline = Pipeline::new(Arc::new(StubEphemeris::default()), Arc::new(gazetteer));

    let outcome = pipeline.handle_message("1990-01-01 12:30, 東京都, 港区").await;
    let Outcome::Reading { chart, .. } = &outcome else {
        panic!("expected a reading, got {outcome:?}");
    };
    assert!((chart.location().latitude - 35.6581).abs() < 1e-9);
    assert_eq!(chart.sign_of(ChartPoint::Ascendant).display_name(), "牡牛座");
}
