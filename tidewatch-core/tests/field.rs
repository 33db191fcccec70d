//! Multi-source field estimation with a seeded RNG. Assertions are ranges,
//! never exact values, because every source contribution is jittered.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tidewatch_core::{
    field::{
        estimator::{source_influence, BACKGROUND_LABEL},
        scan::{scan_grid, GridBounds, MAX_SCAN_CELLS},
        FieldEstimatorBuilder,
    },
    geo::haversine_distance_m,
    TidewatchError,
};
use tidewatch_schemas::{
    environment::GeoPoint,
    scenario::TimeSlot,
    source::{ConcentrationLevel, PointSource},
    zone::{PollutionZone, ZoneLevels},
};

fn station(id: &str, name: &str, at: GeoPoint, base: f64, level: ConcentrationLevel) -> PointSource {
    PointSource {
        source_id: id.to_string(),
        name: name.to_string(),
        location: at,
        sea_outlet: None,
        base_concentration: base,
        level,
        temporal_multiplier: 1.0,
        pollutants: vec![],
    }
}

fn toulon_stations() -> Vec<PointSource> {
    vec![
        station(
            "cap-sicie",
            "Station CAP SICIÉ - AMPHITRIA",
            GeoPoint::new(43.0488707588, 5.850754425619892),
            0.8,
            ConcentrationLevel::Low,
        ),
        station(
            "la-garde",
            "Station LA GARDE PONT DE LA CLUE",
            GeoPoint::new(43.088933513, 5.986681139241),
            3.2,
            ConcentrationLevel::Medium,
        ),
        station(
            "almanarre",
            "Station ALMANARRE",
            GeoPoint::new(43.078633267379644, 6.1002445220947275),
            3.1,
            ConcentrationLevel::High,
        ),
    ]
}

fn december() -> TimeSlot {
    TimeSlot {
        slot_id: "2024-12".to_string(),
        label: "Décembre 2024".to_string(),
        multiplier: 1.6,
        wind_direction_deg: 225.0,
        wind_speed: 22.0,
        concentration_level: ConcentrationLevel::High,
    }
}

#[test]
fn test_jitter_stays_within_natural_variation() {
    let estimator = FieldEstimatorBuilder::new()
        .with_sources(toulon_stations())
        .with_time_slot(december())
        .build()
        .unwrap();
    let query = GeoPoint::new(43.09, 5.99);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..200 {
        let field = estimator.predict_at(query, &mut rng);
        for source in estimator.sources() {
            let distance = haversine_distance_m(query, source.effective_location());
            let expected = source_influence(source.base_influence(), distance, 22.0);
            if let Some(found) = field.influences.iter().find(|i| i.source == source.name) {
                assert!(found.influence >= expected * 0.85 - 1e-12);
                assert!(found.influence <= expected * 1.15 + 1e-12);
                assert!(found.influence > expected * 0.8 && found.influence < expected * 1.2);
                assert_eq!(found.distance_m, distance.round());
                assert_eq!(found.level, source.level);
            }
        }
    }
}

#[test]
fn test_total_is_influences_plus_background() {
    let estimator = FieldEstimatorBuilder::new()
        .with_sources(toulon_stations())
        .build()
        .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let field = estimator.predict_at(GeoPoint::new(43.08, 5.95), &mut rng);

    assert!(field.influences.iter().all(|i| i.source != BACKGROUND_LABEL));
    let sum: f64 = field.influences.iter().map(|i| i.influence).sum();
    let background = field.total_concentration - sum;
    assert!(background >= 0.001 - 1e-12 && background <= 0.003 + 1e-12, "background {}", background);
}

#[test]
fn test_influences_sorted_descending() {
    let estimator = FieldEstimatorBuilder::new()
        .with_sources(toulon_stations())
        .build()
        .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let field = estimator.predict_at(GeoPoint::new(43.07, 5.97), &mut rng);
    assert!(field.influences.len() >= 2);
    for pair in field.influences.windows(2) {
        assert!(pair[0].influence >= pair[1].influence);
    }
    assert_eq!(field.dominant_source(), Some(field.influences[0].source.as_str()));
}

#[test]
fn test_distant_source_is_cut_off() {
    let far = station(
        "marseille",
        "Far outfall",
        GeoPoint::new(43.30, 5.37),
        50.0,
        ConcentrationLevel::High,
    );
    let query = GeoPoint::new(43.1167, 5.9289);
    assert!(haversine_distance_m(query, far.location) > 15_000.0);

    let estimator = FieldEstimatorBuilder::new().with_sources(vec![far]).build().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let field = estimator.predict_at(query, &mut rng);

    assert_eq!(field.influences.len(), 1);
    let background = &field.influences[0];
    assert_eq!(background.source, BACKGROUND_LABEL);
    assert_eq!(background.level, ConcentrationLevel::Natural);
    assert_eq!(background.contribution, 100.0);
    assert_eq!(background.distance_m, 0.0);
    assert_eq!(background.influence, field.total_concentration);
    assert!(field.total_concentration >= 0.001 && field.total_concentration <= 0.003);
}

#[test]
fn test_no_sources_falls_back_to_background() {
    let estimator = FieldEstimatorBuilder::new()
        .with_background_range(0.002, 0.002)
        .build()
        .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let field = estimator.predict_at(GeoPoint::new(43.0, 6.0), &mut rng);
    assert_eq!(field.influences.len(), 1);
    assert!((field.total_concentration - 0.002).abs() < 1e-15);
}

#[test]
fn test_river_routed_source_uses_sea_outlet() {
    let mut gapeau = station(
        "gapeau",
        "Station LA CRAU VALLEE DU GAPEAU",
        GeoPoint::new(43.14518403433659, 6.0921143363889385),
        1.9,
        ConcentrationLevel::Medium,
    );
    gapeau.sea_outlet = Some(GeoPoint::new(43.0989, 6.1534));
    let estimator = FieldEstimatorBuilder::new().with_sources(vec![gapeau]).build().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let at_mouth = estimator.predict_at(GeoPoint::new(43.0989, 6.1534), &mut rng);
    assert_eq!(at_mouth.influences[0].distance_m, 0.0);
    // 1.9 * 1.1 * 1.2 at the outlet, jittered
    let expected = 1.9 * 1.1 * 1.2;
    let got = at_mouth.influences[0].influence;
    assert!(got > expected * 0.8 && got < expected * 1.2);
}

#[test]
fn test_time_slot_scales_contribution() {
    let query = GeoPoint::new(43.0488707588, 5.850754425619892);
    let sicie = vec![toulon_stations().remove(0)];
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let january = TimeSlot {
        slot_id: "2024-01".to_string(),
        label: "Janvier 2024".to_string(),
        multiplier: 0.3,
        wind_direction_deg: 45.0,
        wind_speed: 15.0,
        concentration_level: ConcentrationLevel::Low,
    };
    let low = FieldEstimatorBuilder::new()
        .with_sources(sicie.clone())
        .with_time_slot(january)
        .build()
        .unwrap()
        .predict_at(query, &mut rng);
    let high = FieldEstimatorBuilder::new()
        .with_sources(sicie)
        .with_time_slot(december())
        .build()
        .unwrap()
        .predict_at(query, &mut rng);

    // contribution is relative to the scaled base: 1.1 * 1.2 * wind effect, jittered
    for field in [&low, &high] {
        let c = field.influences[0].contribution;
        assert!(c >= 132.0 * 0.85, "contribution {}", c);
        assert!(c <= 132.0 * (1.0 + 22.0 / 150.0) * 1.15, "contribution {}", c);
    }
    assert!(high.influences[0].influence > low.influences[0].influence * 3.0);
}

#[test]
fn test_zone_contribution_is_deterministic() {
    let arsenal = PollutionZone {
        zone_id: "port-militaire".to_string(),
        name: "Arsenal de Toulon".to_string(),
        center: GeoPoint::new(43.1167, 5.9289),
        radius_m: 2000.0,
        levels: ZoneLevels { low: 2.1, medium: 3.8, high: 4.5 },
    };
    let estimator = FieldEstimatorBuilder::new()
        .with_zones(vec![arsenal])
        .with_zone_level(ConcentrationLevel::High)
        .build()
        .unwrap();

    let mut a = ChaCha8Rng::seed_from_u64(1);
    let mut b = ChaCha8Rng::seed_from_u64(2);
    let first = estimator.predict_at(GeoPoint::new(43.1167, 5.9289), &mut a);
    let second = estimator.predict_at(GeoPoint::new(43.1167, 5.9289), &mut b);

    assert_eq!(first.influences[0].source, "Arsenal de Toulon");
    assert_eq!(first.influences[0].influence, 4.5);
    assert_eq!(first.influences[0].contribution, 100.0);
    assert_eq!(first.influences[0].level, ConcentrationLevel::High);
    assert_eq!(first.influences, second.influences);
}

#[test]
fn test_same_seed_same_field() {
    let estimator = FieldEstimatorBuilder::new()
        .with_sources(toulon_stations())
        .with_time_slot(december())
        .build()
        .unwrap();
    let query = GeoPoint::new(43.08, 6.02);
    let first = estimator.predict_at(query, &mut ChaCha8Rng::seed_from_u64(2024));
    let second = estimator.predict_at(query, &mut ChaCha8Rng::seed_from_u64(2024));
    assert_eq!(first, second);
}

#[test]
fn test_scan_grid_is_row_major() {
    let estimator = FieldEstimatorBuilder::new()
        .with_sources(toulon_stations())
        .build()
        .unwrap();
    let bounds = GridBounds {
        south: 43.03,
        west: 5.83,
        north: 43.13,
        east: 6.13,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let cells = scan_grid(&estimator, &bounds, 3, 4, 1.0, &mut rng).unwrap();

    assert_eq!(cells.len(), 12);
    assert_eq!((cells[0].row, cells[0].col), (0, 0));
    assert_eq!((cells[5].row, cells[5].col), (1, 1));
    assert!(cells[0].lat < cells[11].lat && cells[0].lng < cells[11].lng);
    assert!(cells.iter().all(|c| c.total_concentration >= 0.001));
    assert!(cells.iter().all(|c| c.influence_count >= 1));

    assert!(scan_grid(&estimator, &bounds, 0, 4, 1.0, &mut rng).is_err());
    assert!(scan_grid(&estimator, &bounds, 3, 4, 0.0, &mut rng).is_err());
}

#[test]
fn test_scan_grid_rejects_oversized_grid() {
    let estimator = FieldEstimatorBuilder::new()
        .with_sources(toulon_stations())
        .build()
        .unwrap();
    let bounds = GridBounds {
        south: 43.03,
        west: 5.83,
        north: 43.13,
        east: 6.13,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    let overflowing = scan_grid(&estimator, &bounds, usize::MAX / 2, 3, 1.0, &mut rng);
    assert!(matches!(overflowing, Err(TidewatchError::ConfigError(_))));

    let too_many = scan_grid(&estimator, &bounds, MAX_SCAN_CELLS, 2, 1.0, &mut rng);
    assert!(matches!(too_many, Err(TidewatchError::ConfigError(_))));
}
