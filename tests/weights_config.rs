// tests/weights_config.rs
use std::fs;

use game_trends_bot::config::load_weights_from;
use game_trends_bot::scoring::score_games;
use game_trends_bot::{GameSnapshot, Metric, ScoringConfig, ScoringWeights};

#[test]
fn shipped_weights_file_matches_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/weights.toml");
    let w = load_weights_from(&path).unwrap();
    assert_eq!(w, ScoringWeights::default());
    assert!(w.is_unit_bounded());
}

#[test]
fn loaded_weights_drive_scoring() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("weights.json");
    fs::write(&p, r#"{ "user_score": 0.5, "esports_viewers": 0.5 }"#).unwrap();
    let cfg = ScoringConfig::new(load_weights_from(&p).unwrap());

    let batch = vec![
        GameSnapshot::new("a")
            .with_metric(Metric::UserScore, 90.0)
            .with_metric(Metric::TwitchViewers, 1_000_000.0),
        GameSnapshot::new("b")
            .with_metric(Metric::UserScore, 40.0)
            .with_metric(Metric::EsportsViewers, 5000.0),
        GameSnapshot::new("c").with_metric(Metric::EsportsViewers, 1000.0),
    ];
    let out = score_games(&batch, &cfg);
    // Only configured metrics take part.
    assert!(out.iter().all(|g| g.components.len() == 2));
    assert_eq!(out[0].title, "b");
    assert_eq!(out[0].popularity_score, 0.7);
    assert_eq!(out[1].title, "a");
    assert_eq!(out[1].popularity_score, 0.45);
}

#[test]
fn malformed_files_fail_loudly() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("weights.toml");
    fs::write(&p, "twitch_viewers = \"lots\"").unwrap();
    assert!(load_weights_from(&p).is_err());

    fs::write(&p, "popularity = 1.0").unwrap();
    let err = load_weights_from(&p).unwrap_err();
    assert!(format!("{err:#}").contains("weights.toml"));

    assert!(load_weights_from(&tmp.path().join("absent.toml")).is_err());
}
