// tests/scoring_properties.rs
use game_trends_bot::scoring::{score_games, top_by_genre, top_by_mechanic, ScoringConfig};
use game_trends_bot::{GameSnapshot, Genre, Mechanic, Metric, ScoringWeights};

fn weights(pairs: &[(Metric, f64)]) -> ScoringConfig {
    ScoringConfig::new(ScoringWeights::from_pairs(pairs.iter().copied()))
}

fn titles(scored: &[game_trends_bot::ScoredGame]) -> Vec<&str> {
    scored.iter().map(|g| g.title.as_str()).collect()
}

#[test]
fn weighted_sum_two_records() {
    let cfg = weights(&[(Metric::TwitchViewers, 0.6), (Metric::CriticScore, 0.4)]);
    let batch = vec![
        GameSnapshot::new("R1")
            .with_metric(Metric::TwitchViewers, 100.0)
            .with_metric(Metric::CriticScore, 80.0),
        GameSnapshot::new("R2")
            .with_metric(Metric::TwitchViewers, 50.0)
            .with_metric(Metric::CriticScore, 100.0),
    ];
    let out = score_games(&batch, &cfg);

    assert_eq!(titles(&out), vec!["R1", "R2"]);
    assert_eq!(out[0].popularity_score, 0.92);
    assert_eq!(out[0].components[&Metric::TwitchViewers], 1.0);
    assert_eq!(out[0].components[&Metric::CriticScore], 0.8);
    assert_eq!(out[1].popularity_score, 0.4);
    assert_eq!(out[1].components[&Metric::TwitchViewers], 0.0);
}

#[test]
fn ties_keep_input_order() {
    let cfg = weights(&[(Metric::CriticScore, 1.0)]);
    let batch: Vec<_> = [("A", 50.0), ("B", 70.0), ("C", 50.0), ("D", 90.0)]
        .into_iter()
        .map(|(t, s)| GameSnapshot::new(t).with_metric(Metric::CriticScore, s))
        .collect();
    let out = score_games(&batch, &cfg);
    assert_eq!(titles(&out), vec!["D", "B", "A", "C"]);
    let scores: Vec<f64> = out.iter().map(|g| g.popularity_score).collect();
    assert_eq!(scores, vec![0.9, 0.7, 0.5, 0.5]);
}

#[test]
fn missing_metric_is_zero_regardless_of_others() {
    let cfg = weights(&[(Metric::ActivePlayers, 1.0)]);
    let batch = vec![
        GameSnapshot::new("has").with_metric(Metric::ActivePlayers, 1_000_000.0),
        GameSnapshot::new("lacks"),
        GameSnapshot::new("small").with_metric(Metric::ActivePlayers, 10.0),
    ];
    let out = score_games(&batch, &cfg);
    let lacks = out.iter().find(|g| g.title == "lacks").unwrap();
    assert_eq!(lacks.components[&Metric::ActivePlayers], 0.0);
    assert_eq!(lacks.popularity_score, 0.0);
}

#[test]
fn degenerate_open_range_is_zero() {
    let cfg = weights(&[(Metric::TwitchViewers, 1.0)]);
    let batch: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|t| GameSnapshot::new(t).with_metric(Metric::TwitchViewers, 5000.0))
        .collect();
    for g in score_games(&batch, &cfg) {
        assert_eq!(g.components[&Metric::TwitchViewers], 0.0);
    }

    // A single record with the metric is degenerate too.
    let single = vec![
        GameSnapshot::new("only").with_metric(Metric::TwitchViewers, 10.0),
        GameSnapshot::new("none"),
    ];
    for g in score_games(&single, &cfg) {
        assert_eq!(g.components[&Metric::TwitchViewers], 0.0);
    }
}

#[test]
fn components_stay_in_unit_range() {
    let cfg = ScoringConfig::default();
    let batch = vec![
        GameSnapshot::new("over")
            .with_metric(Metric::CriticScore, 140.0)
            .with_metric(Metric::UserScore, -20.0)
            .with_metric(Metric::GoogleTrendsScore, 100.0)
            .with_metric(Metric::ActivePlayers, 9.0e9),
        GameSnapshot::new("under")
            .with_metric(Metric::CriticScore, 0.0)
            .with_metric(Metric::ActivePlayers, 0.0)
            .with_metric(Metric::YoutubeViewsDaily, 12.0),
        GameSnapshot::new("mid").with_metric(Metric::ActivePlayers, 4.5e9),
    ];
    let out = score_games(&batch, &cfg);
    for g in &out {
        for (m, c) in &g.components {
            assert!((0.0..=1.0).contains(c), "{} {m}: {c}", g.title);
        }
        assert!((0.0..=1.0).contains(&g.popularity_score));
    }
    let over = out.iter().find(|g| g.title == "over").unwrap();
    assert_eq!(over.components[&Metric::CriticScore], 1.0);
    assert_eq!(over.components[&Metric::UserScore], 0.0);
    let mid = out.iter().find(|g| g.title == "mid").unwrap();
    assert_eq!(mid.components[&Metric::ActivePlayers], 0.5);
}

#[test]
fn scoring_is_deterministic() {
    let cfg = ScoringConfig::default();
    let batch = vec![
        GameSnapshot::new("x")
            .with_metric(Metric::TwitchViewers, 123.0)
            .with_metric(Metric::EsportsViewers, 7.0),
        GameSnapshot::new("y")
            .with_metric(Metric::TwitchViewers, 456.0)
            .with_metric(Metric::SalesOrRevenueIndex, 33.3),
        GameSnapshot::new("z").with_metric(Metric::EsportsViewers, 70.0),
    ];
    let a = score_games(&batch, &cfg);
    let b = score_games(&batch, &cfg);
    assert_eq!(a, b);
}

#[test]
fn same_game_scores_differently_across_batches() {
    let cfg = weights(&[(Metric::TwitchViewers, 1.0)]);
    let game = GameSnapshot::new("G").with_metric(Metric::TwitchViewers, 500.0);
    let small = vec![
        game.clone(),
        GameSnapshot::new("low").with_metric(Metric::TwitchViewers, 0.0),
    ];
    let big = vec![
        game,
        GameSnapshot::new("low").with_metric(Metric::TwitchViewers, 0.0),
        GameSnapshot::new("high").with_metric(Metric::TwitchViewers, 1000.0),
    ];
    let in_small = score_games(&small, &cfg);
    let in_big = score_games(&big, &cfg);
    let score = |v: &[game_trends_bot::ScoredGame]| {
        v.iter().find(|g| g.title == "G").unwrap().popularity_score
    };
    assert_eq!(score(&in_small), 1.0);
    assert_eq!(score(&in_big), 0.5);
}

#[test]
fn slices_keep_ranking_order() {
    let cfg = weights(&[(Metric::CriticScore, 1.0)]);
    let batch = vec![
        GameSnapshot::new("a")
            .with_metric(Metric::CriticScore, 10.0)
            .with_genres([Genre::Shooter])
            .with_mechanics([Mechanic::Coop]),
        GameSnapshot::new("b")
            .with_metric(Metric::CriticScore, 90.0)
            .with_genres([Genre::Rpg]),
        GameSnapshot::new("c")
            .with_metric(Metric::CriticScore, 60.0)
            .with_genres([Genre::Shooter, Genre::BattleRoyale])
            .with_mechanics([Mechanic::Coop, Mechanic::Shooter]),
        GameSnapshot::new("d")
            .with_metric(Metric::CriticScore, 80.0)
            .with_genres([Genre::Shooter]),
    ];
    let scored = score_games(&batch, &cfg);
    assert_eq!(titles(&scored), vec!["b", "d", "c", "a"]);

    let shooters: Vec<&str> = top_by_genre(&scored, Genre::Shooter, 10)
        .iter()
        .map(|g| g.title.as_str())
        .collect();
    assert_eq!(shooters, vec!["d", "c", "a"]);

    let top2 = top_by_genre(&scored, Genre::Shooter, 2);
    assert_eq!(top2.len(), 2);
    assert_eq!(top2[1].title, "c");

    let coop: Vec<&str> = top_by_mechanic(&scored, Mechanic::Coop, 10)
        .iter()
        .map(|g| g.title.as_str())
        .collect();
    assert_eq!(coop, vec!["c", "a"]);
    assert!(top_by_genre(&scored, Genre::Horror, 5).is_empty());
}
