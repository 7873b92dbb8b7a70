use caption_core::{AppConfig, CaptionEntry, ConfigError, CoreError, RecommendError};
use caption_recommender::Catalog;
use std::collections::HashSet;
use std::io::Write;

fn synthetic_catalog() -> Catalog {
    let mut entries: Vec<CaptionEntry> = (1..=8)
        .map(|i| CaptionEntry::new(format!("Chill evening number {i} by the lake"), "chill"))
        .collect();
    entries.push(CaptionEntry::new("Brunch with the crew", "relatable"));
    entries.push(CaptionEntry::new("Monday again, send coffee", "relatable"));
    entries.push(CaptionEntry::new("Mountains before meetings", "adventurous"));
    Catalog::new(entries).unwrap()
}

#[test]
fn test_self_similarity_on_bundled_catalog() {
    let catalog = Catalog::bundled().unwrap();
    let ranked = catalog.recommend("Good vibes only", "happy", 1).unwrap();
    assert_eq!(ranked, vec!["Good vibes only 🌈".to_string()]);
}

#[test]
fn test_unknown_mood_yields_no_candidates() {
    let catalog = Catalog::bundled().unwrap();
    assert!(catalog.filter_by_mood("melancholy").is_empty());
    assert_eq!(
        catalog.recommend("rainy days", "melancholy", 3),
        Err(RecommendError::NoCandidates {
            mood: "melancholy".to_string()
        })
    );
}

#[test]
fn test_blank_input_rejected_for_any_mood() {
    let catalog = Catalog::bundled().unwrap();
    for mood in ["happy", "chill", "does-not-exist", ""] {
        assert_eq!(catalog.recommend("", mood, 3), Err(RecommendError::InvalidInput));
        assert_eq!(catalog.recommend(" \n ", mood, 3), Err(RecommendError::InvalidInput));
    }
}

#[test]
fn test_results_stay_within_mood_and_bound() {
    let catalog = Catalog::bundled().unwrap();
    for mood in catalog.moods() {
        let pool: HashSet<&str> = catalog.filter_by_mood(&mood).into_iter().collect();
        for top_n in [1, 3, 5, 50] {
            let ranked = catalog.recommend("sunshine and coffee vibes", &mood, top_n).unwrap();
            assert!(ranked.len() <= top_n.min(pool.len()));
            assert!(ranked.iter().all(|text| pool.contains(text.as_str())));
        }
    }
}

#[test]
fn test_repeated_calls_agree() {
    let catalog = Catalog::bundled().unwrap();
    let first = catalog.recommend_scored("late nights in the city", "dreamy", 5).unwrap();
    for _ in 0..5 {
        assert_eq!(
            catalog.recommend_scored("late nights in the city", "dreamy", 5).unwrap(),
            first
        );
    }
}

#[test]
fn test_eight_chill_entries_top_three() {
    let catalog = synthetic_catalog();
    let ranked = catalog.recommend("lazy evening by the water", "chill", 3).unwrap();
    assert_eq!(ranked.len(), 3);
    let distinct: HashSet<&String> = ranked.iter().collect();
    assert_eq!(distinct.len(), 3);
    assert!(ranked.iter().all(|text| text.starts_with("Chill evening")));
}

#[test]
fn test_top_n_beyond_pool_returns_whole_pool() {
    let catalog = synthetic_catalog();
    let ranked = catalog.recommend("coffee", "relatable", 100).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0], "Monday again, send coffee");
    assert_eq!(ranked[1], "Brunch with the crew");
}

#[test]
fn test_ties_keep_catalog_order() {
    let catalog = synthetic_catalog();
    // No overlap with any chill caption: every score is zero.
    let scored = catalog.recommend_scored("skateboard", "chill", 8).unwrap();
    assert!(scored.iter().all(|(_, score)| *score == 0.0));
    let expected: Vec<&str> = catalog.filter_by_mood("chill");
    let actual: Vec<&str> = scored.iter().map(|(text, _)| text.as_str()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_scores_descend() {
    let catalog = Catalog::bundled().unwrap();
    let scored = catalog.recommend_scored("beach sunsets", "chill", 6).unwrap();
    assert!(scored.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn test_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[[captions]]
text = "Rainy window, warm tea"
mood = "cozy"

[[captions]]
text = "Blanket fort engineer"
mood = "cozy"
"#
    )
    .unwrap();

    let config = AppConfig {
        catalog_path: Some(file.path().to_path_buf()),
        ..AppConfig::default()
    };
    let catalog = Catalog::load(&config).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.moods(), vec!["cozy"]);
    assert_eq!(
        catalog.recommend("tea", "cozy", 1).unwrap(),
        vec!["Rainy window, warm tea".to_string()]
    );
}

#[test]
fn test_catalog_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, CoreError::Config(ConfigError::FileNotFound { .. })));

    let err = Catalog::from_toml_str("# nothing here\n").unwrap_err();
    assert!(matches!(err, CoreError::Config(ConfigError::ValidationFailed { .. })));

    let err = Catalog::from_toml_str("[[captions]]\ntext = 3").unwrap_err();
    assert!(matches!(err, CoreError::Config(ConfigError::Parse(_))));
}

#[test]
fn test_default_config_uses_bundled_catalog() {
    let catalog = Catalog::load(&AppConfig::default()).unwrap();
    assert_eq!(catalog.len(), Catalog::bundled().unwrap().len());
}

#[test]
fn test_equal_nonzero_scores_keep_catalog_order() {
    let catalog = Catalog::new(vec![
        CaptionEntry::new("Sunday brunch at noon", "lazy"),
        CaptionEntry::new("Rainy window, coffee day", "lazy"),
        CaptionEntry::new("Coffee day, rainy window", "lazy"),
    ])
    .unwrap();
    let scored = catalog.recommend_scored("coffee", "lazy", 3).unwrap();
    assert!(scored[0].1 > 0.0);
    assert_eq!(scored[0].1, scored[1].1);
    assert_eq!(scored[0].0, "Rainy window, coffee day");
    assert_eq!(scored[1].0, "Coffee day, rainy window");
    assert_eq!(scored[2].0, "Sunday brunch at noon");
}
