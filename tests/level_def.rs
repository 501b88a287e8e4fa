use fortune_dice::plugins::fortune::{build_pool, FortuneContent};
use fortune_dice::plugins::level::{load_content, load_level, parse_ron, LevelDef, LevelError};

#[test]
fn shipped_level_parses_to_defaults() {
    let level: LevelDef = parse_ron("dice_tray.ron", include_str!("../assets/levels/dice_tray.ron")).expect("level");
    let d = LevelDef::default();
    assert_eq!(level.roll.spawn_position, d.roll.spawn_position);
    assert_eq!(level.roll.horizontal_impulse, (1.8, 2.7));
    assert_eq!(level.tray.rim_segments, 64);
    assert_eq!(level.acoustics.cooldown_ms, 55.0);
    assert_eq!(level.camera.fov_degrees, 45.0);
    // Sections or fields left out of the file keep their defaults.
    assert_eq!(level.tray.ceiling_y, d.tray.ceiling_y);
    assert_eq!(level.acoustics.scrape_ratio, d.acoustics.scrape_ratio);
}

#[test]
fn shipped_content_builds_a_pool() {
    let content: FortuneContent =
        parse_ron("fortune.ron", include_str!("../assets/content/fortune.ron")).expect("content");
    assert_eq!(content.themes.len(), 6);
    let pool = build_pool(&content);
    assert_eq!(pool.len(), content.articles.len() + content.products.len() + 1 + content.themes.len());
}

#[test]
fn loaders_read_from_disk() {
    assert!(load_level().is_ok());
    assert!(!load_content().expect("content").articles.is_empty());
}

#[test]
fn partial_level_overrides_only_given_fields() {
    let level: LevelDef = parse_ron("inline", "(roll: (settle_duration: 0.5))").expect("partial");
    assert_eq!(level.roll.settle_duration, 0.5);
    assert_eq!(level.roll.settle_linear_speed, 0.12);
    assert_eq!(level.tray.scale, 2.2);
}

#[test]
fn malformed_level_is_a_parse_error() {
    let err = parse_ron::<LevelDef>("broken.ron", "(roll: (settle_duration: \"slow\"))").unwrap_err();
    assert!(matches!(err, LevelError::Parse { .. }));
    assert!(err.to_string().contains("broken.ron"));
}
