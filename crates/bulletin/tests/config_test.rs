//! Configuration layering and derived settings.

use bulletin::{BulletinConfig, CrawlStrategy, Dimensions, default_filter};
use std::io::Write;
use std::time::Duration;

fn override_file(contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_bundled_defaults() -> anyhow::Result<()> {
    let config = BulletinConfig::bundled()?;

    assert_eq!(config.oracle.research_model, "gemini-2.5-flash-lite");
    assert_eq!(config.oracle.limits.rpm, Some(15));
    assert_eq!(config.oracle.retry.max_retries, 5);
    assert_eq!(config.render.max_poll_rounds, 720);
    assert_eq!(config.render.heygen.avatar_id(), "Georgia_expressive_2024112701");
    assert_eq!(config.pipeline.num_stories, 4);
    assert!(config.pipeline.episode.is_none());
    Ok(())
}

#[test]
fn test_targets_carry_their_names() -> anyhow::Result<()> {
    let config = BulletinConfig::bundled()?;
    let targets = config.targets();

    assert!(!targets.is_empty());
    for target in &targets {
        assert!(config.targets.contains_key(target.name()));
        assert!(target.strategy().is_ok());
    }
    let village = targets
        .iter()
        .find(|t| t.name() == "village_of_mamaroneck")
        .expect("bundled target");
    assert_eq!(village.strategy()?, CrawlStrategy::FlatEventPage);
    Ok(())
}

#[test]
fn test_override_file_merges_with_defaults() -> anyhow::Result<()> {
    let file = override_file(
        r#"
[pipeline]
show_name = "Weekend Roundup"
episode = "Pilot"

[render.heygen]
width = 1920
height = 1080

[targets.harbor_market]
agent = "FlatEventPageAgent"
url = "https://harbor.example.org/market"
organization = "Harbor Market"
use_selenium = true
"#,
    )?;

    let config = BulletinConfig::from_file(file.path())?;

    assert_eq!(config.pipeline.show_name, "Weekend Roundup");
    assert_eq!(config.pipeline.intro_title, "Around Town with LMC");
    assert_eq!(config.render.heygen.voice_id(), "511ffd086a904ef593b608032004112c");
    let harbor = config
        .targets()
        .into_iter()
        .find(|t| t.name() == "harbor_market")
        .expect("override target");
    assert!(harbor.use_dynamic_render());
    assert!(config.targets.contains_key("larchmont_library"));

    let settings = config.pipeline_settings()?;
    assert_eq!(settings.show_name(), "Weekend Roundup");
    assert_eq!(settings.episode().as_deref(), Some("Pilot"));
    assert_eq!(settings.dimensions(), &Dimensions::new(1920, 1080));
    assert_eq!(settings.poll_interval(), &Duration::from_secs(10));
    Ok(())
}

#[test]
fn test_missing_explicit_file_fails() {
    let result = BulletinConfig::from_file("/nonexistent/bulletin-override.toml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_value_fails() -> anyhow::Result<()> {
    let file = override_file("[render]\nmax_poll_rounds = \"many\"\n")?;
    let err = BulletinConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse configuration"));
    Ok(())
}

#[test]
fn test_required_models_are_distinct() -> anyhow::Result<()> {
    let models = BulletinConfig::bundled()?.required_models();
    assert_eq!(
        models,
        vec![
            "gemini-2.5-flash".to_string(),
            "gemini-2.5-flash-image".to_string(),
            "gemini-2.5-flash-lite".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_verbose_filter() {
    assert_eq!(default_filter(false), "info");
    assert!(default_filter(true).contains("bulletin_pipeline=debug"));
}
