//! Pipeline run command handler.

use super::Cli;
use bulletin::config::{GEMINI_API_KEY, HEYGEN_API_KEY};
use bulletin::{
    ArtifactStore, BulletinConfig, BulletinResult, ConfigError, FfmpegCompositor, FilmStep,
    GeminiClient, GuardedOracle, HeyGenClient, HttpPageFetcher, Orchestrator, PhoneticReplacer,
    ProduceStep, RateLimiter, ResearchStep, RunContext, Services, StepKind, StoryboardStep,
    WorkspaceRoot, WritePostStep, WriteScriptStep, api_key, check_setup, init_logging,
};
use chrono::{Local, NaiveDate};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Loads configuration, prepares the working directory and runs the
/// requested steps.
pub async fn run_pipeline(cli: Cli) -> BulletinResult<()> {
    let config = BulletinConfig::load(cli.config.as_deref())?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let root = WorkspaceRoot::new(config.pipeline.gen_dir.clone());
    let working_dir = cli
        .working_dir
        .clone()
        .unwrap_or_else(|| root.by_date(today));

    let store = ArtifactStore::open(&working_dir)?;
    let _log_guard = init_logging(&working_dir, cli.verbose);
    info!(today = %today.format("%Y-%m-%d"), "Run date");
    info!(working_dir = %working_dir.display(), "Working directory");

    if !cli.requests_work() {
        warn!("No steps requested; name steps to run or pass --resume");
        return Ok(());
    }

    let services = build_services(&config)?;

    if cli.skip_check {
        info!("Skipping setup check");
    } else {
        check_setup(
            services.oracle.as_ref(),
            services.jobs.as_ref(),
            &config.required_models(),
            config.render.min_credits,
        )
        .await?;
    }

    let orchestrator = build_orchestrator(&cli, &config, &root, today)?;
    let ctx = RunContext::new(store, today, services, config.pipeline_settings()?);
    let summary = orchestrator.run(&ctx).await?;
    info!(executed = ?summary.executed, skipped = ?summary.skipped, "Run finished");
    Ok(())
}

fn build_services(config: &BulletinConfig) -> BulletinResult<Services> {
    let oracle = &config.oracle;
    let render = &config.render;

    let gemini = Arc::new(
        GeminiClient::new(api_key(GEMINI_API_KEY)?, oracle.image_model.as_str())?
            .with_thinking_budget(oracle.thinking_budget),
    );
    let guarded = GuardedOracle::new(
        gemini.clone(),
        RateLimiter::new(&oracle.limits),
        oracle.retry,
    );
    let jobs = HeyGenClient::new(api_key(HEYGEN_API_KEY)?, render.heygen.clone())?;
    let fetcher = HttpPageFetcher::new(render.browser.as_str())?;
    let compositor =
        FfmpegCompositor::new(render.ffmpeg.as_str()).with_font_file(render.font_file.clone());

    Ok(Services {
        oracle: Arc::new(guarded),
        fetcher: Arc::new(fetcher),
        jobs: Arc::new(jobs),
        frames: gemini,
        compositor: Arc::new(compositor),
    })
}

fn load_pronunciation(path: Option<&Path>) -> BulletinResult<PhoneticReplacer> {
    let Some(path) = path else {
        return Ok(PhoneticReplacer::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!("Failed to read pronunciation file {}: {}", path.display(), e))
    })?;
    let replacer = PhoneticReplacer::from_json(&json).map_err(|e| {
        ConfigError::new(format!("Failed to parse pronunciation file {}: {}", path.display(), e))
    })?;
    Ok(replacer)
}

fn build_orchestrator(
    cli: &Cli,
    config: &BulletinConfig,
    root: &WorkspaceRoot,
    today: NaiveDate,
) -> BulletinResult<Orchestrator> {
    let recent_dirs = root.find_recent(today, config.pipeline.recent_days);
    let pronunciation = if cli.resume || cli.names(StepKind::Film) {
        load_pronunciation(config.render.pronunciation.as_deref())?
    } else {
        PhoneticReplacer::default()
    };

    Ok(Orchestrator::new(cli.resume)
        .with_step(
            Box::new(ResearchStep::new(
                config.targets(),
                cli.research.clone().unwrap_or_default(),
            )),
            cli.names(StepKind::Research),
        )
        .with_step(
            Box::new(WriteScriptStep::new(
                cli.story_count(config.pipeline.num_stories),
                recent_dirs,
            )),
            cli.names(StepKind::WriteScript),
        )
        .with_step(
            Box::new(StoryboardStep::new()),
            cli.names(StepKind::Storyboard),
        )
        .with_step(
            Box::new(FilmStep::new(
                cli.film.clone().unwrap_or_default(),
                pronunciation,
            )),
            cli.names(StepKind::Film),
        )
        .with_step(Box::new(ProduceStep::new()), cli.names(StepKind::Produce))
        .with_step(
            Box::new(WritePostStep::new()),
            cli.names(StepKind::WritePost),
        ))
}
