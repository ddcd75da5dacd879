use super::require;
use crate::{Crawler, PipelineStep, RunContext, StepKind};
use async_trait::async_trait;
use bulletin_core::{DateRange, ExtractedRecord, Target, TokenLedger};
use bulletin_error::{BulletinResult, PipelineError, PipelineErrorKind};
use bulletin_storage::Artifact;
use tracing::{info, instrument, warn};

/// Crawls targets into per-target datasets and merges them.
pub struct ResearchStep {
    targets: Vec<Target>,
    filter: Vec<String>,
}

impl ResearchStep {
    /// Research `targets`; when `filter` is non-empty only the named targets run.
    pub fn new(targets: Vec<Target>, filter: Vec<String>) -> Self {
        Self { targets, filter }
    }

    fn selected(&self) -> Vec<&Target> {
        for name in &self.filter {
            if !self.targets.iter().any(|t| t.name() == name) {
                warn!(target = %name, "Unknown target in filter");
            }
        }
        self.targets
            .iter()
            .filter(|t| self.filter.is_empty() || self.filter.contains(t.name()))
            .collect()
    }
}

#[async_trait]
impl PipelineStep for ResearchStep {
    fn kind(&self) -> StepKind {
        StepKind::Research
    }

    fn done(&self, ctx: &RunContext) -> bool {
        ctx.store().is_complete(&Artifact::Events)
    }

    #[instrument(skip_all, fields(targets = self.targets.len(), filter = ?self.filter))]
    async fn run(&self, ctx: &RunContext) -> BulletinResult<()> {
        let store = ctx.store();
        let services = ctx.services();
        let settings = ctx.settings();
        let range = DateRange::month_from(*ctx.today());
        let crawler = Crawler::new(
            services.oracle.as_ref(),
            services.fetcher.as_ref(),
            settings.research_model(),
            *settings.enrichment_workers(),
        );

        let previous: TokenLedger = if store.exists(&Artifact::ResearchTokens) {
            require(store, &Artifact::ResearchTokens).await.unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable token ledger");
                TokenLedger::default()
            })
        } else {
            TokenLedger::default()
        };
        let mut ledger = TokenLedger::default();

        let targets = self.selected();
        info!(count = targets.len(), "Running research targets");

        for target in targets {
            let outcome = match crawler.crawl(target, &range).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(target = %target.name(), error = %e, "Target skipped");
                    continue;
                }
            };

            store
                .write_json(&Artifact::TargetEvents(target.name().clone()), &outcome.records)
                .await?;
            ledger.record(target.name(), outcome.usage);
            info!(
                target = %target.name(),
                events = outcome.records.len(),
                prompt_tokens = outcome.usage.prompt,
                total_tokens = outcome.usage.total,
                "Found events"
            );
        }

        let names = store.target_datasets().await?;
        if names.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::NoDatasets).into());
        }

        let mut merged: Vec<ExtractedRecord> = Vec::new();
        for name in &names {
            let records: Vec<ExtractedRecord> =
                store.read_json(&Artifact::TargetEvents(name.clone())).await?;
            merged.extend(records);
        }

        for (name, usage) in previous.iter() {
            if ledger.get(name).is_none() {
                ledger.record(name, *usage);
            }
        }
        store.write_json(&Artifact::ResearchTokens, &ledger).await?;
        store.write_json(&Artifact::Events, &merged).await?;
        info!(datasets = names.len(), events = merged.len(), "Collected events");
        Ok(())
    }
}
