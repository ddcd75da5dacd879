//! Pre-run check of the external services.

use bulletin_error::{BulletinResult, PipelineError, PipelineErrorKind};
use bulletin_interface::{ExtractionOracle, GenerationJobClient};
use tracing::{error, info, instrument};

/// Verifies the oracle offers `required_models` and the render quota covers
/// `min_credits`.
///
/// Every problem is logged before the check fails, so one run reports them all.
#[instrument(skip_all, fields(models = required_models.len(), min_credits))]
pub async fn check_setup(
    oracle: &dyn ExtractionOracle,
    jobs: &dyn GenerationJobClient,
    required_models: &[String],
    min_credits: f64,
) -> BulletinResult<()> {
    let mut problems = Vec::new();

    match oracle.available_models().await {
        Ok(models) => {
            info!(provider = oracle.provider_name(), count = models.len(), "Oracle connection succeeded");
            for model in required_models {
                let qualified = format!("models/{}", model);
                if models.iter().any(|m| m == model || *m == qualified) {
                    info!(model = %model, "Model found");
                } else {
                    error!(model = %model, "Required model not found");
                    problems.push(format!("model {} unavailable", model));
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Oracle connection failed");
            problems.push(format!("oracle unreachable: {}", e));
        }
    }

    match jobs.check_quota().await {
        Ok(quota) if quota.credits() >= min_credits => {
            info!(credits = quota.credits(), "Render service has sufficient credits");
        }
        Ok(quota) => {
            error!(credits = quota.credits(), min_credits, "Render service has insufficient credits");
            problems.push(format!(
                "{:.1} render credits, {} needed",
                quota.credits(),
                min_credits
            ));
        }
        Err(e) => {
            error!(error = %e, "Render service connection failed");
            problems.push(format!("render service unreachable: {}", e));
        }
    }

    if problems.is_empty() {
        info!("All checks passed");
        Ok(())
    } else {
        Err(PipelineError::new(PipelineErrorKind::SetupCheck(problems.join("; "))).into())
    }
}
