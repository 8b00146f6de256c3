//! Usher binary.
//!
//! Loads configuration and the target definition, preflights the target,
//! launches the shared browser session, runs the suite, renders the
//! report, and captures the final screenshot artifact. Only a failed
//! preflight or browser launch aborts the run; check failures are
//! reflected in the report and the exit code.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use usher_browser::{BrowserActions, BrowserEngine};
use usher_core::{HarnessConfig, ReportFormat};
use usher_harness::{ConsoleListener, ConsoleRenderer, JsonRenderer, RenderReport, RunReport, Runner};
use usher_suite::{bundled_definition, standard_suite, TargetDefinition, TargetLoader, WidgetPanel};

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,usher=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Confirm the target answers HTTP at all before paying for a browser.
async fn preflight(base_url: &str, timeout_secs: u64) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build preflight client")?;

    let response = client
        .get(base_url)
        .send()
        .await
        .with_context(|| format!("target unreachable at {base_url}"))?;

    info!(status = %response.status(), url = %base_url, "target preflight ok");
    Ok(())
}

/// Load the configured definition file, falling back to the bundled one.
fn load_definition(config: &HarnessConfig) -> anyhow::Result<TargetDefinition> {
    match &config.target.definition_path {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let loader = TargetLoader::new(dir)?;
            loader
                .load_file(path)
                .with_context(|| format!("failed to load target definition {}", path.display()))
        }
        None => bundled_definition().context("bundled definition invalid"),
    }
}

/// Capture the final full-page screenshot; failure is logged, not fatal.
async fn capture_artifact(
    engine: &BrowserEngine,
    report: &mut RunReport,
    config: &HarnessConfig,
) {
    let path = &config.report.screenshot_path;

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(error = %e, "could not create artifact directory");
            return;
        }
    }

    match engine.screenshot().await {
        Ok(bytes) => match std::fs::write(path, &bytes) {
            Ok(()) => {
                info!(path = %path.display(), bytes = bytes.len(), "final screenshot captured");
                report.screenshot = Some(path.clone());
            }
            Err(e) => warn!(error = %e, "could not write screenshot artifact"),
        },
        Err(e) => warn!(error = %e, "could not capture final screenshot"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = HarnessConfig::load_with_env().context("failed to load configuration")?;
    let definition = Arc::new(load_definition(&config)?);

    let base_url = if config.target.base_url.is_empty() {
        definition.target.base_url.clone()
    } else {
        config.target.base_url.clone()
    };

    info!(
        target = %definition.id(),
        base_url = %base_url,
        "starting Usher v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Fatal failures: unreachable target, browser launch. No partial report.
    preflight(&base_url, config.target.preflight_timeout_secs).await?;

    let engine = BrowserEngine::launch(&config.browser)
        .await
        .context("failed to launch browser")?;

    let suite = standard_suite(&definition, &base_url);
    let panel = WidgetPanel::new(definition.clone());
    let mut runner = Runner::new(config.runner.clone());

    let mut report = runner
        .run(
            &engine,
            &panel,
            &suite,
            &ConsoleListener,
            definition.id().as_str(),
            &base_url,
        )
        .await;

    capture_artifact(&engine, &mut report, &config).await;

    // Single release point; the runner never propagates check errors,
    // so this is reached on every non-panic path.
    engine.close().await.context("failed to close browser")?;

    let rendered = match config.report.format {
        ReportFormat::Console => ConsoleRenderer.render(&report),
        ReportFormat::Json => JsonRenderer.render(&report),
    }
    .context("failed to render report")?;
    println!("{rendered}");

    if !report.all_passed() && config.report.fail_exit_code {
        std::process::exit(1);
    }

    Ok(())
}
