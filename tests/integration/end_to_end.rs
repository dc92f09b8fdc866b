//! End-to-end runs through `RunContext` with `MockTransport`.

use crate::integration::test_utils::InstantProgress;
use kanvas_snapshot::cli::{exit_code, RunContext};
use kanvas_snapshot::config::{SnapshotConfig, TriggerMode};
use kanvas_snapshot::error::{RequestError, SnapshotError};
use kanvas_snapshot::http::mock::MockTransport;
use kanvas_snapshot::observer::{CapturingObserver, RunState};
use kanvas_snapshot::orchestrator::{Delivery, RunInput};
use std::sync::Arc;
use tempfile::TempDir;

const CHART: &str = "https://charts.example.com/nginx-1.0.0.tgz";
const ASSET: &str = "https://assets.test/action-assets/abc123.png";

fn test_config() -> SnapshotConfig {
    let mut config = SnapshotConfig::default();
    config.meshery.api_base_url = "http://meshery.test".to_string();
    config.meshery.provider_token = Some("session-token".to_string());
    config.cloud.api_base_url = "http://cloud.test".to_string();
    config.assets.base_url = "https://assets.test/action-assets".to_string();
    config
}

fn context(config: SnapshotConfig) -> (TempDir, RunContext) {
    let dir = TempDir::new().unwrap();
    let ctx = RunContext::from_config(config, dir.path().to_path_buf()).unwrap();
    (dir, ctx)
}

fn input(email: Option<&str>) -> RunInput {
    RunInput {
        chart_uri: CHART.to_string(),
        design_name: None,
        email: email.map(str::to_string),
    }
}

#[test]
fn test_no_email_run_displays_predicted_url() {
    let (_dir, ctx) = context(test_config());
    let transport = Arc::new(
        MockTransport::new()
            .respond(200, r#"[{"id":"abc123","name":"nginx-1.0.0"}]"#)
            .respond(200, "{}"),
    );
    let progress = InstantProgress::elapsed();
    let observer = Arc::new(CapturingObserver::new());

    let outcome = ctx
        .execute_with(
            input(None),
            transport.clone(),
            Box::new(progress.clone()),
            observer.clone(),
        )
        .unwrap();

    assert_eq!(outcome.design_name, "nginx-1.0.0");
    assert_eq!(outcome.design_id, "abc123");
    assert_eq!(outcome.asset_location, ASSET);
    assert_eq!(outcome.delivery, Delivery::Displayed { waited: true });
    assert_eq!(progress.call_count(), 1);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2, "design + trigger only, no notification");
    assert_eq!(requests[0].url, "http://meshery.test/api/pattern/import");
    assert_eq!(requests[0].body["name"], "nginx-1.0.0");
    assert_eq!(requests[0].body["url"], CHART);
    assert_eq!(
        requests[1].url,
        "http://cloud.test/api/integrations/trigger/workflow"
    );
    assert_eq!(requests[1].body["Payload"]["designID"], "abc123");
    assert_eq!(requests[1].body["Payload"]["assetLocation"], ASSET);
    assert!(requests
        .iter()
        .all(|r| !r.url.ends_with("/api/integrations/snapshot/email")));

    assert_eq!(
        observer.states(),
        vec![
            RunState::Start,
            RunState::NameResolved,
            RunState::DesignCreated,
            RunState::SnapshotTriggered,
            RunState::ProgressDisplayed,
            RunState::Done,
        ]
    );
    assert!(
        !ctx.diagnostics_path().exists(),
        "diagnostics log should be removed after success"
    );
}

#[test]
fn test_email_run_notifies_once_without_progress() {
    let (_dir, ctx) = context(test_config());
    let transport = Arc::new(
        MockTransport::new()
            .respond(200, r#"[{"id":"abc123"}]"#)
            .respond(200, "{}")
            .respond(200, "{}"),
    );
    let progress = InstantProgress::elapsed();
    let observer = Arc::new(CapturingObserver::new());

    let outcome = ctx
        .execute_with(
            input(Some("user@example.com")),
            transport.clone(),
            Box::new(progress.clone()),
            observer.clone(),
        )
        .unwrap();

    assert_eq!(
        outcome.delivery,
        Delivery::Email {
            email: "user@example.com".to_string(),
            warning: None,
        }
    );
    assert_eq!(progress.call_count(), 0, "progress bar must not run");

    let notifications: Vec<_> = transport
        .requests()
        .into_iter()
        .filter(|r| r.url == "http://cloud.test/api/integrations/snapshot/email")
        .collect();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].body["to"], "user@example.com");
    assert_eq!(notifications[0].body["image_uri"], ASSET);
    assert!(observer.states().contains(&RunState::Notified));
}

#[test]
fn test_design_failure_stops_run_and_keeps_diagnostics() {
    let (_dir, ctx) = context(test_config());
    let transport = Arc::new(MockTransport::new().respond(500, "database unavailable"));
    let progress = InstantProgress::elapsed();
    let observer = Arc::new(CapturingObserver::new());

    let err = ctx
        .execute_with(
            input(Some("user@example.com")),
            transport.clone(),
            Box::new(progress.clone()),
            observer.clone(),
        )
        .unwrap_err();

    match &err {
        SnapshotError::CreateDesign(RequestError::UnexpectedResponseCode { status, body }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(exit_code(&err), 1);
    assert_eq!(transport.requests().len(), 1, "trigger and notify never called");
    assert_eq!(progress.call_count(), 0);
    assert_eq!(observer.states().last(), Some(&RunState::Failed));

    let log = std::fs::read_to_string(ctx.diagnostics_path()).unwrap();
    assert!(log.contains("kanvas-snapshot-902"), "log was: {}", log);
    assert!(log.contains("database unavailable"));
}

#[test]
fn test_trigger_failure_is_fatal_without_rollback() {
    let (_dir, ctx) = context(test_config());
    let transport = Arc::new(
        MockTransport::new()
            .respond(200, r#"[{"id":"abc123"}]"#)
            .fail(RequestError::Transport("connection reset".to_string())),
    );
    let observer = Arc::new(CapturingObserver::new());

    let err = ctx
        .execute_with(
            input(None),
            transport.clone(),
            Box::new(InstantProgress::elapsed()),
            observer.clone(),
        )
        .unwrap_err();

    assert_eq!(err.code(), "kanvas-snapshot-904");
    assert_eq!(transport.requests().len(), 2);
    assert!(!observer.states().contains(&RunState::SnapshotTriggered));
}

#[test]
fn test_notification_failure_is_reported_as_warning() {
    let (_dir, ctx) = context(test_config());
    let transport = Arc::new(
        MockTransport::new()
            .respond(200, r#"[{"id":"abc123"}]"#)
            .respond(200, "{}")
            .respond(503, "mailer down"),
    );
    let observer = Arc::new(CapturingObserver::new());

    let outcome = ctx
        .execute_with(
            input(Some("user@example.com")),
            transport,
            Box::new(InstantProgress::elapsed()),
            observer.clone(),
        )
        .unwrap();

    match outcome.delivery {
        Delivery::Email {
            warning: Some(warning),
            ..
        } => assert!(warning.contains("kanvas-snapshot-909"), "{}", warning),
        other => panic!("expected a warning, got {:?}", other),
    }
    assert_eq!(observer.warnings().len(), 1);
    assert_eq!(observer.states().last(), Some(&RunState::Done));
    assert!(!ctx.diagnostics_path().exists());
}

#[test]
fn test_invalid_email_rejected_before_any_request() {
    let (_dir, ctx) = context(test_config());
    let transport = Arc::new(MockTransport::new());

    let err = ctx
        .execute_with(
            input(Some("User@Example.com")),
            transport.clone(),
            Box::new(InstantProgress::elapsed()),
            Arc::new(CapturingObserver::new()),
        )
        .unwrap_err();

    assert!(matches!(err, SnapshotError::InvalidEmail(_)));
    assert!(transport.requests().is_empty());
    assert!(ctx.diagnostics_path().exists());
}

#[test]
fn test_interrupted_wait_reports_asset_location() {
    let (_dir, ctx) = context(test_config());
    let transport = Arc::new(
        MockTransport::new()
            .respond(200, r#"[{"id":"abc123"}]"#)
            .respond(200, "{}"),
    );

    let err = ctx
        .execute_with(
            input(None),
            transport,
            Box::new(InstantProgress::interrupted()),
            Arc::new(CapturingObserver::new()),
        )
        .unwrap_err();

    assert_eq!(exit_code(&err), 130);
    assert!(err.to_string().contains(ASSET));
}

#[test]
fn test_no_wait_skips_progress() {
    let mut config = test_config();
    config.progress.wait_secs = 0;
    let (_dir, ctx) = context(config);
    let transport = Arc::new(
        MockTransport::new()
            .respond(200, r#"[{"id":"abc123"}]"#)
            .respond(200, "{}"),
    );
    let progress = InstantProgress::elapsed();

    let outcome = ctx
        .execute_with(
            input(None),
            transport,
            Box::new(progress.clone()),
            Arc::new(CapturingObserver::new()),
        )
        .unwrap();

    assert_eq!(outcome.delivery, Delivery::Displayed { waited: false });
    assert_eq!(progress.call_count(), 0);
}

#[test]
fn test_github_dispatch_mode_posts_to_workflow() {
    let mut config = test_config();
    config.trigger.mode = TriggerMode::GithubDispatch;
    config.trigger.owner = Some("layer5labs".to_string());
    config.trigger.repo = Some("meshery-extensions-packages".to_string());
    config.trigger.workflow = Some("helm-chart-snapshot".to_string());
    config.trigger.github_token = Some("ghp_test".to_string());
    config.trigger.github_api_base_url = "http://github.test".to_string();
    let (_dir, ctx) = context(config);
    let transport = Arc::new(
        MockTransport::new()
            .respond(200, r#"[{"id":"abc123"}]"#)
            .respond(204, ""),
    );

    let outcome = ctx
        .execute_with(
            input(None),
            transport.clone(),
            Box::new(InstantProgress::elapsed()),
            Arc::new(CapturingObserver::new()),
        )
        .unwrap();

    assert_eq!(outcome.asset_location, ASSET);
    let dispatch = &transport.requests()[1];
    assert_eq!(
        dispatch.url,
        "http://github.test/repos/layer5labs/meshery-extensions-packages/actions/workflows/helm-chart-snapshot.yaml/dispatches"
    );
    assert_eq!(dispatch.body["inputs"]["contentID"], "abc123");
    assert_eq!(dispatch.header_value("authorization"), Some("Bearer ghp_test"));
}

#[test]
fn test_diagnostics_disabled_leaves_no_file() {
    let mut config = test_config();
    config.diagnostics.enabled = false;
    let (_dir, ctx) = context(config);

    let err = ctx
        .execute_with(
            input(Some("bad-email")),
            Arc::new(MockTransport::new()),
            Box::new(InstantProgress::elapsed()),
            Arc::new(CapturingObserver::new()),
        )
        .unwrap_err();

    assert_eq!(err.code(), "kanvas-snapshot-907");
    assert!(!ctx.diagnostics_path().exists());
}
