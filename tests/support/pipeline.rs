use stagehand::app::Handlers;
use stagehand::config::Config;
use stagehand::domain::ContinuationToken;
use stagehand::testkit::domain::{ARTIFACT_BUCKET, ARTIFACT_KEY};
use stagehand::testkit::fakes::{FakeBackends, InMemoryPackage, ReportedResult};

pub const TEMPLATE: &str = r#"{"Resources":{}}"#;

/// Fakes seeded with a build artifact containing `BUILD_ID` and
/// `template.json`, plus handlers wired to them.
pub fn pipeline_with_build(build_id: &str) -> (FakeBackends, Handlers) {
    let fakes = FakeBackends::new();
    fakes.artifacts.put(
        ARTIFACT_BUCKET,
        ARTIFACT_KEY,
        InMemoryPackage::new()
            .entry("BUILD_ID", build_id)
            .entry("template.json", TEMPLATE),
    );
    let handlers = Handlers::new(fakes.backends(), Config::default());
    (fakes, handlers)
}

/// Fleet stacks `web-<build>` and `lb-<build>` resolving to `web-asg`
/// behind `web-elb`.
pub fn seed_fleet_stacks(fakes: &FakeBackends, build_id: &str) {
    fakes.stacks.set_resource(
        &format!("web-{build_id}"),
        "WebAutoScalingGroup",
        "web-asg",
    );
    fakes
        .stacks
        .set_resource(&format!("lb-{build_id}"), "ELB", "web-elb");
}

/// Token from the last continuation reported to the orchestrator.
pub fn last_token(fakes: &FakeBackends) -> ContinuationToken {
    match fakes.jobs.results().last() {
        Some(ReportedResult::Continuation(_, token)) => token.clone(),
        other => panic!("expected a continuation report, got {other:?}"),
    }
}
