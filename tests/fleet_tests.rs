//! Fleet attachment and fleet health waiting through the entry points.

mod support;

use stagehand::domain::{FailureKind, JobState, Outcome, PhysicalResourceId};
use stagehand::testkit::domain::{invocation, resumed};
use stagehand::testkit::fakes::ReportedResult;

use support::pipeline::{last_token, pipeline_with_build, seed_fleet_stacks};

const PARAMS: &str = "artifact=BuildOutput, asg_stack_prefix=web, elb_stack_prefix=lb";

#[tokio::test]
async fn attach_binds_resolved_fleet_and_balancer() {
    let (fakes, handlers) = pipeline_with_build("7\n");
    seed_fleet_stacks(&fakes, "7");

    let outcome = handlers
        .attach_fleet(&invocation("job-1", PARAMS))
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(
        fakes.fleets.attachments(),
        vec![(
            PhysicalResourceId::from("web-asg"),
            PhysicalResourceId::from("web-elb")
        )]
    );
    assert_eq!(
        fakes.jobs.results(),
        vec![ReportedResult::Success("job-1".into())]
    );
}

#[tokio::test]
async fn attach_fails_when_balancer_stack_lacks_resource() {
    let (fakes, handlers) = pipeline_with_build("7");
    fakes
        .stacks
        .set_resource("web-7", "WebAutoScalingGroup", "web-asg");

    let outcome = handlers
        .attach_fleet(&invocation("job-1", PARAMS))
        .await
        .unwrap();

    match outcome {
        Outcome::Failed(details) => {
            assert_eq!(details.kind, FailureKind::JobFailed);
            assert!(details.message.contains("ELB"));
            assert!(details.message.contains("lb-7"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(fakes.fleets.attachments().is_empty());
}

#[tokio::test]
async fn all_members_in_service_succeeds() {
    let (fakes, handlers) = pipeline_with_build("7");
    seed_fleet_stacks(&fakes, "7");
    fakes.fleets.set_members("web-asg", &["i-1", "i-2", "i-3"]);
    for id in ["i-1", "i-2", "i-3"] {
        fakes.balancers.set_health("web-elb", id, "InService");
    }

    let outcome = handlers
        .await_fleet_health(&invocation("job-1", PARAMS))
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(
        fakes.jobs.results(),
        vec![ReportedResult::Success("job-1".into())]
    );
}

#[tokio::test]
async fn one_member_out_of_service_never_reports_success() {
    let (fakes, handlers) = pipeline_with_build("7");
    seed_fleet_stacks(&fakes, "7");
    fakes.fleets.set_members("web-asg", &["i-1", "i-2", "i-3"]);
    fakes.balancers.set_health("web-elb", "i-1", "InService");
    fakes.balancers.set_health("web-elb", "i-2", "OutOfService");
    fakes.balancers.set_health("web-elb", "i-3", "InService");

    let outcome = handlers
        .await_fleet_health(&invocation("job-1", PARAMS))
        .await
        .unwrap();

    assert!(outcome.is_continuation());
    assert!(!fakes
        .jobs
        .results()
        .iter()
        .any(|r| matches!(r, ReportedResult::Success(_))));
}

#[tokio::test]
async fn health_waiter_resumes_until_converged() {
    let (fakes, handlers) = pipeline_with_build("7");
    seed_fleet_stacks(&fakes, "7");
    fakes.fleets.set_members("web-asg", &["i-1", "i-2"]);
    fakes.balancers.set_health("web-elb", "i-1", "InService");
    fakes.balancers.set_health("web-elb", "i-2", "OutOfService");

    handlers
        .await_fleet_health(&invocation("job-1", PARAMS))
        .await
        .unwrap();
    let token = last_token(&fakes);
    assert!(matches!(token.decode().unwrap(), JobState::Polling { .. }));

    fakes.balancers.set_health("web-elb", "i-2", "InService");
    let outcome = handlers
        .await_fleet_health(&resumed("job-2", PARAMS, token.as_str()))
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(
        fakes.jobs.results().last(),
        Some(&ReportedResult::Success("job-2".into()))
    );
}

#[tokio::test]
async fn unknown_fleet_is_reported_as_failure() {
    let (fakes, handlers) = pipeline_with_build("7");
    seed_fleet_stacks(&fakes, "7");

    let outcome = handlers
        .await_fleet_health(&invocation("job-1", PARAMS))
        .await
        .unwrap();

    assert!(outcome.is_failure());
    assert!(matches!(
        fakes.jobs.results().as_slice(),
        [ReportedResult::Failure(..)]
    ));
}
