// End-to-end runs through the engine

mod common;

use common::{file_aged, root_of, single_job};
use housekeeper::{
    Engine, FailurePolicy, JobConfig, JobError, JobSet, Output, RunOptions,
};
use tempfile::TempDir;

#[test]
fn test_dry_run_output() {
    let temp = TempDir::new().unwrap();
    let old = file_aged(temp.path(), "old.log", 10);
    file_aged(temp.path(), "new.log", 1);

    let jobs = single_job(
        "logs",
        JobConfig::new()
            .with("root", root_of(temp.path()))
            .with("match", "*.log")
            .with("older", "7"),
    );
    let mut out = Output::captured();
    let summary = Engine::new(RunOptions::dry_run()).run(&jobs, &mut out).unwrap();

    assert!(summary.is_clean());
    assert_eq!(
        out.lines(),
        [
            "Executing job logs (noop)".to_string(),
            format!(
                "logs: execute command: find {} -maxdepth 1 -type f -name *.log -mtime +7",
                temp.path().display()
            ),
            format!("logs: would remove: {}", old.display()),
            "logs: would remove 1 entries (7 B)".to_string(),
        ]
    );
    assert!(old.exists());
}

#[test]
fn test_execute_removes_and_reports() {
    let temp = TempDir::new().unwrap();
    let old = file_aged(temp.path(), "old.log", 10);
    let new = file_aged(temp.path(), "new.log", 1);

    let jobs = single_job(
        "logs",
        JobConfig::new()
            .with("root", root_of(temp.path()))
            .with("older", "1w"),
    );
    let mut out = Output::captured();
    let summary = Engine::new(RunOptions::execute()).run(&jobs, &mut out).unwrap();

    let report = summary.report("logs").unwrap();
    assert_eq!(report.removed, 1);
    assert!(!old.exists());
    assert!(new.exists());
    assert_eq!(out.lines()[0], "Executing job logs");
    assert!(out.lines()[1].ends_with("-delete (do not copy-paste this command)"));
    assert_eq!(
        out.lines().last().unwrap(),
        "logs: removed 1 of 1 entries (7 B), 0 already gone, 0 failed"
    );
}

#[test]
fn test_jobs_run_in_configuration_order() {
    let temp = TempDir::new().unwrap();
    let root = root_of(temp.path());
    let jobs: JobSet = ["zeta", "alpha", "mid"]
        .into_iter()
        .map(|name| (name, JobConfig::new().with("root", root.as_str()).with("match", "*")))
        .collect();

    let mut out = Output::captured();
    let summary = Engine::new(RunOptions::dry_run()).run(&jobs, &mut out).unwrap();

    let order: Vec<_> = summary.reports.iter().map(|r| r.job.as_str()).collect();
    assert_eq!(order, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_unknown_type_fails_before_mutation() {
    let temp = TempDir::new().unwrap();
    let victim = file_aged(temp.path(), "victim.log", 100);
    let root = root_of(temp.path());

    let jobs: JobSet = [
        ("broken", JobConfig::new().with("root", root.as_str()).with("type", "archive")),
        ("cleanup", JobConfig::new().with("root", root.as_str()).with("match", "*")),
    ]
    .into_iter()
    .collect();

    let err = Engine::new(RunOptions::execute())
        .run(&jobs, &mut Output::captured())
        .unwrap_err();
    assert!(matches!(err, JobError::UnknownJobType { ref tag, .. } if tag == "archive"));
    assert!(err.is_setup_error());
    assert!(victim.exists());
}

#[test]
fn test_keep_going_skips_invalid_job() {
    let temp = TempDir::new().unwrap();
    let victim = file_aged(temp.path(), "victim.log", 100);
    let root = root_of(temp.path());

    let jobs: JobSet = [
        ("unbounded", JobConfig::new().with("root", root.as_str())),
        ("cleanup", JobConfig::new().with("root", root.as_str()).with("older", "1m")),
    ]
    .into_iter()
    .collect();

    let options = RunOptions::execute().with_failure_policy(FailurePolicy::Continue);
    let mut out = Output::captured();
    let summary = Engine::new(options).run(&jobs, &mut out).unwrap();

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(
        summary.failures[0].error.to_string(),
        "unbounded: either 'match' or 'older' needs to be defined"
    );
    assert_eq!(summary.report("cleanup").unwrap().removed, 1);
    assert!(!victim.exists());
}

#[test]
fn test_silent_output_discards_lines() {
    let temp = TempDir::new().unwrap();
    file_aged(temp.path(), "old.log", 10);
    let jobs = single_job(
        "logs",
        JobConfig::new()
            .with("root", root_of(temp.path()))
            .with("older", "1d"),
    );

    let mut out = Output::captured();
    let mut silent = Output::stdout(true);
    let summary = Engine::new(RunOptions::dry_run()).run(&jobs, &mut silent).unwrap();
    Engine::new(RunOptions::dry_run()).run(&jobs, &mut out).unwrap();

    assert_eq!(summary.report("logs").unwrap().selected.len(), 1);
    assert!(silent.lines().is_empty());
    assert_eq!(out.lines().len(), 4);
}
