use super::*;
use fm_core::{Context, Job, JobId, JobStatus};

fn finished(id: &str, name: &str, rc: i32, duration: f64) -> (JobId, Job) {
    let job_id = JobId::new(id);
    let mut job = Job::new(job_id.clone(), name.to_string(), 1, Context::new(None));
    job.return_code = rc;
    job.duration_secs = duration;
    job.mark_finished();
    (job_id, job)
}

fn skipped(id: &str, name: &str, reason: &str) -> (JobId, Job) {
    let job_id = JobId::new(id);
    let mut job = Job::new(job_id.clone(), name.to_string(), 1, Context::new(None));
    job.mark_skipped(reason.to_string());
    (job_id, job)
}

#[test]
fn build_results_orders_by_job_number_and_classifies_status() {
    let mut jobs = HashMap::new();
    let (id_a, a) = finished("b-job", "b", 0, 1.23456);
    let (id_b, b) = finished("a-job", "a", 1, 0.5);
    let (id_c, c) = skipped("c-job", "c", "Job too big (requires 8 cores)");
    let job_numbers = HashMap::from([(id_a.clone(), 2), (id_b.clone(), 1), (id_c.clone(), 3)]);
    jobs.insert(id_a, a);
    jobs.insert(id_b, b);
    jobs.insert(id_c, c);

    let results = build_results(&jobs, &job_numbers);
    let ids: Vec<u32> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    assert_eq!(results[0].job_name, "a");
    assert_eq!(results[0].status, "failed");
    assert_eq!(results[0].return_code, Some(1));
    assert_eq!(results[1].job_name, "b");
    assert_eq!(results[1].status, "success");
    assert_eq!(results[1].duration, Some(1.235));
    assert_eq!(results[2].status, "skipped");
    assert_eq!(results[2].reason.as_deref(), Some("Job too big (requires 8 cores)"));
    assert_eq!(results[2].return_code, None);
}

#[test]
fn report_completeness_one_entry_per_job() {
    let mut jobs = HashMap::new();
    let mut job_numbers = HashMap::new();
    for i in 0..5 {
        let (id, job) = finished(&format!("job-{i}"), &format!("job-{i}"), 0, 0.1);
        job_numbers.insert(id.clone(), i as u32 + 1);
        jobs.insert(id, job);
    }
    let results = build_results(&jobs, &job_numbers);
    assert_eq!(results.len(), 5);
}

#[test]
fn write_report_yaml_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.yaml");
    let report = Report {
        results: vec![ReportEntry {
            id: 1,
            job_name: "build".to_string(),
            status: "success".to_string(),
            reason: None,
            return_code: Some(0),
            duration: Some(1.5),
        }],
        total_runtime: 1.5,
    };

    write_report_yaml(&path, &report).unwrap();
    let body = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&body).unwrap();
    assert_eq!(parsed["total_runtime"].as_f64(), Some(1.5));
    assert_eq!(parsed["results"][0]["status"].as_str(), Some("success"));
}

#[test]
fn write_report_csv_has_expected_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let entries = vec![
        ReportEntry {
            id: 1,
            job_name: "build".to_string(),
            status: "success".to_string(),
            reason: None,
            return_code: Some(0),
            duration: Some(1.5),
        },
        ReportEntry {
            id: 2,
            job_name: "skipped-job".to_string(),
            status: "skipped".to_string(),
            reason: Some("Skipped dependency".to_string()),
            return_code: None,
            duration: None,
        },
    ];

    write_report_csv(&path, &entries).unwrap();
    let body = std::fs::read_to_string(&path).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next().unwrap(), "id,name,status,duration,return code");
    assert_eq!(lines.next().unwrap(), "1,build,success,1.5,0");
    assert_eq!(lines.next().unwrap(), "2,skipped-job,skipped,,");
}

#[test]
fn duration_is_rounded_to_three_decimals() {
    assert_eq!(round3(1.23456789), 1.235);
    assert_eq!(round3(0.0001), 0.0);
}
