use super::*;
use fm_core::{Context, InterpolationError, JobStatus, StepOutcome, SystemClock};
use std::sync::Mutex as StdMutex;
use std::time::Duration;

struct RecordingStep {
    name: String,
    cores: u32,
    log: Arc<StdMutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl Step for RecordingStep {
    fn command(&self, _ctx: &Context) -> Result<Option<String>, InterpolationError> {
        Ok(None)
    }

    async fn run(&mut self, _ctx: &mut Context) -> StepOutcome {
        self.log.lock().unwrap().push(format!("start:{}", self.name));
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.log.lock().unwrap().push(format!("end:{}", self.name));
        StepOutcome::default()
    }

    fn num_cores(&self) -> u32 {
        self.cores
    }

    fn timeout_minutes(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn job(name: &str, cores: u32) -> (JobId, RunningJob) {
    let id = JobId::new(name);
    let job = Job::new(id.clone(), name.to_string(), cores, Context::new(None));
    (id, RunningJob { job, steps: Vec::new() })
}

fn job_with_step(name: &str, cores: u32, log: Arc<StdMutex<Vec<String>>>) -> (JobId, RunningJob) {
    let (id, mut running) = job(name, cores);
    running.steps.push(Box::new(RecordingStep {
        name: name.to_string(),
        cores,
        log,
    }));
    (id, running)
}

#[tokio::test]
async fn single_job_runs_to_completion() {
    let log = Arc::new(StdMutex::new(Vec::new()));
    let (id, running) = job_with_step("solo", 1, log.clone());
    let mut dag = Dag::new();
    dag.add_node(id.clone());
    let mut jobs = HashMap::new();
    jobs.insert(id.clone(), running);

    let scheduler = Arc::new(Scheduler::new(dag, jobs, 4, Arc::new(SystemClock)));
    let result = scheduler.run_all_jobs(None, None).await;

    assert_eq!(result[&id].status, JobStatus::Finished);
    assert_eq!(*log.lock().unwrap(), vec!["start:solo", "end:solo"]);
}

#[tokio::test]
async fn dependent_job_waits_for_its_predecessor() {
    let log = Arc::new(StdMutex::new(Vec::new()));
    let (a_id, a) = job_with_step("a", 1, log.clone());
    let (b_id, b) = job_with_step("b", 1, log.clone());

    let mut dag = Dag::new();
    dag.add_node(a_id.clone());
    dag.add_node(b_id.clone());
    dag.add_edge(&b_id, a_id.clone()).unwrap();

    let mut jobs = HashMap::new();
    jobs.insert(a_id.clone(), a);
    jobs.insert(b_id.clone(), b);

    let scheduler = Arc::new(Scheduler::new(dag, jobs, 4, Arc::new(SystemClock)));
    let result = scheduler.run_all_jobs(None, None).await;

    assert_eq!(result[&a_id].status, JobStatus::Finished);
    assert_eq!(result[&b_id].status, JobStatus::Finished);
    let entries = log.lock().unwrap();
    let a_end = entries.iter().position(|e| e == "end:a").unwrap();
    let b_start = entries.iter().position(|e| e == "start:b").unwrap();
    assert!(a_end < b_start, "b must start after a finishes: {entries:?}");
}

#[tokio::test]
async fn core_budget_never_oversubscribes() {
    let log = Arc::new(StdMutex::new(Vec::new()));
    let (a_id, a) = job_with_step("a", 3, log.clone());
    let (b_id, b) = job_with_step("b", 3, log.clone());

    let mut dag = Dag::new();
    dag.add_node(a_id.clone());
    dag.add_node(b_id.clone());

    let mut jobs = HashMap::new();
    jobs.insert(a_id.clone(), a);
    jobs.insert(b_id.clone(), b);

    // Total budget (4) admits only one of the two 3-core jobs at once.
    let scheduler = Arc::new(Scheduler::new(dag, jobs, 4, Arc::new(SystemClock)));
    let result = scheduler.run_all_jobs(None, None).await;

    assert_eq!(result[&a_id].status, JobStatus::Finished);
    assert_eq!(result[&b_id].status, JobStatus::Finished);
    let entries = log.lock().unwrap();
    // Neither job's run can overlap the other's, since both together
    // would exceed the 4-core budget.
    let a_start = entries.iter().position(|e| e == "start:a").unwrap();
    let a_end = entries.iter().position(|e| e == "end:a").unwrap();
    let b_start = entries.iter().position(|e| e == "start:b").unwrap();
    let b_end = entries.iter().position(|e| e == "end:b").unwrap();
    assert!(a_end < b_start || b_end < a_start, "{entries:?}");
}

#[tokio::test]
async fn precomputed_skip_is_returned_without_running_steps() {
    let (id, mut running) = job("skipped", 1);
    running.job.mark_skipped("Skipped dependency");
    let mut dag = Dag::new();
    dag.add_node(id.clone());
    let mut jobs = HashMap::new();
    jobs.insert(id.clone(), running);

    let scheduler = Arc::new(Scheduler::new(dag, jobs, 4, Arc::new(SystemClock)));
    let result = scheduler.run_all_jobs(None, None).await;

    assert_eq!(
        result[&id].status,
        JobStatus::Skipped("Skipped dependency".to_string())
    );
}
