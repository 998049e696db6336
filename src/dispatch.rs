//! Job dispatch over a fixed worker pool.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::directory::ServiceDirectory;
use crate::rancher::api::RancherApi;
use crate::upgrade::controller::{ServiceUpgrader, UpgradeJob};
use crate::upgrade::gate::PollSettings;
use crate::upgrade::image::build_image_reference;
use crate::upgrade::outcome::RunSummary;

/// Build one upgrade job per selected service, with the target image
/// reference fully constructed up front.
pub fn build_jobs(services: &[String], image_prefix: &str, tag: &str) -> Vec<UpgradeJob> {
    services
        .iter()
        .map(|name| UpgradeJob {
            service_name: name.clone(),
            image: build_image_reference(image_prefix, name, tag),
        })
        .collect()
}

/// Fans a job list out to a fixed pool of upgrade workers.
pub struct Dispatcher {
    api: Arc<dyn RancherApi>,
    directory: Arc<ServiceDirectory>,
    parallelism: usize,
    poll: PollSettings,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn RancherApi>,
        directory: Arc<ServiceDirectory>,
        parallelism: usize,
        poll: PollSettings,
    ) -> Self {
        Self {
            api,
            directory,
            parallelism,
            poll,
        }
    }

    /// Run every job to completion and aggregate the outcomes.
    ///
    /// The queue is loaded and closed before the workers start pulling, so
    /// each job reaches exactly one worker and an empty queue ends the pool.
    /// The worker count never adapts to the job count; surplus workers see
    /// the closed queue and exit.
    pub async fn run(&self, jobs: Vec<UpgradeJob>) -> RunSummary {
        let mut summary = RunSummary::new();
        if jobs.is_empty() {
            return summary;
        }

        let (tx, rx) = mpsc::channel(jobs.len());
        for job in jobs {
            // Capacity covers the whole job list, so enqueueing never waits.
            if let Err(e) = tx.send(job).await {
                warn!("Failed to enqueue job: {}", e);
            }
        }
        drop(tx);

        let queue = Arc::new(Mutex::new(rx));
        let mut workers = Vec::with_capacity(self.parallelism);

        for worker_id in 0..self.parallelism {
            let queue = Arc::clone(&queue);
            let upgrader = ServiceUpgrader::new(
                Arc::clone(&self.api),
                Arc::clone(&self.directory),
                self.poll.clone(),
            );

            workers.push(tokio::spawn(async move {
                let mut results = Vec::new();
                loop {
                    // The guard is released before the job runs.
                    let job = { queue.lock().await.recv().await };
                    let job = match job {
                        Some(job) => job,
                        None => {
                            debug!("Worker {} exiting: queue closed", worker_id);
                            break;
                        }
                    };

                    debug!("Worker {} picked up service {}", worker_id, job.service_name);
                    let outcome = upgrader.upgrade_service(&job).await;
                    results.push((job.service_name, outcome));
                }
                results
            }));
        }

        for joined in join_all(workers).await {
            match joined {
                Ok(results) => {
                    for (service, outcome) in results {
                        summary.record(&service, outcome);
                    }
                }
                Err(e) => warn!("Worker task failed: {}", e),
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_jobs_constructs_image_references() {
        let services = vec!["web".to_string(), "worker".to_string()];
        let jobs = build_jobs(&services, "registry.example.com/", "v2");

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].service_name, "web");
        assert_eq!(jobs[0].image, "registry.example.com/web:v2");
        assert_eq!(jobs[1].image, "registry.example.com/worker:v2");
    }

    #[test]
    fn test_build_jobs_empty_selection() {
        let jobs = build_jobs(&[], "registry.example.com/", "v2");
        assert!(jobs.is_empty());
    }
}
