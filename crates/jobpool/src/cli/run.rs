use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::info;

use jobpool::prelude::{BoxFuture, Job, JobPoolConfig, JobQueue, PoolConfig};

/// Run the demo workload through a pool.
#[derive(Parser)]
pub struct RunCommand {
    /// Configuration file path.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of workers (overrides config).
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Number of jobs to submit.
    #[arg(short, long, default_value_t = 10)]
    pub jobs: usize,

    /// How long each job sleeps, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    pub job_duration_ms: u64,

    /// Enable debug logging.
    #[arg(long)]
    pub dev: bool,
}

/// Worker count when neither a config file nor --workers is given.
const DEMO_WORKERS: usize = 5;

impl RunCommand {
    /// Execute the run command.
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        jobpool::init_logging(&config.logging).map_err(|e| anyhow::anyhow!("{}", e))?;

        println!();
        println!(
            "  {} v{}",
            style("jobpool").bold().cyan(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "  {} workers, {} jobs of {}ms",
            config.pool.workers, self.jobs, self.job_duration_ms
        );
        println!();

        let drained = run_demo(
            &config.pool,
            self.jobs,
            Duration::from_millis(self.job_duration_ms),
        )
        .await?;

        println!(
            "\n  {} Drained in {:.2?}",
            style("✔").bold().green(),
            drained
        );
        Ok(())
    }

    fn load_config(&self) -> Result<JobPoolConfig> {
        let mut config = match &self.config {
            Some(path) => {
                if !std::path::Path::new(path).exists() {
                    anyhow::bail!(
                        "Configuration file not found: {}\nRun `jobpool init` to create one.",
                        path
                    );
                }
                JobPoolConfig::from_file(path)?
            }
            None => JobPoolConfig {
                pool: PoolConfig {
                    workers: DEMO_WORKERS,
                },
                ..Default::default()
            },
        };

        if let Some(workers) = self.workers {
            config.pool.workers = workers;
        }
        if self.dev {
            config.logging.level = "debug".to_string();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Job that logs its value and then sleeps.
struct DemoJob {
    value: usize,
    duration: Duration,
}

impl Job for DemoJob {
    fn execute(self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            info!(value = self.value, "Processing job");
            tokio::time::sleep(self.duration).await;
        })
    }
}

/// Submit `jobs` demo jobs, stop the pool and return how long the stop took.
async fn run_demo(pool: &PoolConfig, jobs: usize, duration: Duration) -> Result<Duration> {
    let queue = JobQueue::from_config(pool)?;
    queue.start()?;

    for value in 1..=jobs {
        queue.submit(DemoJob { value, duration }).await;
    }

    let stopping = Instant::now();
    queue.stop().await;
    Ok(stopping.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> RunCommand {
        RunCommand {
            config: None,
            workers: None,
            jobs: 10,
            job_duration_ms: 2000,
            dev: false,
        }
    }

    #[test]
    fn test_default_config_uses_demo_workers() {
        let config = command().load_config().unwrap();
        assert_eq!(config.pool.workers, DEMO_WORKERS);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_overrides_applied() {
        let cmd = RunCommand {
            workers: Some(2),
            dev: true,
            ..command()
        };
        let config = cmd.load_config().unwrap();
        assert_eq!(config.pool.workers, 2);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cmd = RunCommand {
            workers: Some(0),
            ..command()
        };
        assert!(cmd.load_config().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let cmd = RunCommand {
            config: Some("/nonexistent/jobpool.toml".to_string()),
            ..command()
        };
        assert!(cmd.load_config().is_err());
    }

    #[test]
    fn test_config_file_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobpool.toml");
        std::fs::write(&path, "[pool]\nworkers = 3\n").unwrap();

        let cmd = RunCommand {
            config: Some(path.display().to_string()),
            ..command()
        };
        assert_eq!(cmd.load_config().unwrap().pool.workers, 3);
    }

    #[tokio::test]
    async fn test_demo_drains_all_jobs() {
        let pool = PoolConfig { workers: 2 };
        let duration = Duration::from_millis(20);

        // Stop returns only after the queued jobs have finished.
        let drained = run_demo(&pool, 4, duration).await.unwrap();
        assert!(drained <= Duration::from_secs(5));
    }
}
