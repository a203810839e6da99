use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use jobpool::prelude::{pool_size, DEFAULT_POOL_MULTIPLIER};

/// Write a default configuration file.
#[derive(Parser)]
pub struct InitCommand {
    /// Where to write the configuration.
    #[arg(short, long, default_value = "jobpool.toml")]
    pub path: PathBuf,

    /// Worker count to write (defaults to 8 per available core).
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self) -> Result<()> {
        let workers = self
            .workers
            .unwrap_or_else(|| pool_size(DEFAULT_POOL_MULTIPLIER));
        write_config(&self.path, workers, self.force)?;
        println!("Wrote {}", self.path.display());
        Ok(())
    }
}

fn write_config(path: &Path, workers: usize, force: bool) -> Result<()> {
    if workers == 0 {
        anyhow::bail!("--workers must be at least 1");
    }
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    std::fs::write(path, render_config(workers))?;
    Ok(())
}

fn render_config(workers: usize) -> String {
    format!(
        r#"[pool]
# Fixed number of workers.
workers = {workers}

[logging]
# Overridden by RUST_LOG when set.
level = "info"
json_format = false
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobpool::JobPoolConfig;

    #[test]
    fn test_written_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobpool.toml");

        write_config(&path, 6, false).unwrap();

        let config = JobPoolConfig::from_file(&path).unwrap();
        assert_eq!(config.pool.workers, 6);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_existing_file_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobpool.toml");
        std::fs::write(&path, "[pool]\nworkers = 1\n").unwrap();

        assert!(write_config(&path, 2, false).is_err());
        write_config(&path, 2, true).unwrap();

        let config = JobPoolConfig::from_file(&path).unwrap();
        assert_eq!(config.pool.workers, 2);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_config(&dir.path().join("jobpool.toml"), 0, false).is_err());
    }
}
