use std::env;
use std::process::Command;

/// Options shared by the cargo commands, read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskConfig {
    /// Build the oracle in release mode for test and verify runs.
    pub release: bool,
    /// Log filter forwarded to the oracle binary as `RUST_LOG`.
    pub log_filter: Option<String>,
}

/// Read [`TaskConfig`] from `FFT_ORACLE_RELEASE` and `FFT_ORACLE_LOG`.
pub fn detect_config() -> TaskConfig {
    let release = env::var("FFT_ORACLE_RELEASE").unwrap_or_default();
    let log = env::var("FFT_ORACLE_LOG").unwrap_or_default();
    compute_config(&release, &log)
}

/// Build a [`TaskConfig`] from raw variable values. Separated for testing.
pub fn compute_config(release: &str, log: &str) -> TaskConfig {
    let release = matches!(release.trim(), "1" | "true" | "yes");
    let log = log.trim();
    TaskConfig {
        release,
        log_filter: (!log.is_empty()).then(|| log.to_string()),
    }
}

pub fn build_command(cfg: &TaskConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["build", "--workspace"]);
    if cfg.release {
        cmd.arg("--release");
    }
    cmd
}

pub fn test_command(cfg: &TaskConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["test", "--workspace"]);
    if cfg.release {
        cmd.arg("--release");
    }
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

/// Run the oracle against the bundled engine, optionally capping the sweep.
pub fn verify_command(cfg: &TaskConfig, max_size: Option<usize>) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-p", "fft-oracle"]);
    if cfg.release {
        cmd.arg("--release");
    }
    cmd.arg("--");
    if let Some(max) = max_size {
        cmd.arg("--max-size").arg(max.to_string());
    }
    if let Some(filter) = &cfg.log_filter {
        cmd.env("RUST_LOG", filter);
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_compute_release() {
        let cfg = compute_config("1", "");
        assert!(cfg.release);
        assert!(cfg.log_filter.is_none());
        assert!(!compute_config("0", "").release);
        assert!(!compute_config("", "").release);
    }

    #[test]
    fn test_compute_log_filter() {
        let cfg = compute_config("", " fft_oracle=debug ");
        assert_eq!(cfg.log_filter.as_deref(), Some("fft_oracle=debug"));
    }

    #[test]
    fn test_release_flag_is_forwarded() {
        let cfg = compute_config("true", "");
        assert!(args(&build_command(&cfg)).contains(&"--release".to_string()));
        assert!(args(&test_command(&cfg)).contains(&"--release".to_string()));
        let plain = TaskConfig::default();
        assert!(!args(&build_command(&plain)).contains(&"--release".to_string()));
    }

    #[test]
    fn test_verify_command() {
        let cfg = compute_config("yes", "info");
        let cmd = verify_command(&cfg, Some(1024));
        let args = args(&cmd);
        assert_eq!(
            args,
            ["run", "-p", "fft-oracle", "--release", "--", "--max-size", "1024"]
        );
        let envs: Vec<_> = cmd
            .get_envs()
            .map(|(k, v)| {
                (
                    k.to_str().unwrap().to_string(),
                    v.unwrap().to_str().unwrap().to_string(),
                )
            })
            .collect();
        assert!(envs.iter().any(|(k, v)| k == "RUST_LOG" && v == "info"));
    }

    #[test]
    fn test_verify_full_sweep() {
        let cmd = verify_command(&TaskConfig::default(), None);
        assert_eq!(args(&cmd).last().map(String::as_str), Some("--"));
        assert_eq!(cmd.get_envs().count(), 0);
    }

    #[test]
    fn test_other_commands() {
        assert!(clippy_command().get_args().any(|a| a == "clippy"));
        assert!(fmt_command().get_args().any(|a| a == "fmt"));
    }
}
