//! Local Cache CLI - get and set values in a persistent file cache
//!
//! Usage:
//!   local_cache set <key> <value>
//!   local_cache get <key>
//!   local_cache path <key>
//!   local_cache stats
//!
//! `stats` reports the number of files on disk; its hit and miss counters
//! only cover the current invocation, so they are always zero.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use local_cache::{Config, FileCache};

const USAGE: &str = "usage: local_cache <set KEY VALUE | get KEY | path KEY | stats>";

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    /// `get` found nothing under the key
    Absent,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::Absent => ExitCode::FAILURE,
        }
    }
}

/// Entry point for the cache CLI.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber (stderr, so stdout only carries values)
/// 2. Load configuration from environment variables
/// 3. Open the file cache at `$CACHE_DIR/$CACHE_PREFIX`
/// 4. Run the requested command
fn main() -> ExitCode {
    // Defaults to "info"; override with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "local_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_env();
    debug!(?config, "configuration loaded");

    match run(&args, &config, &mut std::io::stdout().lock()) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Runs one command against the file cache described by `config`.
fn run(args: &[String], config: &Config, out: &mut impl Write) -> anyhow::Result<Outcome> {
    let cache = FileCache::with_config(config.file_cache_config())
        .context("failed to open file cache")?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["set", key, value] => {
            cache
                .set(key, value.as_bytes())
                .with_context(|| format!("failed to set {key:?}"))?;
            info!(key, "value stored");
        }
        ["get", key] => match cache.get(key) {
            Some(payload) => {
                out.write_all(&payload)?;
                writeln!(out)?;
            }
            None => return Ok(Outcome::Absent),
        },
        ["path", key] => {
            writeln!(out, "{}", cache.path_for(key).display())?;
        }
        ["stats"] => {
            let stats = serde_json::to_string_pretty(&cache.stats())?;
            writeln!(out, "{stats}")?;
        }
        _ => bail!(USAGE),
    }

    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        Config {
            cache_dir: dir.path().to_path_buf(),
            prefix: "cli".to_string(),
            ..Config::default()
        }
    }

    fn run_cli(config: &Config, args: &[&str]) -> (anyhow::Result<Outcome>, String) {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut out = Vec::new();
        let result = run(&args, config, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let (result, out) = run_cli(&config, &["set", "greeting", "hello"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert!(out.is_empty());

        let (result, out) = run_cli(&config, &["get", "greeting"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "hello\n");
        assert_eq!(
            std::fs::read(dir.path().join("cli").join("greeting.cache")).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_get_missing_is_absent() {
        let dir = TempDir::new().unwrap();

        let (result, out) = run_cli(&test_config(&dir), &["get", "missing"]);

        assert_eq!(result.unwrap(), Outcome::Absent);
        assert!(out.is_empty());
    }

    #[test]
    fn test_path() {
        let dir = TempDir::new().unwrap();

        let (result, out) = run_cli(&test_config(&dir), &["path", "a/b"]);

        assert_eq!(result.unwrap(), Outcome::Done);
        let expected = dir.path().join("cli").join("a%2Fb.cache");
        assert_eq!(out.trim_end(), expected.display().to_string());
    }

    #[test]
    fn test_stats_json() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        run_cli(&config, &["set", "a", "1"]).0.unwrap();
        run_cli(&config, &["set", "b", "2"]).0.unwrap();

        let (result, out) = run_cli(&config, &["stats"]);

        assert_eq!(result.unwrap(), Outcome::Done);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["total_entries"], 2);
        assert_eq!(json["hits"], 0);
        assert_eq!(json["hit_rate"], 0.0);
    }

    #[test]
    fn test_usage_errors() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let cases: [&[&str]; 4] = [&[], &["get"], &["set", "k"], &["frobnicate", "k"]];
        for args in cases {
            let (result, _) = run_cli(&config, args);
            let err = result.unwrap_err();
            assert!(err.to_string().starts_with("usage:"), "{args:?}: {err}");
        }
    }

    #[test]
    fn test_set_empty_value_fails() {
        let dir = TempDir::new().unwrap();

        let (result, _) = run_cli(&test_config(&dir), &["set", "k", ""]);

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("empty payload"));
    }
}
