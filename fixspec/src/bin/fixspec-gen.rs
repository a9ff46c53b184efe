/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Compiles a FIX dictionary into static Rust tables.
//!
//! ```text
//! fixspec-gen <dictionary.xml> [<output.rs>]
//! ```
//!
//! Without an output path the tables are written to stdout.
//!
//! Environment variables:
//! - `FIXSPEC_TAG_BOUND`: fixed size of each tag sequence table
//! - `FIXSPEC_LENIENT`: keep unresolved members as placeholders instead of failing
//! - `RUST_LOG`: log filter (default `info`)

use anyhow::{Context, Result, bail};
use fixspec::codegen::generate_from_file;
use fixspec::prelude::*;
use std::env;
use std::io::Write;
use std::path::PathBuf;

const USAGE: &str = "usage: fixspec-gen <dictionary.xml> [<output.rs>]";

/// Initializes logging.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Builds the compiler configuration from the environment.
fn compiler_config() -> Result<CompilerConfig> {
    let mut config = CompilerConfig::new();
    if let Ok(raw) = env::var("FIXSPEC_TAG_BOUND") {
        let bound = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid FIXSPEC_TAG_BOUND '{raw}'"))?;
        config = config.with_tag_bound(bound);
    }
    if let Ok(raw) = env::var("FIXSPEC_LENIENT") {
        config = config.with_strict_references(!is_enabled(&raw));
    }
    Ok(config)
}

fn is_enabled(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

fn main() -> Result<()> {
    init_logging();

    let mut args = env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let output = args.next().map(PathBuf::from);
    if args.next().is_some() {
        bail!(USAGE);
    }

    let config = compiler_config()?;
    let code = generate_from_file(&input, &config, &GeneratorConfig::default())
        .with_context(|| format!("failed to generate tables from {}", input.display()))?;

    match output {
        Some(path) => write_artifact(&path, &code)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(code.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_enabled() {
        assert!(is_enabled("1"));
        assert!(is_enabled(" TRUE "));
        assert!(is_enabled("yes"));
        assert!(!is_enabled("0"));
        assert!(!is_enabled("false"));
        assert!(!is_enabled(""));
    }
}
