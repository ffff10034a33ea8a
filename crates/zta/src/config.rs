//! CLI configuration: thin wrapper around `zta_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--profile, --api-url, --timeout, --output, --color).

use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;

use zta_core::ConsoleConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use zta_config::{Config, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Fill `--output` / `--color` from the config's `[defaults]` when the
/// flags were not given.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = parse_choice::<OutputFormat>("output", &cfg.defaults.output);
    }
    if global.color.is_none() {
        global.color = parse_choice::<ColorMode>("color", &cfg.defaults.color);
    }
}

fn parse_choice<T: ValueEnum>(key: &str, raw: &str) -> Option<T> {
    T::from_str(raw, true)
        .map_err(|_| warn!(key, value = raw, "ignoring unrecognized config default"))
        .ok()
}

/// Translate the active profile + global flags into a `ConsoleConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_console_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<ConsoleConfig, CliError> {
    let (_, mut profile) = cfg.profile(global.profile.as_deref())?;

    // 1. API root (flag > env > profile)
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }

    // 2. Timeout (flag > env > profile > defaults)
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }

    Ok(zta_config::profile_to_console_config(
        &profile,
        &cfg.defaults,
    )?)
}

/// Render a duration the way a user would type it (`"5s"`).
pub fn display_duration(d: Duration) -> String {
    humantime::format_duration(d).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["zta"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let cfg = Config::default();
        let console =
            resolve_console_config(&global(&["--api-url", "http://gw:9000/api", "--timeout", "3"]), &cfg)
                .unwrap();
        assert_eq!(console.base_url.as_str(), "http://gw:9000/api");
        assert_eq!(console.timeout, Duration::from_secs(3));
    }

    #[test]
    fn defaults_fill_missing_flags() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        cfg.defaults.color = "bogus".into();

        let mut opts = global(&[]);
        apply_defaults(&mut opts, &cfg);
        assert_eq!(opts.output_format(), OutputFormat::Yaml);
        assert_eq!(opts.color_mode(), ColorMode::Auto);

        let mut opts = global(&["-o", "json"]);
        apply_defaults(&mut opts, &cfg);
        assert_eq!(opts.output_format(), OutputFormat::Json);
    }
}
