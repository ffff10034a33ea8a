//! Config subcommand handlers.

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, cfg: Config) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => init(global, cfg),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let out = output::render_single(
                global.output_format(),
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |c| {
                    c.profiles
                        .iter()
                        .map(|(name, p)| format!("{name}\t{}", p.api_url))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts, mut cfg: Config) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("ZTA console configuration");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(
            global
                .profile
                .clone()
                .unwrap_or_else(|| zta_config::DEFAULT_PROFILE.into()),
        )
        .interact_text()
        .map_err(prompt_err)?;

    if cfg.profiles.contains_key(&profile_name)
        && !util::confirm(
            &format!("Profile '{profile_name}' exists. Overwrite?"),
            "config init",
            global.yes,
        )?
    {
        return Ok(());
    }

    // 2. API root
    let api_url: String = Input::new()
        .with_prompt("Gateway API URL")
        .default(Profile::default().api_url)
        .validate_with(|input: &String| {
            zta_config::parse_api_url(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    // 3. Timeout
    let timeout: u64 = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(cfg.defaults.timeout)
        .interact_text()
        .map_err(prompt_err)?;

    // 4. Metrics poll interval
    let poll_interval: u64 = Input::new()
        .with_prompt("Metrics refresh interval (seconds, 0 disables)")
        .default(cfg.defaults.poll_interval)
        .interact_text()
        .map_err(prompt_err)?;

    let profile = Profile {
        api_url,
        timeout: (timeout != cfg.defaults.timeout).then_some(timeout),
        poll_interval: (poll_interval != cfg.defaults.poll_interval).then_some(poll_interval),
    };
    // Reject what `devices` / `metrics` would reject later.
    zta_config::profile_to_console_config(&profile, &cfg.defaults)?;

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());

    let path = config::save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: zta devices list");

    Ok(())
}
