//! Device command handlers.

use tabled::Tabled;
use zta_core::{Console, Device, DeviceMode, DeviceType};

use crate::cli::{
    DeviceModeArg, DeviceTypeArg, DevicesArgs, DevicesCommand, GlobalOpts, OutputFormat,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Device ID")]
    id: String,
    #[tabled(rename = "Type")]
    device_type: &'static str,
    #[tabled(rename = "Mode")]
    mode: &'static str,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.device_id.to_string(),
            device_type: d.device_type.as_str(),
            mode: d.mode.as_str(),
        }
    }
}

impl From<DeviceTypeArg> for DeviceType {
    fn from(arg: DeviceTypeArg) -> Self {
        match arg {
            DeviceTypeArg::Thermostat => Self::Thermostat,
            DeviceTypeArg::Camera => Self::Camera,
            DeviceTypeArg::Lock => Self::Lock,
        }
    }
}

impl From<DeviceModeArg> for DeviceMode {
    fn from(arg: DeviceModeArg) -> Self {
        match arg {
            DeviceModeArg::Insecure => Self::Insecure,
            DeviceModeArg::Secure => Self::Secure,
            DeviceModeArg::Replay => Self::Replay,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let registry = console.devices();

    match args.command {
        DevicesCommand::List => {
            let spinner = util::spinner(global, "Fetching devices...");
            let result = registry.list().await;
            spinner.finish_and_clear();
            let devices = result?;

            let skipped = registry.skipped_records();
            if skipped > 0 {
                util::status(
                    global,
                    &format!(
                        "Warning: {skipped} gateway record(s) hidden: unknown device type or mode (see -v)"
                    ),
                );
            }
            if devices.is_empty() && global.output_format() == OutputFormat::Table {
                util::status(global, "No devices registered. Add one with: zta devices add <ID>");
                return Ok(());
            }
            let out = output::render_list(
                global.output_format(),
                &devices,
                |d: &Device| DeviceRow::from(d),
                |d| d.device_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add {
            device_id,
            device_type,
            mode,
        } => {
            let spinner = util::spinner(global, &format!("Adding device {device_id}..."));
            let result = registry
                .add(&device_id, device_type.into(), mode.into())
                .await;
            spinner.finish_and_clear();
            result?;

            util::status(global, &format!("Device '{device_id}' added"));
            warn_if_stale(console, global);
            Ok(())
        }

        DevicesCommand::Remove { device_id } => {
            if !util::confirm(
                &format!("Remove device {device_id}?"),
                "devices remove",
                global.yes,
            )? {
                return Ok(());
            }

            let spinner = util::spinner(global, &format!("Removing device {device_id}..."));
            let result = registry.remove(&device_id).await;
            spinner.finish_and_clear();
            result?;

            util::status(global, &format!("Device '{device_id}' removed"));
            warn_if_stale(console, global);
            Ok(())
        }
    }
}

/// The change went through but the follow-up listing did not.
fn warn_if_stale(console: &Console, global: &GlobalOpts) {
    let view = console.devices().view();
    if let (true, Some(error)) = (view.stale, view.error) {
        util::status(
            global,
            &format!("Warning: could not refresh the device list: {error}"),
        );
    }
}
