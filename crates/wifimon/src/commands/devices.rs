//! Device command handlers.

use tabled::Tabled;
use wifimon_core::present::{DeviceIcon, activity_label, fmt_mb, fmt_timestamp};
use wifimon_core::{CapInput, CoreError, Device, DeviceStat, DeviceUsage, format_cap, parse_cap};

use super::{Ctx, util};
use crate::cli::{DevicesArgs, DevicesCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Data cap")]
    cap: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        let icon = DeviceIcon::for_device(d);
        Self {
            id: d.id,
            name: d.display_name().to_owned(),
            dtype: format!("{} {icon}", icon.glyph()),
            mac: d.mac_address.clone(),
            ip: d.ip_address.clone().unwrap_or_default(),
            status: output::status_label(activity_label(d.is_active), d.is_active, color),
            cap: format_cap(d.data_cap),
            last_seen: fmt_timestamp(d.last_seen.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Uploaded")]
    up: String,
    #[tabled(rename = "Downloaded")]
    down: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&DeviceStat> for StatRow {
    fn from(s: &DeviceStat) -> Self {
        Self {
            time: fmt_timestamp(s.timestamp.as_ref()),
            up: fmt_mb(s.bytes_uploaded),
            down: fmt_mb(s.bytes_downloaded),
            total: fmt_mb(s.total()),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!("ID:           {}", d.id),
        format!("Hostname:     {}", d.hostname.as_deref().unwrap_or("-")),
        format!("MAC:          {}", d.mac_address),
        format!("IP:           {}", d.ip_address.as_deref().unwrap_or("-")),
        format!("Manufacturer: {}", d.manufacturer.as_deref().unwrap_or("-")),
        format!("Type:         {}", DeviceIcon::for_device(d)),
        format!("Status:       {}", activity_label(d.is_active)),
        format!("Data cap:     {}", format_cap(d.data_cap)),
        format!("First seen:   {}", fmt_timestamp(d.first_seen.as_ref())),
        format!("Last seen:    {}", fmt_timestamp(d.last_seen.as_ref())),
    ]
    .join("\n")
}

fn usage_detail(u: &DeviceUsage) -> String {
    [
        format!("Device:     {}", u.device_id),
        format!("Uploaded:   {}", fmt_mb(u.bytes_uploaded)),
        format!("Downloaded: {}", fmt_mb(u.bytes_downloaded)),
        format!("Total:      {}", fmt_mb(u.total_bytes)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: DevicesArgs) -> Result<(), CliError> {
    util::require_login(ctx)?;
    let global = ctx.global;

    match args.command {
        DevicesCommand::List => {
            let devices =
                util::with_spinner(ctx, "Loading devices", ctx.client.list_devices()).await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::new(d, color),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let device = util::found(ctx.client.get_device(id).await, "device", id)?;
            let out = output::render_single(&global.output, &device, detail, |d| {
                d.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Stats { id, hours } => {
            let hours = hours.unwrap_or(ctx.stats_hours);
            let stats = util::found(
                util::with_spinner(ctx, "Loading usage", ctx.client.device_stats(id, hours)).await,
                "device",
                id,
            )?;
            let out = output::render_list(
                &global.output,
                &stats,
                |s| StatRow::from(s),
                |s| s.total().to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::SetCap { id, value } => {
            // Validate before anything goes over the wire.
            let cap = parse_cap(&value).map_err(CoreError::from)?;
            let device = util::found(
                ctx.client.set_device_cap(id, cap.as_option()).await,
                "device",
                id,
            )?;
            let message = match cap {
                CapInput::Clear => format!("✓ Removed data cap from device {id}"),
                CapInput::Set(_) => format!(
                    "✓ Data cap for device {id} set to {}",
                    format_cap(device.data_cap)
                ),
            };
            output::notice(&message, global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete device {id}?"), global.yes)? {
                return Ok(());
            }
            util::found(ctx.client.delete_device(id).await, "device", id)?;
            output::notice(&format!("✓ Device {id} deleted"), global.quiet);
            Ok(())
        }

        DevicesCommand::Usage { id, start, end } => {
            let usage = util::found(
                ctx.client
                    .device_usage(id, start.as_deref(), end.as_deref())
                    .await,
                "device",
                id,
            )?;
            let out = output::render_single(&global.output, &usage, usage_detail, |u| {
                u.total_bytes.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
