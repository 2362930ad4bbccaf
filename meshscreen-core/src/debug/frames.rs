//! Snapshot-backed frames

use super::{DebugFrame, DebugSnapshot};
use crate::screen::render::Painter;
use crate::traits::{DisplayError, DisplaySurface};

/// Rows of message body shown on the text message frame
const MESSAGE_LINES: usize = 4;

pub(super) fn draw<D: DisplaySurface>(
    snapshot: &DebugSnapshot,
    surface: &mut D,
    frame: DebugFrame,
    x: i16,
    y: i16,
) -> Result<(), DisplayError> {
    let mut painter = Painter::new(surface, x, y);
    match frame {
        DebugFrame::Status => draw_status(snapshot, &mut painter),
        DebugFrame::Settings => draw_settings(snapshot, &mut painter),
        DebugFrame::WiFi => draw_wifi(snapshot, &mut painter),
        DebugFrame::TextMessage => draw_message(snapshot, &mut painter),
    }
}

fn draw_status<D: DisplaySurface>(
    snapshot: &DebugSnapshot,
    painter: &mut Painter<'_, D>,
) -> Result<(), DisplayError> {
    let battery = &snapshot.battery;
    if battery.has_battery {
        painter.line_fmt(format_args!(
            "Batt {}% {}mV{}",
            battery.percent,
            battery.millivolts,
            if battery.charging { " +" } else { "" }
        ))?;
    } else if battery.usb_power {
        painter.line("USB power")?;
    } else {
        painter.line("No battery")?;
    }

    painter.line_fmt(format_args!(
        "Nodes {}/{}",
        snapshot.nodes.online, snapshot.nodes.total
    ))?;

    let gps = &snapshot.gps;
    if !gps.connected {
        painter.line("No GPS")?;
    } else if !gps.has_lock {
        painter.line("No GPS lock")?;
    } else {
        painter.line_fmt(format_args!("GPS fix {} sats", gps.satellites))?;
    }

    let up = snapshot.uptime_s;
    painter.line_fmt(format_args!(
        "Up {}:{:02}:{:02}",
        up / 3600,
        (up / 60) % 60,
        up % 60
    ))
}

fn draw_settings<D: DisplaySurface>(
    snapshot: &DebugSnapshot,
    painter: &mut Painter<'_, D>,
) -> Result<(), DisplayError> {
    if snapshot.channel.is_empty() {
        painter.line("Channel -")?;
    } else {
        painter.line_fmt(format_args!("Channel {}", snapshot.channel.as_str()))?;
    }

    let gps = &snapshot.gps;
    if gps.has_lock {
        let (lat_sign, lat_deg, lat_frac) = split_coordinate(gps.latitude_e7);
        let (lon_sign, lon_deg, lon_frac) = split_coordinate(gps.longitude_e7);
        painter.line_fmt(format_args!("Lat {}{}.{:05}", lat_sign, lat_deg, lat_frac))?;
        painter.line_fmt(format_args!("Lon {}{}.{:05}", lon_sign, lon_deg, lon_frac))?;
        painter.line_fmt(format_args!("Alt {}m", gps.altitude_m))
    } else {
        painter.line("Position unknown")
    }
}

fn draw_wifi<D: DisplaySurface>(
    snapshot: &DebugSnapshot,
    painter: &mut Painter<'_, D>,
) -> Result<(), DisplayError> {
    let wifi = &snapshot.wifi;
    if !wifi.configured {
        painter.line("WiFi off")
    } else if wifi.connected {
        let [a, b, c, d] = wifi.ip;
        painter.line("WiFi connected")?;
        painter.line_fmt(format_args!("IP {}.{}.{}.{}", a, b, c, d))
    } else {
        painter.line("WiFi connecting")
    }
}

fn draw_message<D: DisplaySurface>(
    snapshot: &DebugSnapshot,
    painter: &mut Painter<'_, D>,
) -> Result<(), DisplayError> {
    match &snapshot.last_message {
        Some(message) => {
            let age_s = snapshot.uptime_s.saturating_sub(message.received_s);
            painter.line_fmt(format_args!("From !{:08x} {}s", message.from, age_s))?;
            painter.paragraph(&message.text, MESSAGE_LINES)
        }
        None => painter.line("No messages"),
    }
}

/// Split a 1e-7 degree value into sign, whole degrees and 1e-5 fraction
fn split_coordinate(value_e7: i32) -> (&'static str, u32, u32) {
    let sign = if value_e7 < 0 { "-" } else { "" };
    let abs = value_e7.unsigned_abs();
    (sign, abs / 10_000_000, (abs % 10_000_000) / 100)
}
