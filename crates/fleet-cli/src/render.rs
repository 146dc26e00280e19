//! Display strings for deployments, placements and their events
//!
//! Styling decisions are made by [`event_style`] so they can be checked
//! without a terminal; [`format_event`] only applies the colors.

use colored::*;
use fleet_types::*;
use std::borrow::Borrow;

/// How an event line is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStyle {
    /// Red with a failure marker
    Failure,
    /// Yellow
    Stopped,
    /// Green
    Started,
    /// No styling
    Plain,
    /// Dimmed
    Dimmed,
}

/// Pick the style for an event given whether it is the last one in its placement
pub fn event_style(kind: EventKind, is_last: bool) -> EventStyle {
    if kind.is_failed_health() {
        EventStyle::Failure
    } else if kind == EventKind::SshStarted {
        EventStyle::Started
    } else if !is_last {
        EventStyle::Dimmed
    } else if kind.is_stop() {
        EventStyle::Stopped
    } else if kind.is_start() {
        EventStyle::Started
    } else {
        EventStyle::Plain
    }
}

fn event_text(event: &PlacementEvent, with_message: bool) -> String {
    let time = event
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S");
    match (&event.message, with_message) {
        (Some(message), true) => format!("{} {}: {}", time, event.kind, message),
        _ => format!("{} {}", time, event.kind),
    }
}

fn paint(text: String, style: EventStyle) -> String {
    match style {
        EventStyle::Failure => format!("{} {}", "✗".red(), text.red()),
        EventStyle::Stopped => text.yellow().to_string(),
        EventStyle::Started => text.green().to_string(),
        EventStyle::Plain => text,
        EventStyle::Dimmed => text.dimmed().to_string(),
    }
}

/// One event line, message included
pub fn format_event(event: &PlacementEvent, is_last: bool) -> String {
    paint(event_text(event, true), event_style(event.kind, is_last))
}

/// Formatted event lines of a placement in chronological order
pub fn format_event_log(placement: &Placement, with_message: bool) -> Vec<String> {
    let events = placement.chronological_events();
    let last = events.len().saturating_sub(1);
    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| {
            if with_message {
                format_event(event, i == last)
            } else {
                paint(event_text(event, false), event_style(event.kind, i == last))
            }
        })
        .collect()
}

pub fn colorize_deployment_state(state: DeploymentState) -> ColoredString {
    let text = state.as_str();
    match state {
        DeploymentState::Running => text.green(),
        DeploymentState::Pending | DeploymentState::Starting | DeploymentState::Stopping => {
            text.yellow()
        }
        DeploymentState::Failed => text.red(),
        DeploymentState::Stopped | DeploymentState::Destroyed | DeploymentState::Unknown => {
            text.dimmed()
        }
    }
}

pub fn colorize_placement_status(status: PlacementStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        PlacementStatus::Running => text.green(),
        PlacementStatus::Scheduled | PlacementStatus::Starting | PlacementStatus::Stopping => {
            text.yellow()
        }
        PlacementStatus::Failed => text.red(),
        PlacementStatus::Stopped | PlacementStatus::Unknown => text.dimmed(),
    }
}

/// Single-line chooser entry for a deployment
pub fn deployment_option(deployment: &Deployment) -> String {
    let ipv4 = deployment
        .ipv4
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {}  {}  {}  {}",
        deployment.id.short().bold(),
        deployment.label(),
        deployment.location,
        colorize_deployment_state(deployment.state),
        ipv4.dimmed()
    )
}

/// Multi-line chooser entry for a placement: header then its event log
pub fn placement_option(placement: &Placement) -> String {
    let mut lines = vec![format!(
        "{}  {}  {}  {}",
        placement.id.short().bold(),
        placement.location,
        placement.host.as_deref().unwrap_or("-"),
        colorize_placement_status(placement.status)
    )];
    if placement.events.is_empty() {
        lines.push(format!("    {}", "no events".dimmed()));
    } else {
        lines.extend(
            format_event_log(placement, false)
                .into_iter()
                .map(|line| format!("    {}", line)),
        );
    }
    lines.join("\n")
}

/// Chooser entries for deployments, stamped with the last refresh time if any
pub fn deployment_options<D: Borrow<Deployment>>(
    deployments: &[D],
    last_refresh: Option<chrono::DateTime<chrono::Local>>,
) -> Vec<String> {
    let mut options: Vec<String> = deployments
        .iter()
        .map(|d| deployment_option(d.borrow()))
        .collect();
    if let Some(at) = last_refresh {
        stamp_refresh(&mut options, at);
    }
    options
}

/// Chooser entries for placements, stamped with the last refresh time if any
pub fn placement_options<P: Borrow<Placement>>(
    placements: &[P],
    last_refresh: Option<chrono::DateTime<chrono::Local>>,
) -> Vec<String> {
    let mut options: Vec<String> = placements
        .iter()
        .map(|p| placement_option(p.borrow()))
        .collect();
    if let Some(at) = last_refresh {
        stamp_refresh(&mut options, at);
    }
    options
}

/// Append the refresh time to the first line of the first entry
pub fn stamp_refresh(options: &mut [String], at: chrono::DateTime<chrono::Local>) {
    let Some(first) = options.first_mut() else {
        return;
    };
    let stamp = format!("  (last refresh: {})", at.format("%H:%M:%S"))
        .dimmed()
        .to_string();
    match first.find('\n') {
        Some(idx) => first.insert_str(idx, &stamp),
        None => first.push_str(&stamp),
    }
}
