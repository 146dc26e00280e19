//! `list` command: browse deployments, their placements and placement events

use crate::account::load_account;
use crate::client::{DeploymentQuery, FleetClient};
use crate::error::{CliError, CliResult};
use crate::output::{self, print_info};
use crate::prompt::{with_spinner, Choice, Chooser, ChooserState};
use crate::render;
use clap::Args;
use colored::*;
use fleet_types::*;
use serde::Serialize;
use serde_json::Value;
use std::net::Ipv4Addr;
use tabled::Tabled;
use tracing::info;

/// Filters for the `list` command
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show deployments whose id starts with this prefix
    #[arg(value_parser = parse_id_prefix)]
    pub deployment_id_prefix: Option<String>,

    /// Filter by location
    #[arg(long, value_parser = parse_non_empty)]
    pub location: Option<String>,

    /// Filter by image reference
    #[arg(long, value_parser = parse_non_empty)]
    pub image: Option<String>,

    /// Filter by deployment state
    #[arg(long, value_enum)]
    pub state: Option<DeploymentState>,

    /// Filter by public IPv4 address
    #[arg(long)]
    pub ipv4: Option<Ipv4Addr>,
}

impl ListArgs {
    /// Filters the service evaluates
    pub fn query(&self) -> DeploymentQuery {
        DeploymentQuery {
            location: self.location.clone(),
            image: self.image.clone(),
            state: self.state,
            ipv4: self.ipv4,
        }
    }

    /// Client-side id prefix check
    pub fn matches(&self, deployment: &Deployment) -> bool {
        self.deployment_id_prefix
            .as_deref()
            .map_or(true, |prefix| deployment.id.has_prefix(prefix))
    }
}

fn parse_id_prefix(raw: &str) -> Result<String, String> {
    let prefix = raw.trim();
    if prefix.is_empty() {
        return Err("deployment id prefix must not be empty".into());
    }
    if let Some(c) = prefix
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("invalid character '{}' in deployment id prefix", c));
    }
    Ok(prefix.to_string())
}

fn parse_non_empty(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        Err("value must not be empty".into())
    } else {
        Ok(value.to_string())
    }
}

/// How results are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pretty JSON on stdout
    Json,
    /// Plain table for pipes and redirects
    Table,
    /// Choosers with refresh
    Interactive,
}

/// Table row for deployment display
#[derive(Debug, Serialize, Tabled)]
struct DeploymentRow {
    /// Deployment ID (short form)
    id: String,
    /// Name or image
    name: String,
    /// Image reference
    image: String,
    /// Location
    location: String,
    /// Lifecycle state
    state: String,
    /// Public address
    ipv4: String,
    /// Age
    age: String,
}

impl From<&Deployment> for DeploymentRow {
    fn from(d: &Deployment) -> Self {
        Self {
            id: d.id.short().to_string(),
            name: d.name.clone().unwrap_or_else(|| "-".to_string()),
            image: d.image.clone(),
            location: d.location.clone(),
            state: d.state.to_string(),
            ipv4: d
                .ipv4
                .map(|ip| ip.to_string())
                .unwrap_or_else(|| "-".to_string()),
            age: humanize_duration(chrono::Utc::now() - d.created_at),
        }
    }
}

fn humanize_duration(duration: chrono::Duration) -> String {
    if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        format!("{}s", duration.num_seconds().max(0))
    }
}

/// JSON document for a listing: the lone match with its placements, or the array.
/// Records are emitted exactly as the service sent them.
pub fn json_listing(
    mut deployments: Vec<Record<Deployment>>,
    placements: Option<Vec<Record<Placement>>>,
) -> Value {
    if deployments.len() == 1 {
        if let Some(placements) = placements {
            let mut value = deployments.remove(0).into_raw();
            if let Value::Object(map) = &mut value {
                map.insert(
                    "placements".to_string(),
                    Value::Array(placements.into_iter().map(Record::into_raw).collect()),
                );
            }
            return value;
        }
    }
    Value::Array(deployments.into_iter().map(Record::into_raw).collect())
}

fn no_matches() -> CliError {
    CliError::NotFound("no deployments match the given filters".into())
}

async fn fetch_deployments(
    client: &FleetClient,
    args: &ListArgs,
) -> CliResult<Vec<Record<Deployment>>> {
    let mut deployments = client.list_deployments(&args.query()).await?;
    deployments.retain(|d| args.matches(d));
    Ok(deployments)
}

/// Execute the list command
pub async fn execute(args: ListArgs, client: &FleetClient, mode: OutputMode) -> CliResult<()> {
    let account = load_account(client, mode == OutputMode::Interactive).await?;

    match mode {
        OutputMode::Json => {
            let deployments = fetch_deployments(client, &args).await?;
            let placements = match deployments.as_slice() {
                [only] => Some(client.list_placements(&only.id).await?),
                _ => None,
            };
            output::print_json(&json_listing(deployments, placements))
        }

        OutputMode::Table => {
            let deployments = fetch_deployments(client, &args).await?;
            if deployments.is_empty() {
                return Err(no_matches());
            }
            output::print_table(
                deployments
                    .iter()
                    .map(|d| DeploymentRow::from(&**d))
                    .collect::<Vec<_>>(),
            );
            Ok(())
        }

        OutputMode::Interactive => {
            print_info(&format!("Signed in as {}", account.display_name().bold()));
            browse_deployments(client, &args).await
        }
    }
}

async fn browse_deployments(client: &FleetClient, args: &ListArgs) -> CliResult<()> {
    let mut deployments =
        with_spinner("Loading deployments...", true, fetch_deployments(client, args)).await?;
    match deployments.as_slice() {
        [] => return Err(no_matches()),
        [only] => return browse_placements(client, only).await,
        _ => {}
    }

    let chooser = Chooser::new("Select a deployment");
    let mut state = ChooserState::new(deployments.len());
    let mut last_refresh = None;

    loop {
        let options = render::deployment_options(&deployments, last_refresh);

        match chooser.interact(&options, &mut state)? {
            Choice::Selected(index) => browse_placements(client, &deployments[index]).await?,
            Choice::Refresh => {
                deployments =
                    with_spinner("Refreshing deployments...", true, fetch_deployments(client, args))
                        .await?;
                last_refresh = Some(chrono::Local::now());
                info!(count = deployments.len(), "refreshed deployments");
            }
            Choice::Back => return Ok(()),
        }
    }
}

async fn browse_placements(
    client: &FleetClient,
    deployment: &Record<Deployment>,
) -> CliResult<()> {
    let mut deployment = deployment.clone();
    let mut placements = with_spinner(
        format!("Loading placements of {}...", deployment.id.short()),
        true,
        client.list_placements(&deployment.id),
    )
    .await?;

    let mut state = ChooserState::new(placements.len());
    let mut last_refresh = None;

    loop {
        let chooser = Chooser::new(format!(
            "Placements of {} ({}, {})",
            deployment.id.short(),
            deployment.label(),
            render::colorize_deployment_state(deployment.state)
        ));
        let options = render::placement_options(&placements, last_refresh);

        match chooser.interact(&options, &mut state)? {
            Choice::Selected(index) => {
                let placement = &placements[index];
                let mut log = render::format_event_log(placement, true);
                if log.is_empty() {
                    log.push("no events".dimmed().to_string());
                }
                chooser.show_and_wait(
                    &format!(
                        "Events of placement {} ({})",
                        placement.id,
                        render::colorize_placement_status(placement.status)
                    ),
                    &log,
                )?;
            }
            Choice::Refresh => {
                let (fresh, fresh_placements) = with_spinner("Refreshing placements...", true, async {
                    let fresh = client.get_deployment(&deployment.id).await?;
                    let placements = client.list_placements(&deployment.id).await?;
                    Ok::<_, CliError>((fresh, placements))
                })
                .await?;
                deployment = fresh;
                placements = fresh_placements;
                last_refresh = Some(chrono::Local::now());
                info!(
                    deployment = %deployment.id,
                    count = placements.len(),
                    "refreshed placements"
                );
            }
            Choice::Back => return Ok(()),
        }
    }
}
