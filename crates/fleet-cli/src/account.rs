//! Account loading
//!
//! Every command starts by confirming the token against the API so that auth
//! problems surface before any listing work.

use crate::client::FleetClient;
use crate::error::{CliError, CliResult};
use crate::prompt::with_spinner;
use fleet_types::Account;
use tracing::debug;

/// Fetch the account behind the configured token, behind a spinner if `show_spinner`
pub async fn load_account(client: &FleetClient, show_spinner: bool) -> CliResult<Account> {
    if !client.has_token() {
        return Err(CliError::Unauthorized(
            "no API token configured; pass --token, set FLEET_TOKEN or add `token` to the config file"
                .into(),
        ));
    }

    let account = with_spinner("Loading account...", show_spinner, client.account()).await?;
    debug!(account = %account.id, "account loaded");
    Ok(account)
}
