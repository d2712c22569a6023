//! One-shot initial load: `GET {base-url}/config`.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::entry::ConfigEntry;
use crate::error::Error;
use crate::transport::fetch::FetchClient;
use crate::transport::wire::ConfigsEnvelope;

pub async fn load_initial(
    fetch: &Arc<dyn FetchClient>,
    base_url: &Url,
    sdk_key: &str,
    user_agent: &str,
    timeout: Duration,
) -> Result<Vec<ConfigEntry>, Error> {
    let url = base_url.join("config").map_err(|_| Error::NetworkError {
        message: format!("base-url cannot be joined with 'config': {base_url}"),
        source: None,
    })?;

    let bytes = fetch
        .get(url, sdk_key, user_agent, timeout)
        .await
        .map_err(Error::from_transport)?;

    let envelope: ConfigsEnvelope = serde_json::from_slice(&bytes)?;
    Ok(envelope.configs)
}
