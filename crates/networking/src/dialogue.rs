//! Dialogue data source.

use crate::loader::Fetcher;
use common::dialogue::DialogueData;
use common::error::{ShowcaseError, ShowcaseResult};
use tracing::{info, warn};

/// Remote dialogue endpoint.
pub const DIALOGUE_ENDPOINT: &str =
    "https://private-624120-softgamesassignment.apiary-mock.com/v2/magicwords";

/// Dialogue shipped with the binary, used when the endpoint is unavailable.
pub const BUNDLED_DIALOGUE: &str = include_str!("../data/magicwords.json");

/// Parse the bundled dialogue.
pub fn bundled_dialogue() -> ShowcaseResult<DialogueData> {
    DialogueData::from_json(BUNDLED_DIALOGUE)
        .map_err(|e| ShowcaseError::parse(format!("bundled dialogue: {}", e)))
}

/// Fetch dialogue from `endpoint`, falling back to the bundled copy on any
/// transport, status or parse failure.
pub async fn fetch_dialogue(fetcher: &dyn Fetcher, endpoint: &str) -> ShowcaseResult<DialogueData> {
    match fetcher.fetch(endpoint).await {
        Ok(resource) => match serde_json::from_slice::<DialogueData>(&resource.data) {
            Ok(data) => {
                info!(
                    endpoint,
                    lines = data.dialogue.len(),
                    emojis = data.emojies.len(),
                    avatars = data.avatars.len(),
                    "Fetched dialogue"
                );
                return Ok(data);
            }
            Err(e) => warn!(endpoint, error = %e, "Dialogue payload is malformed, using bundled copy"),
        },
        Err(e) => warn!(endpoint, error = %e, "Dialogue fetch failed, using bundled copy"),
    }

    bundled_dialogue()
}
