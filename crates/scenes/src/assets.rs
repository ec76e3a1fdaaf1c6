//! Emoji and avatar images for a dialogue.

use common::dialogue::{DialogueData, Side};
use common::error::{ShowcaseError, ShowcaseResult};
use futures::future::join_all;
use layout::DialogueAssets;
use networking::{proxy, Fetcher};
use render::{ImageCache, ImageKey};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Image keys for everything a dialogue references.
///
/// An emoji that failed to load maps to the cache's transparent placeholder;
/// an avatar that failed to load is absent.
#[derive(Clone, Debug)]
pub struct ResolvedAssets {
    emojis: HashMap<String, ImageKey>,
    avatars: HashMap<String, (ImageKey, Side)>,
    placeholder: ImageKey,
}

impl ResolvedAssets {
    /// No images at all.
    pub fn empty(images: &ImageCache) -> Self {
        Self {
            emojis: HashMap::new(),
            avatars: HashMap::new(),
            placeholder: images.placeholder(),
        }
    }

    /// Fetch and decode every emoji and avatar concurrently. Each image
    /// succeeds or fails on its own.
    pub async fn resolve(data: &DialogueData, fetcher: &dyn Fetcher, images: &ImageCache) -> Self {
        let emoji_loads = join_all(
            data.emojies
                .iter()
                .map(|emoji| load_image(fetcher, images, &emoji.url)),
        );
        let avatar_loads = join_all(
            data.avatars
                .iter()
                .map(|avatar| load_image(fetcher, images, &avatar.url)),
        );
        let (emoji_results, avatar_results) = futures::join!(emoji_loads, avatar_loads);

        let mut resolved = Self::empty(images);

        for (emoji, result) in data.emojies.iter().zip(emoji_results) {
            let key = result.unwrap_or_else(|e| {
                warn!(emoji = %emoji.name, url = %emoji.url, error = %e, "Emoji failed to load, using placeholder");
                resolved.placeholder
            });
            resolved.emojis.insert(emoji.name.clone(), key);
        }

        for (avatar, result) in data.avatars.iter().zip(avatar_results) {
            match result {
                Ok(key) => {
                    resolved.avatars.insert(avatar.name.clone(), (key, avatar.position));
                }
                Err(e) => {
                    warn!(speaker = %avatar.name, url = %avatar.url, error = %e, "Avatar failed to load, omitting");
                }
            }
        }

        debug!(
            emojis = resolved.emojis.len(),
            avatars = resolved.avatars.len(),
            "Resolved dialogue assets"
        );
        resolved
    }

    /// Image for an emoji; the placeholder when unknown or failed.
    pub fn emoji(&self, name: &str) -> ImageKey {
        self.emojis.get(name).copied().unwrap_or(self.placeholder)
    }

    /// Avatar image and side for a speaker.
    pub fn avatar(&self, speaker: &str) -> Option<(ImageKey, Side)> {
        self.avatars.get(speaker).copied()
    }

    pub fn placeholder(&self) -> ImageKey {
        self.placeholder
    }

    pub fn emoji_count(&self) -> usize {
        self.emojis.len()
    }

    pub fn avatar_count(&self) -> usize {
        self.avatars.len()
    }
}

impl DialogueAssets for ResolvedAssets {
    fn avatar_side(&self, speaker: &str) -> Option<Side> {
        self.avatar(speaker).map(|(_, side)| side)
    }

    fn has_emoji(&self, name: &str) -> bool {
        self.emojis
            .get(name)
            .is_some_and(|key| *key != self.placeholder)
    }
}

async fn load_image(fetcher: &dyn Fetcher, images: &ImageCache, url: &str) -> ShowcaseResult<ImageKey> {
    let url = proxy::image_url(url);
    if let Some(key) = images.key_for_url(&url) {
        return Ok(key);
    }

    let resource = fetcher
        .fetch(&url)
        .await
        .map_err(|e| ShowcaseError::network(e.to_string()))?;

    images
        .decode_and_cache_url(&url, &resource.data)
        .map_err(|e| ShowcaseError::image(e.to_string()))
}
