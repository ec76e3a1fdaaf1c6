//! Optional rewrite of image URLs through a PNG-converting proxy.
//!
//! Remote avatar and emoji hosts serve a mix of formats, some of which the
//! decoder cannot read. With the `image-proxy` feature enabled every remote
//! image URL is routed through a proxy that re-encodes it as PNG.

use url::Url;

/// Whether image URLs are proxied in this build.
pub const USE_IMAGE_PROXY: bool = cfg!(feature = "image-proxy");

/// Proxy endpoint.
pub const IMAGE_PROXY_BASE: &str = "https://images.weserv.nl/";

/// Rewrite `url` when the proxy is enabled.
pub fn image_url(url: &str) -> String {
    if USE_IMAGE_PROXY {
        proxy_url(url)
    } else {
        url.to_string()
    }
}

/// Route `url` through the proxy. `data:` and root-relative URLs are returned
/// unchanged.
pub fn proxy_url(url: &str) -> String {
    if url.starts_with("data:") || url.starts_with('/') {
        return url.to_string();
    }

    Url::parse_with_params(
        IMAGE_PROXY_BASE,
        &[("url", url), ("output", "png"), ("filename", "file.png")],
    )
    .map(String::from)
    .unwrap_or_else(|_| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_url_encodes_target() {
        let proxied = proxy_url("https://api.dicebear.com/7.x/avataaars/png?seed=Penny");
        assert!(proxied.starts_with("https://images.weserv.nl/?url=https%3A%2F%2Fapi.dicebear.com"));
        assert!(proxied.ends_with("&output=png&filename=file.png"));
        assert!(proxied.contains("seed%3DPenny"));
    }

    #[test]
    fn test_local_urls_untouched() {
        assert_eq!(proxy_url("/assets/card.png"), "/assets/card.png");
        assert_eq!(proxy_url("data:image/png;base64,AAAA"), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_image_url_follows_feature() {
        let url = "https://cdn.test/x.gif";
        if USE_IMAGE_PROXY {
            assert_ne!(image_url(url), url);
        } else {
            assert_eq!(image_url(url), url);
        }
    }
}
