//! Thumbnail and preview geometry plus render-URL construction.
//!
//! Dimensions come from probing the remote image when possible; probed
//! values are clamped to a fixed ceiling before the thumbnail geometry is
//! derived, and a thumbnail never exceeds the image it previews.

use url::form_urlencoded;

/// Ceiling applied to probed image dimensions before deriving previews.
pub const MAX_IMAGE_WIDTH: u32 = 800;
pub const MAX_IMAGE_HEIGHT: u32 = 600;

/// Parameters for one rendered image URL.
#[derive(Debug, Clone)]
pub struct RenderSpec<'a> {
    /// Render service endpoint; may be a bare path.
    pub endpoint: &'a str,
    /// Source key inside the container.
    pub src: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: &'a str,
    pub quality: u32,
    pub auth_token: &'a str,
    pub context_key: &'a str,
    pub source_id: u32,
}

/// Effective image dimensions: probed values clamped to the ceiling, or the
/// configured fallback when probing failed.
pub fn image_dimensions(probed: Option<(u32, u32)>, fallback: (u32, u32)) -> (u32, u32) {
    match probed {
        Some((w, h)) => (w.min(MAX_IMAGE_WIDTH), h.min(MAX_IMAGE_HEIGHT)),
        None => fallback,
    }
}

/// Thumbnail geometry: the configured thumb size, shrunk so neither axis
/// exceeds the image itself.
pub fn thumb_dimensions(configured: (u32, u32), image: (u32, u32)) -> (u32, u32) {
    (configured.0.min(image.0), configured.1.min(image.1))
}

/// Build the render-service URL for one image variant.
pub fn render_url(spec: &RenderSpec<'_>) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("src", spec.src)
        .append_pair("w", &spec.width.to_string())
        .append_pair("h", &spec.height.to_string())
        .append_pair("f", spec.format)
        .append_pair("q", &spec.quality.to_string())
        .append_pair("HTTP_MODAUTH", spec.auth_token)
        .append_pair("wctx", spec.context_key)
        .append_pair("source", &spec.source_id.to_string())
        .finish();
    format!("{}?{}", spec.endpoint, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probed_dimensions_are_clamped_to_the_ceiling() {
        assert_eq!(image_dimensions(Some((1920, 1080)), (400, 300)), (800, 600));
        assert_eq!(image_dimensions(Some((640, 480)), (400, 300)), (640, 480));
    }

    #[test]
    fn failed_probe_falls_back_to_configured_defaults() {
        assert_eq!(image_dimensions(None, (400, 300)), (400, 300));
    }

    #[test]
    fn thumbnail_never_exceeds_the_image() {
        assert_eq!(thumb_dimensions((80, 60), (640, 480)), (80, 60));
        assert_eq!(thumb_dimensions((80, 60), (40, 480)), (40, 60));
        assert_eq!(thumb_dimensions((80, 60), (640, 20)), (80, 20));
    }

    #[test]
    fn render_url_carries_all_parameters() {
        let url = render_url(&RenderSpec {
            endpoint: "/connectors/system/render.php",
            src: "a/b c.jpg",
            width: 80,
            height: 60,
            format: "png",
            quality: 90,
            auth_token: "tok123",
            context_key: "web",
            source_id: 7,
        });
        assert!(url.starts_with("/connectors/system/render.php?"));
        assert!(url.contains("src=a%2Fb+c.jpg"));
        assert!(url.contains("w=80"));
        assert!(url.contains("h=60"));
        assert!(url.contains("f=png"));
        assert!(url.contains("q=90"));
        assert!(url.contains("HTTP_MODAUTH=tok123"));
        assert!(url.contains("wctx=web"));
        assert!(url.contains("source=7"));
    }
}
