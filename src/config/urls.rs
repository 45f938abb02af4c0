//! Release and documentation URLs

/// Placeholder substituted with the pinned version in URL templates
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Default release archive URL template for the processor toolset
pub const DEFAULT_RELEASE_URL_TEMPLATE: &str =
    "https://www.gyan.dev/ffmpeg/builds/packages/ffmpeg-{version}-essentials_build.zip";

/// PyInstaller project homepage (used in doctor suggestions)
pub const PYINSTALLER_HOMEPAGE: &str = "https://pyinstaller.org";

/// Python download page (used in doctor suggestions)
pub const PYTHON_DOWNLOAD: &str = "https://www.python.org/downloads/";

/// Substitute the version into a release URL template
pub fn resolve_release_url(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_release_url_substitutes_version() {
        let url = resolve_release_url(DEFAULT_RELEASE_URL_TEMPLATE, "7.0.2");
        assert!(url.contains("ffmpeg-7.0.2-essentials_build.zip"));
        assert!(!url.contains(VERSION_PLACEHOLDER));
    }

    #[test]
    fn test_resolve_release_url_without_placeholder() {
        let url = resolve_release_url("https://example.com/fixed.zip", "7.0.2");
        assert_eq!(url, "https://example.com/fixed.zip");
    }

    #[test]
    fn test_resolve_release_url_multiple_placeholders() {
        let url = resolve_release_url("https://example.com/{version}/pkg-{version}.zip", "1.2");
        assert_eq!(url, "https://example.com/1.2/pkg-1.2.zip");
    }
}
