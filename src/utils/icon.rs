//! Social platform detection for linktree items.

use std::sync::LazyLock;

use regex::Regex;

/// Icon used when no platform pattern matches.
pub const DEFAULT_ICON: &str = "link";

/// Ordered (pattern, icon) table; the first match wins.
///
/// Resume and document patterns sit before the generic drive patterns so a
/// CV hosted on Google Drive still gets the resume icon.
const ICON_PATTERNS: &[(&str, &str)] = &[
    (r"(^|[/.@])(twitter\.com|x\.com)", "twitter"),
    (r"github\.com", "github"),
    (r"linkedin\.com", "linkedin"),
    (r"instagram\.com", "instagram"),
    (r"youtube\.com|youtu\.be", "youtube"),
    (r"facebook\.com|(^|[/.])fb\.com", "facebook"),
    (r"tiktok\.com", "tiktok"),
    (r"discord\.gg|discord\.com", "discord"),
    (r"twitch\.tv", "twitch"),
    (r"(^|[/.])t\.me/|telegram\.", "telegram"),
    (r"^mailto:", "mail"),
    (r"buymeacoffee\.com", "buymeacoffee"),
    (r"ko-fi\.com", "kofi"),
    (r"medium\.com", "medium"),
    (r"substack\.com", "substack"),
    (r"hashnode\.dev|(^|[/.])dev\.to", "blog"),
    (r"behance\.net", "behance"),
    (r"dribbble\.com", "dribbble"),
    (r"unsplash\.com", "unsplash"),
    (r"figma\.com", "figma"),
    (r"spotify\.com", "spotify"),
    (r"steam(community)?\.com", "steam"),
    (r"whatsapp\.com|(^|[/.])wa\.me", "whatsapp"),
    (r"pinterest\.com", "pinterest"),
    (r"snapchat\.com", "snapchat"),
    (r"reddit\.com", "reddit"),
    (r"vercel\.app|vercel\.com", "vercel"),
    (r"netlify\.app|netlify\.com", "netlify"),
    (r"railway\.app", "railway"),
    (r"render\.com", "render"),
    (r"resume|\bcv\b|curriculum[_-]?vitae", "resume"),
    (r"\.pdf(\?|$)", "document"),
    (r"drive\.google\.com", "drive"),
    (r"docs\.google\.com", "document"),
    (r"notion\.so|notion\.site", "notion"),
    (r"dropbox\.com", "drive"),
];

static ICON_TABLE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ICON_PATTERNS
        .iter()
        .filter_map(|&(pattern, icon)| match Regex::new(pattern) {
            Ok(re) => Some((re, icon)),
            Err(e) => {
                tracing::error!(pattern, error = %e, "Invalid icon pattern");
                None
            }
        })
        .collect()
});

/// Picks an icon identifier for a linktree item URL.
pub fn detect_social_icon(url: &str) -> &'static str {
    let lower = url.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return DEFAULT_ICON;
    }

    ICON_TABLE
        .iter()
        .find(|(re, _)| re.is_match(&lower))
        .map_or(DEFAULT_ICON, |&(_, icon)| icon)
}
