//! High-traffic domains that must never fuzzy-match a crisis resource.
//!
//! A short edit distance between a popular site and a crisis domain would
//! silently suppress ordinary browsing, which is itself a privacy violation.
//! Hosts on this list (or any of their subdomains) skip fuzzy matching.
//! Exact matches are checked before the blocklist and are never affected.

/// Domains excluded from fuzzy matching.
pub const FUZZY_BLOCKLIST: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "snapchat.com",
    "reddit.com",
    "discord.com",
    "twitch.tv",
    "roblox.com",
    "minecraft.net",
    "amazon.com",
    "ebay.com",
    "walmart.com",
    "target.com",
    "netflix.com",
    "spotify.com",
    "wikipedia.org",
    "yahoo.com",
    "bing.com",
    "duckduckgo.com",
    "apple.com",
    "microsoft.com",
    "linkedin.com",
    "pinterest.com",
    "whatsapp.com",
    "github.com",
    "khanacademy.org",
];

/// Returns true if `host` is a blocklisted domain or one of its subdomains.
///
/// `host` must already be normalized.
#[must_use]
pub fn is_blocklisted(host: &str) -> bool {
    FUZZY_BLOCKLIST.iter().any(|blocked| {
        host == *blocked
            || host
                .strip_suffix(*blocked)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
