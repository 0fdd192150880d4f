//! Crawler classification from the `User-Agent` header.
//!
//! Crawlers do not run client-side completion logic, so they must receive a
//! fully settled document instead of a streamed shell.

use std::sync::LazyLock;

use regex::Regex;

/// Decides whether a request comes from an automated crawler.
pub trait BotClassifier: Send + Sync {
    fn is_bot(&self, user_agent: &str) -> bool;
}

/// Fragments that identify crawlers, previewers and scripted clients.
const BOT_PATTERNS: &[&str] = &[
    r"bot\b",
    r"bot[/_\-;]",
    r"crawl",
    r"spider",
    r"slurp",
    r"archiver",
    r"facebookexternalhit",
    r"embedly",
    r"preview",
    r"headless",
    r"lighthouse",
    r"pingdom",
    r"^curl/",
    r"^wget",
    r"python-requests",
    r"httpclient",
    r"^java/",
    r"^go-http-client",
];

/// Browser fragments that would otherwise hit a crawler pattern.
///
/// Removed from the user agent before matching.
const BROWSER_EXCLUSIONS: &[&str] = &[
    // CUBOT phones
    r"cubot",
];

static BOT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!("(?i)(?:{})", BOT_PATTERNS.join("|"));
    Regex::new(&pattern).expect("bot patterns are valid regular expressions")
});

static EXCLUSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!("(?i)(?:{})", BROWSER_EXCLUSIONS.join("|"));
    Regex::new(&pattern).expect("browser exclusions are valid regular expressions")
});

/// Default classifier matching common crawler user agents.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAgentClassifier;

impl BotClassifier for UserAgentClassifier {
    fn is_bot(&self, user_agent: &str) -> bool {
        let user_agent = user_agent.trim();
        if user_agent.is_empty() {
            return false;
        }
        BOT_REGEX.is_match(&EXCLUSION_REGEX.replace_all(user_agent, ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_bot(ua: &str) -> bool {
        UserAgentClassifier.is_bot(ua)
    }

    #[test]
    fn test_detects_search_crawlers() {
        assert!(is_bot("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"));
        assert!(is_bot("Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)"));
        assert!(is_bot("Mozilla/5.0 (compatible; Yahoo! Slurp; http://help.yahoo.com/help/us/ysearch/slurp)"));
        assert!(is_bot("facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)"));
    }

    #[test]
    fn test_detects_scripted_clients() {
        assert!(is_bot("curl/8.4.0"));
        assert!(is_bot("python-requests/2.31.0"));
        assert!(is_bot("Mozilla/5.0 (X11; Linux x86_64) HeadlessChrome/120.0.0.0"));
    }

    #[test]
    fn test_browsers_are_not_bots() {
        assert!(!is_bot(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15"
        ));
        assert!(!is_bot(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0"
        ));
    }

    #[test]
    fn test_cubot_phones_are_not_bots() {
        assert!(!is_bot(
            "Mozilla/5.0 (Linux; Android 9; CUBOT X20 PRO) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.136 Mobile Safari/537.36"
        ));
        assert!(!is_bot(
            "Mozilla/5.0 (Linux; Android 10; CUBOT_X30) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.45 Mobile Safari/537.36"
        ));
        assert!(is_bot("Mozilla/5.0 (Linux; Android 9; CUBOT X20 PRO) Googlebot/2.1"));
    }

    #[test]
    fn test_empty_user_agent_is_not_bot() {
        assert!(!is_bot(""));
        assert!(!is_bot("   "));
    }
}
