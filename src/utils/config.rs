// Centralized configuration for the greeter bot

/// Environment variable holding the bot token
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "WELCOME_CONFIG_PATH";

/// Default location of the welcome channel overrides
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Channel name keywords, checked in order
pub const WELCOME_KEYWORDS: &[&str] = &["welcome", "joins", "greet"];
pub const RULES_KEYWORDS: &[&str] = &["rules", "rule", "regulation", "📜"];
pub const ANNOUNCEMENT_KEYWORDS: &[&str] = &["announcement", "news", "broadcast", "📢"];
pub const GENERAL_KEYWORDS: &[&str] = &["general", "main", "🗨"];

/// Shown in place of a channel mention when nothing matched
pub const RULES_FALLBACK: &str = "\u{2060}📃｜rules";
pub const ANNOUNCEMENTS_FALLBACK: &str = "\u{2060}📢｜announcements";
pub const GENERAL_FALLBACK: &str = "\u{2060}🗨｜general-chat";

/// Custom emoji used as the bullet in the welcome embed
pub const BULLET_EMOJI_NAME: &str = "emoji_1";
/// Bullet text when the guild has no such emoji
pub const BULLET_FALLBACK: &str = ":emoji_1:";

/// Stands in for the owner's name when it can't be resolved
pub const OWNER_PLACEHOLDER: &str = "the";

/// Discord embed colors
pub mod colors {
    pub const INFO: u32 = 0x3498db;
    pub const WELCOME: u32 = INFO;
}

/// Config file path, honouring the environment override
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase() {
        for set in [WELCOME_KEYWORDS, RULES_KEYWORDS, ANNOUNCEMENT_KEYWORDS, GENERAL_KEYWORDS] {
            for key in set {
                assert_eq!(*key, key.to_lowercase());
            }
        }
    }
}
