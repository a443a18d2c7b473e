// Channel name heuristics

use poise::serenity_prelude as serenity;

use crate::models::guild::ChannelRef;

/// Find a channel matching any keyword, preferring exact name matches.
///
/// Exact matches are searched across every channel before falling back
/// to substring matches. Within a pass the first channel in `channels`
/// order wins.
pub fn find_channel<'a>(channels: &'a [ChannelRef], keywords: &[&str]) -> Option<&'a ChannelRef> {
    let exact = channels.iter().find(|channel| {
        let name = channel.name.to_lowercase();
        keywords.iter().any(|key| *key == name)
    });

    exact.or_else(|| {
        channels.iter().find(|channel| {
            let name = channel.name.to_lowercase();
            keywords.iter().any(|key| name.contains(key))
        })
    })
}

/// Text channels of a guild in the order Discord lists them
pub fn text_channels(guild: &serenity::Guild) -> Vec<ChannelRef> {
    let mut channels: Vec<&serenity::GuildChannel> = guild
        .channels
        .values()
        .filter(|c| matches!(c.kind, serenity::ChannelType::Text | serenity::ChannelType::News))
        .collect();

    channels.sort_by_key(|c| (c.position, c.id));

    channels
        .into_iter()
        .map(|c| ChannelRef::new(c.id.get(), c.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::{GENERAL_KEYWORDS, RULES_KEYWORDS, WELCOME_KEYWORDS};

    fn channels(names: &[&str]) -> Vec<ChannelRef> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ChannelRef::new(i as u64 + 1, *name))
            .collect()
    }

    #[test]
    fn test_exact_beats_earlier_substring() {
        let list = channels(&["rules-archive", "off-topic", "rules"]);
        let found = find_channel(&list, RULES_KEYWORDS).unwrap();
        assert_eq!(found.name, "rules");
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let list = channels(&["general-chat", "General"]);
        let found = find_channel(&list, GENERAL_KEYWORDS).unwrap();
        assert_eq!(found.id, 2);
    }

    #[test]
    fn test_substring_fallback_takes_first_listed() {
        let list = channels(&["memes", "📜｜server-rules", "rule-book"]);
        let found = find_channel(&list, RULES_KEYWORDS).unwrap();
        assert_eq!(found.id, 2);
    }

    #[test]
    fn test_keyword_order_does_not_beat_listing_order() {
        // "rule" is listed after "rules" in the keyword set but its channel comes first
        let list = channels(&["rule", "rules"]);
        let found = find_channel(&list, RULES_KEYWORDS).unwrap();
        assert_eq!(found.id, 1);
    }

    #[test]
    fn test_no_match() {
        let list = channels(&["general-chat", "📜｜rules"]);
        assert!(find_channel(&list, WELCOME_KEYWORDS).is_none());
        assert!(find_channel(&[], WELCOME_KEYWORDS).is_none());
    }

    #[test]
    fn test_emoji_keyword() {
        let list = channels(&["chat", "🗨｜lobby"]);
        assert_eq!(find_channel(&list, GENERAL_KEYWORDS).unwrap().id, 2);
    }
}
