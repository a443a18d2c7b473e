// Welcome handler - greets members as they join a guild

use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use tracing::{debug, error, info, warn};

use crate::models::greeting::{GreetingMessage, JoinOutcome};
use crate::models::guild::{ChannelRef, GuildSnapshot, OwnerName, ResolvedChannels};
use crate::utils::channels::{find_channel, text_channels};
use crate::utils::config::{
    ANNOUNCEMENTS_FALLBACK, ANNOUNCEMENT_KEYWORDS, BULLET_EMOJI_NAME, BULLET_FALLBACK,
    GENERAL_FALLBACK, GENERAL_KEYWORDS, OWNER_PLACEHOLDER, RULES_FALLBACK, RULES_KEYWORDS,
    WELCOME_KEYWORDS,
};
use crate::Data;

/// Handle a new guild member: resolve channels, build the embed, send it
pub async fn handle_member_join(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) -> JoinOutcome {
    // Guard must be dropped before the first await
    let snapshot = match ctx.cache.guild(member.guild_id) {
        Some(guild) => snapshot(&guild),
        None => {
            warn!("Guild {} not in cache, skipping welcome for {}", member.guild_id, member.user.name);
            return JoinOutcome::GuildUnavailable;
        }
    };

    let override_id = match data.store.welcome_channel(snapshot.id).await {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to read welcome config, using channel search: {}", e);
            None
        }
    };

    let channels = resolve_channels(&snapshot, override_id);
    debug!("Resolved channels for guild {}: {:?}", snapshot.id, channels);

    let Some(welcome) = channels.welcome.clone() else {
        warn!(
            "No welcome channel in guild {} ({}); configure one with /set_welcome_channel",
            snapshot.name, snapshot.id
        );
        return JoinOutcome::NoWelcomeChannel;
    };

    let owner = resolve_owner(ctx, &snapshot).await;
    let greeting = build_greeting(
        &snapshot,
        &member.mention().to_string(),
        Some(member.face()),
        &channels,
        &owner,
    );

    let outcome = match serenity::ChannelId::new(welcome.id)
        .send_message(&ctx.http, greeting.to_message())
        .await
    {
        Ok(_) => JoinOutcome::Sent { channel_id: welcome.id },
        Err(e) => JoinOutcome::DispatchFailed {
            channel_id: welcome.id,
            reason: e.to_string(),
        },
    };

    match &outcome {
        JoinOutcome::Sent { channel_id } => {
            info!("Welcomed {} in #{} ({})", member.user.name, welcome.name, channel_id)
        }
        JoinOutcome::DispatchFailed { channel_id, reason } => {
            error!("Failed to send welcome message to {}: {}", channel_id, reason)
        }
        _ => {}
    }

    outcome
}

/// Copy the parts of a cached guild that a join needs
pub fn snapshot(guild: &serenity::Guild) -> GuildSnapshot {
    GuildSnapshot {
        id: guild.id.get(),
        name: guild.name.clone(),
        owner_id: guild.owner_id.get(),
        cached_owner: guild
            .members
            .get(&guild.owner_id)
            .map(|m| m.display_name().to_string()),
        text_channels: text_channels(guild),
        emoji: guild
            .emojis
            .values()
            .find(|e| e.name == BULLET_EMOJI_NAME)
            .map(|e| e.to_string()),
    }
}

/// Resolve the welcome channel and the three linked channels.
///
/// A configured override wins as long as it still exists in the guild.
pub fn resolve_channels(snapshot: &GuildSnapshot, override_id: Option<u64>) -> ResolvedChannels {
    let channels = &snapshot.text_channels;

    let configured = override_id.and_then(|id| {
        let found = snapshot.channel(id);
        if found.is_none() {
            warn!("Configured welcome channel {} no longer exists in guild {}", id, snapshot.id);
        }
        found
    });

    ResolvedChannels {
        welcome: configured
            .or_else(|| find_channel(channels, WELCOME_KEYWORDS))
            .cloned(),
        rules: find_channel(channels, RULES_KEYWORDS).cloned(),
        announcements: find_channel(channels, ANNOUNCEMENT_KEYWORDS).cloned(),
        general: find_channel(channels, GENERAL_KEYWORDS).cloned(),
    }
}

/// Owner display name: cache first, then the API, then nothing
async fn resolve_owner(ctx: &serenity::Context, snapshot: &GuildSnapshot) -> OwnerName {
    let fetched = if snapshot.cached_owner.is_some() || snapshot.owner_id == 0 {
        None
    } else {
        let guild_id = serenity::GuildId::new(snapshot.id);
        let owner_id = serenity::UserId::new(snapshot.owner_id);
        Some(
            ctx.http
                .get_member(guild_id, owner_id)
                .await
                .map(|owner| owner.display_name().to_string()),
        )
    };

    owner_name(snapshot.id, snapshot.cached_owner.as_deref(), fetched)
}

/// Pick the owner name from the cached lookup and the API lookup, in that order.
///
/// A failed fetch is logged and yields `OwnerName::Unknown`.
pub fn owner_name<E: std::fmt::Display>(
    guild_id: u64,
    cached: Option<&str>,
    fetched: Option<Result<String, E>>,
) -> OwnerName {
    if let Some(name) = cached {
        return OwnerName::Cached(name.to_string());
    }

    match fetched {
        Some(Ok(name)) => OwnerName::Fetched(name),
        Some(Err(e)) => {
            warn!("Failed to fetch owner of guild {}: {}", guild_id, e);
            OwnerName::Unknown
        }
        None => OwnerName::Unknown,
    }
}

/// Build the welcome embed for a member
pub fn build_greeting(
    snapshot: &GuildSnapshot,
    member_mention: &str,
    avatar_url: Option<String>,
    channels: &ResolvedChannels,
    owner: &OwnerName,
) -> GreetingMessage {
    let bullet = snapshot.emoji.as_deref().unwrap_or(BULLET_FALLBACK);
    let line = |channel: &Option<ChannelRef>, fallback: &str| {
        let target = match channel {
            Some(c) => c.mention(),
            None => fallback.to_string(),
        };
        format!("{}  {}", bullet, target)
    };

    let description = format!(
        "We hope you enjoy your time here !!!!\n\n{}\n{}\n{}",
        line(&channels.rules, RULES_FALLBACK),
        line(&channels.announcements, ANNOUNCEMENTS_FALLBACK),
        line(&channels.general, GENERAL_FALLBACK),
    );

    let footer = match owner.name() {
        Some(name) => format!("Welcome to {}'s Server!!!", name),
        None => format!("Welcome to {} Server!!!", OWNER_PLACEHOLDER),
    };

    GreetingMessage {
        mention: member_mention.to_string(),
        title: format!("Welcome to {} Server", snapshot.name),
        description,
        image_url: avatar_url,
        footer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild(id: u64, names: &[(u64, &str)]) -> GuildSnapshot {
        GuildSnapshot {
            id,
            name: "Nihongo".to_string(),
            owner_id: 42,
            cached_owner: None,
            text_channels: names.iter().map(|(id, n)| ChannelRef::new(*id, *n)).collect(),
            emoji: None,
        }
    }

    #[test]
    fn test_no_welcome_channel_without_override() {
        let snapshot = guild(1, &[(10, "general-chat"), (11, "📜｜rules")]);
        let channels = resolve_channels(&snapshot, None);

        assert!(channels.welcome.is_none());
        assert_eq!(channels.general.unwrap().id, 10);
        assert_eq!(channels.rules.unwrap().id, 11);
        assert!(channels.announcements.is_none());
    }

    #[test]
    fn test_override_beats_named_channel() {
        let snapshot = guild(123, &[(100, "welcome"), (555, "lobby")]);
        let channels = resolve_channels(&snapshot, Some(555));
        assert_eq!(channels.welcome.unwrap().id, 555);
    }

    #[test]
    fn test_stale_override_falls_back_to_search() {
        let snapshot = guild(123, &[(100, "👋｜welcome")]);
        let channels = resolve_channels(&snapshot, Some(555));
        assert_eq!(channels.welcome.unwrap().id, 100);
    }

    #[test]
    fn test_greeting_uses_fallbacks_without_emoji() {
        let snapshot = guild(1, &[(10, "general")]);
        let channels = resolve_channels(&snapshot, None);
        let greeting = build_greeting(&snapshot, "<@7>", None, &channels, &OwnerName::Unknown);

        let lines: Vec<&str> = greeting.description.lines().collect();
        assert_eq!(lines[0], "We hope you enjoy your time here !!!!");
        assert_eq!(lines[2], format!("{}  {}", BULLET_FALLBACK, RULES_FALLBACK));
        assert_eq!(lines[3], format!("{}  {}", BULLET_FALLBACK, ANNOUNCEMENTS_FALLBACK));
        assert_eq!(lines[4], format!("{}  <#10>", BULLET_FALLBACK));
        assert!(greeting.image_url.is_none());
    }

    #[test]
    fn test_greeting_with_emoji_and_owner() {
        let mut snapshot = guild(1, &[(10, "rules"), (11, "news"), (12, "main")]);
        snapshot.emoji = Some("<:emoji_1:99>".to_string());
        let channels = resolve_channels(&snapshot, None);
        let greeting = build_greeting(
            &snapshot,
            "<@7>",
            Some("https://cdn.discordapp.com/avatars/7/a.png".to_string()),
            &channels,
            &OwnerName::Fetched("Sensei".to_string()),
        );

        assert_eq!(greeting.mention, "<@7>");
        assert_eq!(greeting.title, "Welcome to Nihongo Server");
        let lines: Vec<&str> = greeting.description.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "<:emoji_1:99>  <#10>");
        assert_eq!(lines[3], "<:emoji_1:99>  <#11>");
        assert_eq!(lines[4], "<:emoji_1:99>  <#12>");
        assert!(lines.iter().all(|line| !line.starts_with(BULLET_FALLBACK)));
        assert_eq!(greeting.footer, "Welcome to Sensei's Server!!!");
        assert!(greeting.image_url.is_some());
    }

    #[test]
    fn test_cached_owner_wins() {
        let owner = owner_name(1, Some("Cached"), Some(Ok::<_, String>("Fetched".to_string())));
        assert_eq!(owner, OwnerName::Cached("Cached".to_string()));
    }

    #[test]
    fn test_fetched_owner_when_not_cached() {
        let owner = owner_name(1, None, Some(Ok::<_, String>("Fetched".to_string())));
        assert_eq!(owner, OwnerName::Fetched("Fetched".to_string()));
    }

    #[test]
    fn test_failed_owner_fetch_uses_placeholder() {
        let owner = owner_name(1, None, Some(Err("Unknown Member")));
        assert_eq!(owner, OwnerName::Unknown);
        assert_eq!(owner_name::<String>(1, None, None), OwnerName::Unknown);

        let greeting = build_greeting(&guild(1, &[]), "<@7>", None, &ResolvedChannels::default(), &owner);
        assert_eq!(greeting.footer, "Welcome to the Server!!!");
    }

    #[test]
    fn test_unknown_owner_footer() {
        let snapshot = guild(1, &[]);
        let greeting = build_greeting(
            &snapshot,
            "<@7>",
            None,
            &ResolvedChannels::default(),
            &OwnerName::Unknown,
        );
        assert_eq!(greeting.footer, "Welcome to the Server!!!");
    }
}
