use poise::serenity_prelude as serenity;

use crate::utils::config::colors;

/// Welcome embed plus the mention that goes above it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingMessage {
    pub mention: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub footer: String,
}

impl GreetingMessage {
    pub fn to_message(&self) -> serenity::CreateMessage {
        let mut embed = serenity::CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(colors::WELCOME)
            .footer(serenity::CreateEmbedFooter::new(&self.footer));

        if let Some(url) = &self.image_url {
            embed = embed.image(url);
        }

        serenity::CreateMessage::new()
            .content(&self.mention)
            .embed(embed)
    }
}

/// What happened to a single member join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Sent { channel_id: u64 },
    NoWelcomeChannel,
    DispatchFailed { channel_id: u64, reason: String },
    GuildUnavailable,
}
