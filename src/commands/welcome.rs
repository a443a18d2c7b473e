use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use tracing::error;

use crate::{Context, Error};

/// Sets the channel where welcome messages will be sent
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn set_welcome_channel(
    ctx: Context<'_>,
    #[description = "The channel to send welcome messages in"]
    #[channel_types("Text", "News")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("This command can only be used in a server.").await?;
        return Ok(());
    };

    let reply = match ctx
        .data()
        .store
        .set_welcome_channel(guild_id.get(), channel.id.get())
        .await
    {
        Ok(()) => format!("Welcome channel has been set to {}", channel.mention()),
        Err(e) => {
            error!("Failed to save welcome channel for guild {}: {}", guild_id, e);
            "Failed to save configuration.".to_string()
        }
    };

    ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
        .await?;

    Ok(())
}

/// Shows where welcome messages are sent
#[poise::command(slash_command, guild_only)]
pub async fn welcome_channel(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("This command can only be used in a server.").await?;
        return Ok(());
    };

    let reply = match ctx.data().store.welcome_channel(guild_id.get()).await {
        Ok(Some(channel_id)) => format!("Welcome messages are sent to <#{}>", channel_id),
        Ok(None) => "No welcome channel is set. I'll look for a channel named like \
                     `welcome`, `joins` or `greet`."
            .to_string(),
        Err(e) => {
            error!("Failed to read welcome config for guild {}: {}", guild_id, e);
            "Failed to fetch configuration.".to_string()
        }
    };

    ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
        .await?;

    Ok(())
}
