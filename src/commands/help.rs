// Help command - show usage guide

use poise::serenity_prelude as serenity;
use crate::{Context, Error};
use crate::utils::config::colors;

/// Show help and usage guide
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("👋 Greeter Bot - Help")
        .description("Welcomes new members with links to the channels that matter")
        .color(colors::INFO)
        .field(
            "⚙️ Configuration",
            "`/set_welcome_channel` - Choose where welcome messages go\n\
            `/welcome_channel` - Show the current welcome channel",
            false,
        )
        .field(
            "🔎 Channel Search",
            "Without a configured channel, the first channel named like \
            `welcome`, `joins` or `greet` is used.\n\
            Rules, announcements and general chat are linked the same way, \
            exact names first.",
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(
            "Built with Serenity & Poise",
        ));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;

    Ok(())
}
