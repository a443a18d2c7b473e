// Greeter Bot
// A lightweight Discord bot that welcomes new server members

mod api;
mod commands;
mod features;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::config_store::ConfigStore;
use crate::utils::config::{config_path, TOKEN_ENV};

/// User data shared across all commands
pub struct Data {
    pub store: Arc<ConfigStore>,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("store", &self.store.path())
            .finish()
    }
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("{0} not found in the environment or .env file")]
    MissingToken(&'static str),
    #[error("failed to create client: {0}")]
    Client(#[from] ::serenity::Error),
}

/// Register all slash commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::welcome::set_welcome_channel(),
        commands::welcome::welcome_channel(),
        commands::help::help(),
    ]
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("--- Bot is online ---");
            info!("Logged in as: {}", data_about_bot.user.name);
            info!("{} slash commands loaded", framework.options().commands.len());
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            features::welcome::handle_member_join(ctx, data, new_member).await;
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "greeter_bot=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(why) = run().await {
        error!("ERROR: {}", why);
        std::process::exit(1);
    }

    info!("Goodbye!");
}

/// A blank token counts as missing
fn token_from(value: Option<String>) -> Result<String, StartupError> {
    value
        .filter(|token| !token.trim().is_empty())
        .ok_or(StartupError::MissingToken(TOKEN_ENV))
}

async fn run() -> Result<(), StartupError> {
    let token = token_from(env::var(TOKEN_ENV).ok())?;

    info!("Starting Greeter Bot...");

    let store = Arc::new(ConfigStore::new(config_path()));
    match store.load().await {
        Ok(config) if config.is_empty() => info!("No welcome channels configured yet"),
        Ok(config) => info!("Loaded {} welcome channel override(s)", config.len()),
        Err(e) => warn!("Welcome config unusable, channel search will be used: {}", e),
    }

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx.say(format!("❌ Error: {}", error)).await;
                        }
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Registering commands...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully!");

                Ok(Data { store })
            })
        })
        .build();

    // GUILD_MEMBERS and MESSAGE_CONTENT are privileged, enable them in the Discord Dev Portal
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_EMOJIS_AND_STICKERS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to register Ctrl+C handler: {}", e);
            return;
        }
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    client.start().await?;

    Ok(())
}
