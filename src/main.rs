mod auth;
mod commands;
mod config;
mod db;
mod error;
mod handlers;
mod i18n;
mod kiosk;
mod models;
mod report;
mod tasks;
mod voting;

use auth::SessionStore;
use config::AppConfig;
use db::{Database, VoteStore};
use kiosk::KioskRegistry;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

/// Shared by every interaction handler.
pub struct AppState {
    pub config: AppConfig,
    pub database: Arc<Database>,
    pub sessions: SessionStore,
    pub kiosks: KioskRegistry,
}

struct Bot {
    state: Arc<AppState>,
}

#[async_trait]
impl EventHandler for Bot {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let state = Arc::clone(&self.state);

        // Kiosk votes block on the store; keep the gateway loop free.
        tokio::spawn(async move {
            handlers::handle_interaction(&state, &ctx, interaction).await;
        });
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let commands = Command::set_global_application_commands(&ctx.http, |builder| {
            commands::register(builder)
        })
        .await;

        match commands {
            Ok(registered) => info!("Registered {} global slash commands.", registered.len()),
            Err(why) => error!("Failed to register slash commands: {:?}", why),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let database = match Database::connect(&config.database_url).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    match &config.admin_seed {
        Some(seed) => {
            if let Err(e) = auth::seed_admin(&database, seed).await {
                error!("Failed to seed the administrator account: {}", e);
            }
        }
        None => warn!("ADMIN_EMAIL / ADMIN_PASSWORD not set; no administrator account was seeded"),
    }

    let store: Arc<dyn VoteStore> = Arc::clone(&database) as Arc<dyn VoteStore>;
    let state = Arc::new(AppState {
        sessions: SessionStore::new(config.default_language),
        kiosks: KioskRegistry::new(store, config.brand.name.clone(), config.default_language),
        database,
        config,
    });

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_INTEGRATIONS;

    let mut client = match Client::builder(&state.config.discord_token, intents)
        .event_handler(Bot {
            state: Arc::clone(&state),
        })
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Error creating client: {:?}", e);
            return;
        }
    };

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
