use crate::error::DisplayError;
use crate::kiosk::screen::{KioskScreen, Tone};
use crate::kiosk::KioskDisplay;
use async_trait::async_trait;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::http::Http;
use serenity::model::application::component::ButtonStyle;
use serenity::model::id::{ChannelId, MessageId};
use std::sync::Arc;

/// A kiosk drawn into one channel message, edited in place.
pub struct DiscordDisplay {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

impl DiscordDisplay {
    pub fn new(http: Arc<Http>, channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            http,
            channel_id,
            message_id,
        }
    }
}

fn style(tone: Tone) -> ButtonStyle {
    match tone {
        Tone::Primary => ButtonStyle::Primary,
        Tone::Secondary => ButtonStyle::Secondary,
        Tone::Success => ButtonStyle::Success,
    }
}

pub fn screen_embed<'a>(embed: &'a mut CreateEmbed, screen: &KioskScreen) -> &'a mut CreateEmbed {
    embed
        .title(&screen.title)
        .color(screen.color)
        .footer(|f| f.text(&screen.footer));
    if !screen.description.is_empty() {
        embed.description(&screen.description);
    }
    embed
}

pub fn screen_components<'a>(
    components: &'a mut CreateComponents,
    screen: &KioskScreen,
) -> &'a mut CreateComponents {
    for row in &screen.rows {
        components.create_action_row(|action_row| {
            for button in row {
                action_row.create_button(|b| {
                    b.custom_id(&button.custom_id)
                        .label(&button.label)
                        .style(style(button.tone))
                        .disabled(button.disabled)
                });
            }
            action_row
        });
    }
    components
}

#[async_trait]
impl KioskDisplay for DiscordDisplay {
    async fn show(&self, screen: &KioskScreen) -> Result<(), DisplayError> {
        self.channel_id
            .edit_message(&self.http, self.message_id, |m| {
                m.content("")
                    .embed(|e| screen_embed(e, screen))
                    .components(|c| screen_components(c, screen))
            })
            .await?;
        Ok(())
    }

    async fn remove(&self) -> Result<(), DisplayError> {
        self.channel_id
            .delete_message(&self.http, self.message_id)
            .await?;
        Ok(())
    }
}
