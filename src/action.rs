use crate::{
    bot::MessengerBot,
    config::AppConfig,
    messenger::schemas::{Message, NotificationType, Recipient},
    server,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct RecipientArgs {
    /// Page scoped user id
    #[arg(long)]
    id: Option<String>,
    /// Phone number, for pages allowed to message by phone
    #[arg(long)]
    phone: Option<String>,
}

impl RecipientArgs {
    fn recipient(&self) -> anyhow::Result<Recipient> {
        match (&self.id, &self.phone) {
            (Some(id), _) => Ok(Recipient::from_id(id)),
            (None, Some(phone)) => Ok(Recipient::from_phone(phone)),
            (None, None) => anyhow::bail!("a recipient id or phone number is required"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SendTextArgs {
    #[command(flatten)]
    recipient: RecipientArgs,
    #[arg(short, long)]
    text: String,
}

#[derive(Args, Debug, Clone)]
pub struct SendImageArgs {
    #[command(flatten)]
    recipient: RecipientArgs,
    #[arg(short, long)]
    url: String,
}

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(long)]
    user_id: String,
}

#[derive(Args, Debug, Clone)]
pub struct SetGreetingArgs {
    #[arg(short, long)]
    text: String,
}

#[derive(Args, Debug, Clone)]
pub struct SetGetStartedArgs {
    #[arg(short, long)]
    payload: String,
}

#[derive(Args, Debug, Clone)]
pub struct SetWelcomeArgs {
    /// Text of the welcome message; the welcome message is removed when omitted
    #[arg(short, long)]
    text: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    /// Serves the webhook with a bot echoing what it receives
    Serve,
    SendText(SendTextArgs),
    SendImage(SendImageArgs),
    Profile(ProfileArgs),
    SetGreeting(SetGreetingArgs),
    SetGetStarted(SetGetStartedArgs),
    SetWelcome(SetWelcomeArgs),
}

/// Messenger Platform bot and Graph API tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub async fn run(&self, app_config: &AppConfig) -> anyhow::Result<()> {
        let bot = MessengerBot::new(app_config.bot_config())?;

        match &self.action {
            Action::Serve => server::run(app_config, Arc::new(server::build_echo_bot(bot))).await,
            Action::SendText(SendTextArgs { recipient, text }) => {
                let response = bot
                    .client()
                    .send_text(&recipient.recipient()?, text, NotificationType::Regular)
                    .await?;
                info!("Sent message {}", response.message_id);
                Ok(())
            }
            Action::SendImage(SendImageArgs { recipient, url }) => {
                let response = bot
                    .client()
                    .send_image(&recipient.recipient()?, url, NotificationType::Regular)
                    .await?;
                info!("Sent image {}", response.message_id);
                Ok(())
            }
            Action::Profile(ProfileArgs { user_id }) => {
                let profile = bot.client().get_profile(user_id).await?;
                println!("{}", serde_json::to_string_pretty(&profile)?);
                Ok(())
            }
            Action::SetGreeting(SetGreetingArgs { text }) => {
                bot.client().set_greeting(text).await?;
                info!("Greeting updated");
                Ok(())
            }
            Action::SetGetStarted(SetGetStartedArgs { payload }) => {
                bot.client().set_get_started(payload).await?;
                info!("Get started button updated");
                Ok(())
            }
            Action::SetWelcome(SetWelcomeArgs { text }) => {
                bot.client()
                    .set_welcome_message(text.as_deref().map(Message::text))
                    .await?;
                info!("Welcome message updated");
                Ok(())
            }
        }
    }
}
