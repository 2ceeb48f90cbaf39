//! HTTP server hosting the webhook, plus the echo bot served by the binary.

use crate::{
    bot::MessengerBot,
    config::AppConfig,
    messenger::schemas::{NotificationType, Recipient},
    webhook::{self, events::ReceivedAttachmentPayload},
};
use log::info;
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use std::sync::Arc;

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(app_config: &AppConfig) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Serves the webhook of `bot` until the server stops. TLS is on in production.
pub async fn run(app_config: &AppConfig, bot: Arc<MessengerBot>) -> anyhow::Result<()> {
    let server_addr = app_config.server_addr();
    let webhook_path = app_config.webhook_path.clone();

    info!(
        "Serving webhook on {}:{}{}",
        server_addr.0, server_addr.1, webhook_path
    );

    let server = web::server(move || {
        let webhook_path = webhook_path.clone();

        web::App::new()
            .wrap(web::middleware::Logger::default())
            .state(Arc::clone(&bot))
            .configure(move |cfg| webhook::messenger(cfg, &webhook_path))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor(app_config)?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

/// Bot answering every text with the same text and every image with the same image
pub fn build_echo_bot(bot: MessengerBot) -> MessengerBot {
    bot.on_message(|bot, ctx, message| async move {
        if message.is_echo {
            return anyhow::Ok(());
        }

        let recipient = Recipient::from_id(ctx.opts.sender.id);

        if let Some(text) = message.text {
            bot.client()
                .send_text(&recipient, text, NotificationType::Regular)
                .await?;
        }

        for attachment in message.attachments {
            if let Some(ReceivedAttachmentPayload::Media(media)) = attachment.payload {
                if attachment.attachment_type == "image" {
                    bot.client()
                        .send_image(&recipient, media.url, NotificationType::Regular)
                        .await?;
                }
            }
        }

        anyhow::Ok(())
    })
    .on_delivery(|_, ctx, delivery| async move {
        info!(
            "Messages to {} delivered up to {}",
            ctx.opts.sender.id, delivery.watermark
        );
        anyhow::Ok(())
    })
    .on_postback(|bot, ctx, postback| async move {
        bot.client()
            .send_text(
                &Recipient::from_id(ctx.opts.sender.id),
                format!("Postback received: {}", postback.payload),
                NotificationType::Regular,
            )
            .await?;
        anyhow::Ok(())
    })
    .on_optin(|bot, ctx, optin| async move {
        let reference = optin
            .and_then(|optin| optin.reference.or(optin.user_ref))
            .unwrap_or_default();
        info!("Optin from {} (ref: {reference})", ctx.opts.sender.id);

        bot.client()
            .send_text(
                &Recipient::from_id(ctx.opts.sender.id),
                "Authentication successful",
                NotificationType::Regular,
            )
            .await?;
        anyhow::Ok(())
    })
}
