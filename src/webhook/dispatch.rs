//! # Messenger Event Dispatch
//!
//! Fans the events of a webhook payload out to the handlers registered on the
//! bot. Every handler call runs as its own background task: the webhook
//! answers without waiting for them and there is no ordering between events.
//!
//! A handler failure is logged and passed to the error handler when one is
//! registered. It never changes the response sent to the platform.

use super::events::{
    Delivery, Event, EventKind, MessageOpts, MessagingEvent, Optin, Postback, ReceivedMessage,
    WebhookPayload,
};
use crate::bot::MessengerBot;
use futures::future::BoxFuture;
use log::{debug, error};
use std::sync::Arc;

pub type HandlerFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Callback for one kind of event
pub type Handler<T> =
    Arc<dyn Fn(Arc<MessengerBot>, EventContext, T) -> HandlerFuture + Send + Sync>;

/// Callback receiving the failures of the other handlers
pub type ErrorHandler = Arc<dyn Fn(EventKind, anyhow::Error) + Send + Sync>;

/// Where an event came from: its entry and its sender/recipient/time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub entry: Event,
    pub opts: MessageOpts,
}

/// Handlers registered on a bot. Events without a handler are dropped.
#[derive(Default, Clone)]
pub struct Handlers {
    pub(crate) message: Option<Handler<ReceivedMessage>>,
    pub(crate) delivery: Option<Handler<Delivery>>,
    pub(crate) postback: Option<Handler<Postback>>,
    pub(crate) optin: Option<Handler<Option<Optin>>>,
    pub(crate) error: Option<ErrorHandler>,
}

impl Handlers {
    /// Starts the handler matching `event`, if any
    fn invoke(
        &self,
        bot: Arc<MessengerBot>,
        ctx: EventContext,
        event: MessagingEvent,
    ) -> Option<HandlerFuture> {
        match event {
            MessagingEvent::Message(message) => self.message.as_ref().map(|h| h(bot, ctx, message)),
            MessagingEvent::Delivery(delivery) => {
                self.delivery.as_ref().map(|h| h(bot, ctx, delivery))
            }
            MessagingEvent::Postback(postback) => {
                self.postback.as_ref().map(|h| h(bot, ctx, postback))
            }
            MessagingEvent::Optin(optin) => self.optin.as_ref().map(|h| h(bot, ctx, optin)),
        }
    }
}

/// Spawns one task per event of `payload` that has a registered handler.
///
/// Must run inside the ntex runtime. Returns the number of spawned tasks.
pub fn dispatch(bot: &Arc<MessengerBot>, payload: WebhookPayload) -> usize {
    let mut dispatched = 0;

    for entry in payload.entry {
        let event = entry.event();

        for messaging in entry.messaging {
            let kind = messaging.event.kind();
            let ctx = EventContext {
                entry: event.clone(),
                opts: messaging.opts,
            };

            let Some(task) = bot.handlers().invoke(Arc::clone(bot), ctx, messaging.event) else {
                debug!("No handler registered for {kind} event, dropping it");
                continue;
            };

            let on_error = bot.handlers().error.clone();
            ntex::rt::spawn(async move {
                if let Err(e) = task.await {
                    error!("Failed to handle {kind} event: {e:#}");
                    if let Some(on_error) = on_error {
                        on_error(kind, e);
                    }
                }
            });
            dispatched += 1;
        }
    }

    dispatched
}
