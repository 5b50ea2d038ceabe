use super::messages::{ControlAction, ControlMessage, TranscriptionEventMessage};
use crate::session::SessionController;
use crate::transcription::Transcriber;
use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::StreamExt;
use tracing::{info, warn};

/// Transcription subsystem reached over NATS
pub struct NatsTranscriber {
    client: Client,
    session_id: String,
}

impl NatsTranscriber {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    pub fn control_subject(session_id: &str) -> String {
        format!("mic.control.{}", session_id)
    }

    pub fn events_subject(session_id: &str) -> String {
        format!("stt.events.{}", session_id)
    }

    async fn publish_control(&self, action: ControlAction) -> Result<()> {
        let subject = Self::control_subject(&self.session_id);

        let message = ControlMessage {
            session_id: self.session_id.clone(),
            action,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish control message")?;

        info!("Published {:?} to {}", action, subject);

        Ok(())
    }

    /// Subscribe to transcription events for this session
    pub async fn subscribe_events(&self) -> Result<async_nats::Subscriber> {
        let subject = Self::events_subject(&self.session_id);

        info!("Subscribing to transcription events on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to transcription events")?;

        info!("Subscribed to {}", subject);

        Ok(subscriber)
    }

    /// Feed events into the controller until the subscription ends
    pub async fn pump_events(
        mut subscriber: async_nats::Subscriber,
        controller: SessionController,
    ) {
        info!("Transcription event pump started");

        while let Some(msg) = subscriber.next().await {
            match serde_json::from_slice::<TranscriptionEventMessage>(&msg.payload) {
                Ok(message) => {
                    if message.session_id != controller.session_id() {
                        continue;
                    }
                    controller.handle_event(message.event).await;
                }
                Err(e) => {
                    warn!("Failed to parse transcription event: {}", e);
                }
            }
        }

        info!("Transcription event pump stopped");
    }
}

#[async_trait::async_trait]
impl Transcriber for NatsTranscriber {
    async fn start(&self) -> Result<()> {
        self.publish_control(ControlAction::Start).await
    }

    async fn stop(&self) -> Result<()> {
        self.publish_control(ControlAction::Stop).await
    }

    fn name(&self) -> &str {
        "nats-transcriber"
    }
}
