//! Event domain — Docker engine container start/stop events.

use std::collections::HashMap;

use bollard::models::{EventMessage, EventMessageTypeEnum};
use bollard::query_parameters::EventsOptionsBuilder;
use chrono::{DateTime, Utc};
use futures_util::stream::StreamExt;

use super::client::{resolve_container_name, DockerClient, DockerError};

/// Lifecycle transitions the registrator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Start,
    Stop,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Start => "start",
            EventAction::Stop => "stop",
        }
    }
}

/// A container start/stop notification, already named for the metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEvent {
    pub action: EventAction,
    pub name: String,
    pub image: String,
    pub time: Option<DateTime<Utc>>,
}

impl ContainerEvent {
    /// Interpret a raw engine event. Anything that is not a container
    /// start/stop, or that carries no usable name, yields `None`.
    pub fn from_message(msg: EventMessage, name_label: &str) -> Option<Self> {
        if msg.typ != Some(EventMessageTypeEnum::CONTAINER) {
            return None;
        }
        let action = match msg.action.as_deref() {
            Some("start") => EventAction::Start,
            Some("stop") => EventAction::Stop,
            _ => return None,
        };

        let attributes = msg.actor.and_then(|a| a.attributes).unwrap_or_default();
        let name = resolve_container_name(
            Some(&attributes),
            name_label,
            attributes.get("name").map(String::as_str),
        )?;
        let image = attributes.get("image").cloned().unwrap_or_default();
        let time = msg.time.and_then(|t| DateTime::from_timestamp(t, 0));

        Some(Self {
            action,
            name,
            image,
            time,
        })
    }

    /// Engine-side event time as RFC 3339, or `unknown` when the daemon sent none.
    pub fn timestamp(&self) -> String {
        self.time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl DockerClient {
    /// Stream container start/stop events from now on.
    pub fn stream_container_events(
        &self,
    ) -> impl futures_util::Stream<Item = Result<ContainerEvent, DockerError>> + '_ {
        let mut filters = HashMap::new();
        filters.insert("type", vec!["container"]);
        filters.insert("event", vec!["start", "stop"]);

        let options = EventsOptionsBuilder::default().filters(&filters).build();

        self.client
            .events(Some(options))
            .filter_map(move |r| {
                let event = match r {
                    Ok(msg) => ContainerEvent::from_message(msg, &self.name_label).map(Ok),
                    Err(e) => Some(Err(DockerError::from(e))),
                };
                futures_util::future::ready(event)
            })
    }
}
