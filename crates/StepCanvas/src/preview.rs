//! # Preview Rendering
//!
//! Read-only summaries of steps, used by the cards on the canvas and by the
//! linear "live preview" list. Nothing here mutates the graph.

use serde::Serialize;

use crate::model::{GraphState, Step, StepId, StepType};
use crate::payload::{AttachmentKind, ButtonKind, MessageConfig, StepConfig, TriggerKind};
use crate::registry::{self, StepMeta};

/// Message text is cut to this many characters in one-line summaries.
const SUMMARY_TEXT_LIMIT: usize = 50;

/// One entry of the live preview list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreviewCard {
    pub step_id: StepId,
    pub step_type: StepType,
    pub title: String,
    pub meta: StepMeta,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bubble: Option<MessageBubble>,
}

/// Chat-bubble rendering of a message step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MessageBubble {
    pub attachments: Vec<AttachmentBanner>,
    pub text: String,
    pub buttons: Vec<BubbleButton>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttachmentBanner {
    pub icon: &'static str,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BubbleButton {
    pub text: String,
    pub style: ButtonKind,
    /// The URL for links, `"Next Automation"` for automation buttons.
    pub destination: String,
}

pub fn attachment_icon(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Pdf => "file-text",
        AttachmentKind::Image => "image",
        AttachmentKind::Doc => "file",
        AttachmentKind::Video => "video",
        AttachmentKind::Audio => "music",
    }
}

/// One-line summary of a step, keyed by type.
pub fn summary(config: &StepConfig) -> String {
    match config {
        StepConfig::Trigger(trigger) => {
            if trigger.kind == TriggerKind::Keyword && !trigger.keywords.is_empty() {
                format!("Trigger: keyword - {}", trigger.keywords.join(", "))
            } else {
                format!("Trigger: {}", trigger.kind.as_str())
            }
        }
        StepConfig::Message(message) => {
            format!("Message: {}", truncate(&message.message, SUMMARY_TEXT_LIMIT))
        }
        StepConfig::Condition(condition) => format!("Condition: {}", condition.condition),
        StepConfig::DataInput(input) => format!(
            "Data Input: {} fields -> {}",
            input.fields.len(),
            input.storage.kind.as_str()
        ),
        StepConfig::ApiCall(api) => format!("API: {} {}", api.method.as_str(), api.url),
        StepConfig::Webhook(webhook) => format!("Webhook: {}", webhook.url),
        StepConfig::Delay(delay) => format!("Delay: {} {}", delay.duration, delay.unit.as_str()),
        StepConfig::CustomAction(action) => format!("Action: {}", action.action_type.as_str()),
        StepConfig::Branch(_) => "Branch".to_string(),
    }
}

pub fn bubble(message: &MessageConfig) -> MessageBubble {
    MessageBubble {
        attachments: message
            .attachments
            .iter()
            .map(|a| AttachmentBanner {
                icon: attachment_icon(a.kind),
                name: a.name.clone(),
            })
            .collect(),
        text: message.message.clone(),
        buttons: message
            .buttons
            .iter()
            .map(|b| BubbleButton {
                text: b.text.clone(),
                style: b.kind,
                destination: match b.kind {
                    ButtonKind::Link => b.url.clone().unwrap_or_default(),
                    ButtonKind::Automation => "Next Automation".to_string(),
                },
            })
            .collect(),
    }
}

pub fn card(step: &Step) -> PreviewCard {
    PreviewCard {
        step_id: step.id.clone(),
        step_type: step.step_type(),
        title: step.title.clone(),
        meta: registry::meta(step.step_type()),
        summary: summary(&step.config),
        bubble: step.config.as_message().map(bubble),
    }
}

/// The linear preview of the whole automation, in canvas order.
pub fn live_preview(graph: &GraphState) -> Vec<PreviewCard> {
    graph.steps_in_order().map(card).collect()
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}
