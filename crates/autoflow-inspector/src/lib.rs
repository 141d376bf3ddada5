//! # AutoFlow Inspector
//!
//! This crate provides the headless logic for the step configuration panel.
//! It maps a step's config onto visual fields and writes every edit back through
//! the graph as a whole new config object.

pub mod schema;

use schema::VisualField;
use std::collections::HashMap;
use step_canvas::graph::{Ignored, Outcome, StepPatch};
use step_canvas::model::{GraphState, StepId};
use step_canvas::payload::{
    ActionKind, Attachment, ButtonKind, DEFAULT_DELAY_DURATION, HttpMethod, InputField,
    JsonObject, MessageButton, StepConfig, StorageKind, TimeUnit, TriggerKind,
};

pub const INVALID_JSON: &str = "Invalid JSON";

/// A single change made in the configuration panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Title(String),
    // trigger
    TriggerKind(TriggerKind),
    /// Raw comma-separated text.
    Keywords(String),
    // message
    MessageText(String),
    AddAttachment(Attachment),
    UpdateAttachment { index: usize, attachment: Attachment },
    RemoveAttachment(usize),
    AddButton(MessageButton),
    ButtonText { index: usize, text: String },
    ButtonKind { index: usize, kind: ButtonKind },
    ButtonUrl { index: usize, url: String },
    ButtonAutomation { index: usize, automation_id: String },
    ButtonAction { index: usize, action: String },
    RemoveButton(usize),
    // condition
    Condition(String),
    // data_input
    AddInputField(InputField),
    UpdateInputField { index: usize, field: InputField },
    RemoveInputField(usize),
    StorageKind(StorageKind),
    // api_call / webhook
    Url(String),
    Method(HttpMethod),
    Headers(String),
    Body(String),
    Payload(String),
    // delay
    /// Raw text of the duration box.
    Duration(String),
    DelayUnit(TimeUnit),
    // custom_action
    ActionType(ActionKind),
    ActionConfig(String),
}

/// The state of the inspector for the selected step.
#[derive(Debug, Default)]
pub struct Inspector {
    step: Option<StepId>,
    /// The fields to display in the UI.
    pub fields: Vec<VisualField>,
    /// Raw text of the JSON boxes, kept even when it does not parse.
    drafts: HashMap<String, String>,
    /// Validation errors for each field.
    pub errors: HashMap<String, String>,
}

impl Inspector {
    /// Opens the panel for `id`, or returns `None` if the step does not exist.
    pub fn open(graph: &GraphState, id: &StepId) -> Option<Self> {
        let step = graph.get(id)?;
        let mut drafts = HashMap::new();
        let objects = match &step.config {
            StepConfig::ApiCall(api) => vec![("headers", &api.headers), ("body", &api.body)],
            StepConfig::Webhook(webhook) => vec![("payload", &webhook.payload)],
            _ => Vec::new(),
        };
        for (field, object) in objects {
            let text = serde_json::to_string_pretty(object).unwrap_or_default();
            drafts.insert(field.to_string(), text);
        }
        Some(Self {
            step: Some(id.clone()),
            fields: schema::fields_for(step),
            drafts,
            errors: HashMap::new(),
        })
    }

    pub fn step(&self) -> Option<&StepId> {
        self.step.as_ref()
    }

    /// Text currently shown in a JSON box.
    pub fn draft(&self, field_id: &str) -> Option<&str> {
        self.drafts.get(field_id).map(String::as_str)
    }

    /// Returns true if all fields are valid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Applies one edit to the open step.
    ///
    /// The current config is copied, patched and written back whole through
    /// [`GraphState::update_step`]. Rejected input leaves the step untouched.
    pub fn apply(&mut self, graph: &mut GraphState, edit: FieldEdit) -> Outcome {
        let Some(id) = self.step.clone() else {
            return Outcome::Ignored(Ignored::UnknownStep);
        };
        let Some(step) = graph.get(&id) else {
            return Outcome::Ignored(Ignored::UnknownStep);
        };
        let mut config = step.config.clone();

        let outcome = match edit {
            FieldEdit::Title(title) => graph.update_step(&id, StepPatch::title(title)),
            FieldEdit::RemoveButton(index) => graph.remove_message_button(&id, index),
            edit => match self.patch(&mut config, edit) {
                Ok(()) => graph.update_step(&id, StepPatch::config(config)),
                Err(reason) => Outcome::Ignored(reason),
            },
        };

        match outcome {
            Outcome::Applied => {
                if let Some(step) = graph.get(&id) {
                    self.fields = schema::fields_for(step);
                }
            }
            Outcome::Ignored(reason) => {
                tracing::debug!(step = %id, %reason, "edit ignored");
            }
        }
        outcome
    }

    fn patch(&mut self, config: &mut StepConfig, edit: FieldEdit) -> Result<(), Ignored> {
        match (config, edit) {
            (StepConfig::Trigger(trigger), FieldEdit::TriggerKind(kind)) => trigger.kind = kind,
            (StepConfig::Trigger(trigger), FieldEdit::Keywords(text)) => {
                if trigger.kind != TriggerKind::Keyword {
                    return Err(Ignored::FieldUnavailable);
                }
                let keywords = parse_csv(&text);
                if keywords.is_empty() {
                    return Err(Ignored::InvalidInput);
                }
                trigger.keywords = keywords;
            }

            (StepConfig::Message(message), FieldEdit::MessageText(text)) => message.message = text,
            (StepConfig::Message(message), FieldEdit::AddAttachment(attachment)) => {
                message.attachments.push(attachment);
            }
            (StepConfig::Message(message), FieldEdit::UpdateAttachment { index, attachment }) => {
                *entry(&mut message.attachments, index)? = attachment;
            }
            (StepConfig::Message(message), FieldEdit::RemoveAttachment(index)) => {
                entry(&mut message.attachments, index)?;
                message.attachments.remove(index);
            }
            (StepConfig::Message(message), FieldEdit::AddButton(button)) => {
                message.buttons.push(button);
            }
            (StepConfig::Message(message), FieldEdit::ButtonText { index, text }) => {
                entry(&mut message.buttons, index)?.text = text;
            }
            (StepConfig::Message(message), FieldEdit::ButtonKind { index, kind }) => {
                entry(&mut message.buttons, index)?.set_kind(kind);
            }
            (StepConfig::Message(message), FieldEdit::ButtonUrl { index, url }) => {
                let button = entry(&mut message.buttons, index)?;
                if button.kind != ButtonKind::Link {
                    return Err(Ignored::FieldUnavailable);
                }
                button.url = Some(url);
            }
            (
                StepConfig::Message(message),
                FieldEdit::ButtonAutomation { index, automation_id },
            ) => {
                let button = entry(&mut message.buttons, index)?;
                if button.kind != ButtonKind::Automation {
                    return Err(Ignored::FieldUnavailable);
                }
                button.automation_id = Some(automation_id);
            }
            (StepConfig::Message(message), FieldEdit::ButtonAction { index, action }) => {
                entry(&mut message.buttons, index)?.action = action;
            }

            (StepConfig::Condition(condition), FieldEdit::Condition(text)) => {
                condition.condition = text;
            }

            (StepConfig::DataInput(data), FieldEdit::AddInputField(field)) => {
                data.fields.push(field)
            }
            (StepConfig::DataInput(data), FieldEdit::UpdateInputField { index, field }) => {
                *entry(&mut data.fields, index)? = field;
            }
            (StepConfig::DataInput(data), FieldEdit::RemoveInputField(index)) => {
                entry(&mut data.fields, index)?;
                data.fields.remove(index);
            }
            (StepConfig::DataInput(data), FieldEdit::StorageKind(kind)) => data.storage.kind = kind,

            (StepConfig::ApiCall(api), FieldEdit::Url(url)) => api.url = url,
            (StepConfig::ApiCall(api), FieldEdit::Method(method)) => api.method = method,
            (StepConfig::ApiCall(api), FieldEdit::Headers(text)) => {
                api.headers = self.parse_object("headers", text)?;
            }
            (StepConfig::ApiCall(api), FieldEdit::Body(text)) => {
                if !api.method.accepts_body() {
                    return Err(Ignored::FieldUnavailable);
                }
                api.body = self.parse_object("body", text)?;
            }

            (StepConfig::Webhook(webhook), FieldEdit::Url(url)) => webhook.url = url,
            (StepConfig::Webhook(webhook), FieldEdit::Payload(text)) => {
                webhook.payload = self.parse_object("payload", text)?;
            }

            (StepConfig::Delay(delay), FieldEdit::Duration(text)) => {
                delay.duration = parse_duration(&text);
            }
            (StepConfig::Delay(delay), FieldEdit::DelayUnit(unit)) => delay.unit = unit,

            (StepConfig::CustomAction(action), FieldEdit::ActionType(kind)) => {
                action.action_type = kind;
            }
            (StepConfig::CustomAction(action), FieldEdit::ActionConfig(text)) => {
                action.config = text;
            }

            _ => return Err(Ignored::FieldUnavailable),
        }
        Ok(())
    }

    /// Parses a JSON box. The draft always keeps the raw text; the error map
    /// tracks whether it is currently valid.
    fn parse_object(&mut self, field_id: &str, text: String) -> Result<JsonObject, Ignored> {
        let parsed = serde_json::from_str::<JsonObject>(&text);
        self.drafts.insert(field_id.to_string(), text);
        match parsed {
            Ok(object) => {
                self.errors.remove(field_id);
                Ok(object)
            }
            Err(err) => {
                tracing::debug!(field = field_id, %err, "rejected JSON input");
                self.errors
                    .insert(field_id.to_string(), INVALID_JSON.to_string());
                Err(Ignored::InvalidInput)
            }
        }
    }
}

fn entry<T>(items: &mut [T], index: usize) -> Result<&mut T, Ignored> {
    items.get_mut(index).ok_or(Ignored::InvalidInput)
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reads the delay duration box: unparsable text gives the default, anything
/// below one becomes one.
pub fn parse_duration(input: &str) -> u32 {
    match input.trim().parse::<i64>() {
        Ok(n) => n.clamp(1, i64::from(u32::MAX)) as u32,
        Err(_) => DEFAULT_DELAY_DURATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_trims_and_filters() {
        assert_eq!(parse_csv(" hello, start ,, "), ["hello", "start"]);
        assert!(parse_csv(" , ").is_empty());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10"), 10);
        assert_eq!(parse_duration(" 3 "), 3);
        assert_eq!(parse_duration("0"), 1);
        assert_eq!(parse_duration("-4"), 1);
        assert_eq!(parse_duration("soon"), 5);
        assert_eq!(parse_duration(""), 5);
    }
}
