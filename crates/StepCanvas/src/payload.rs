//! # Step Payloads
//!
//! Each step type carries its own strongly typed configuration. `StepConfig`
//! serializes as the bare payload object (the type tag lives on the step), and is
//! parsed back with an explicit type through [`StepConfig::from_value`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::model::StepType;

/// A free-form JSON object (headers, bodies, payloads).
pub type JsonObject = Map<String, Value>;

/// Type-specific configuration of a step.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepConfig {
    Trigger(TriggerConfig),
    Message(MessageConfig),
    Condition(ConditionConfig),
    DataInput(DataInputConfig),
    ApiCall(ApiCallConfig),
    Webhook(WebhookConfig),
    Delay(DelayConfig),
    CustomAction(CustomActionConfig),
    /// Branch steps have no known schema; the object is carried as-is.
    Branch(JsonObject),
}

impl StepConfig {
    pub fn step_type(&self) -> StepType {
        match self {
            StepConfig::Trigger(_) => StepType::Trigger,
            StepConfig::Message(_) => StepType::Message,
            StepConfig::Condition(_) => StepType::Condition,
            StepConfig::DataInput(_) => StepType::DataInput,
            StepConfig::ApiCall(_) => StepType::ApiCall,
            StepConfig::Webhook(_) => StepType::Webhook,
            StepConfig::Delay(_) => StepType::Delay,
            StepConfig::CustomAction(_) => StepType::CustomAction,
            StepConfig::Branch(_) => StepType::Branch,
        }
    }

    /// Parses a payload object for a known step type.
    ///
    /// Missing fields take their defaults; fields of the wrong shape are an error.
    pub fn from_value(step_type: StepType, value: Value) -> Result<Self, serde_json::Error> {
        let value = if value.is_null() {
            Value::Object(Map::new())
        } else {
            value
        };
        Ok(match step_type {
            StepType::Trigger => StepConfig::Trigger(serde_json::from_value(value)?),
            StepType::Message => StepConfig::Message(serde_json::from_value(value)?),
            StepType::Condition => StepConfig::Condition(serde_json::from_value(value)?),
            StepType::DataInput => StepConfig::DataInput(serde_json::from_value(value)?),
            StepType::ApiCall => StepConfig::ApiCall(serde_json::from_value(value)?),
            StepType::Webhook => StepConfig::Webhook(serde_json::from_value(value)?),
            StepType::Delay => StepConfig::Delay(serde_json::from_value(value)?),
            StepType::CustomAction => StepConfig::CustomAction(serde_json::from_value(value)?),
            StepType::Branch => StepConfig::Branch(serde_json::from_value(value)?),
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    pub fn as_message(&self) -> Option<&MessageConfig> {
        match self {
            StepConfig::Message(message) => Some(message),
            _ => None,
        }
    }
}

// --- trigger ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    #[default]
    Keyword,
    Schedule,
    Webhook,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Keyword => "keyword",
            TriggerKind::Schedule => "schedule",
            TriggerKind::Webhook => "webhook",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    pub keywords: Vec<String>,
}

// --- message ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Pdf,
    #[default]
    Image,
    Doc,
    Video,
    Audio,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Pdf => "pdf",
            AttachmentKind::Image => "image",
            AttachmentKind::Doc => "doc",
            AttachmentKind::Video => "video",
            AttachmentKind::Audio => "audio",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    #[default]
    Link,
    Automation,
}

impl ButtonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonKind::Link => "link",
            ButtonKind::Automation => "automation",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageButton {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_id: Option<String>,
    pub action: String,
}

impl MessageButton {
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ButtonKind::Link,
            url: Some(url.into()),
            automation_id: None,
            action: String::new(),
        }
    }

    pub fn automation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ButtonKind::Automation,
            url: None,
            automation_id: None,
            action: String::new(),
        }
    }

    /// Switches the button kind, clearing the fields owned by the other kind.
    pub fn set_kind(&mut self, kind: ButtonKind) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        match kind {
            ButtonKind::Link => self.automation_id = None,
            ButtonKind::Automation => self.url = None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub message: String,
    pub attachments: Vec<Attachment>,
    pub buttons: Vec<MessageButton>,
}

impl MessageConfig {
    /// Whether `index` is a connectable (automation) button.
    pub fn is_automation_button(&self, index: usize) -> bool {
        self.buttons
            .get(index)
            .is_some_and(|b| b.kind == ButtonKind::Automation)
    }
}

// --- condition ---

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionConfig {
    pub condition: String,
    pub true_path: Option<String>,
    pub false_path: Option<String>,
}

// --- data input ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Phone,
    Number,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Number => "number",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    GoogleSheets,
    Database,
    Csv,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::GoogleSheets => "google_sheets",
            StorageKind::Database => "database",
            StorageKind::Csv => "csv",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    #[serde(rename = "type")]
    pub kind: StorageKind,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataInputConfig {
    pub fields: Vec<InputField>,
    pub storage: Storage,
}

// --- api call / webhook ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Only POST and PUT carry an editable body.
    pub fn accepts_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiCallConfig {
    pub url: String,
    pub method: HttpMethod,
    pub headers: JsonObject,
    pub body: JsonObject,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: String,
    pub payload: JsonObject,
}

// --- delay ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    #[default]
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }
}

pub const DEFAULT_DELAY_DURATION: u32 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// At least 1; a stored 0 is read back as 1.
    #[serde(deserialize_with = "at_least_one")]
    pub duration: u32,
    pub unit: TimeUnit,
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(u32::deserialize(deserializer)?.max(1))
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DELAY_DURATION,
            unit: TimeUnit::Minutes,
        }
    }
}

// --- custom action ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[default]
    Custom,
    Email,
    Sms,
    Notification,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Custom => "custom",
            ActionKind::Email => "email",
            ActionKind::Sms => "sms",
            ActionKind::Notification => "notification",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomActionConfig {
    #[serde(rename = "actionType")]
    pub action_type: ActionKind,
    pub config: String,
}
