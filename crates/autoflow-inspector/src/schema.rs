use serde::{Deserialize, Serialize};
use serde_json::Value;
use step_canvas::model::Step;
use step_canvas::payload::{
    ActionKind, AttachmentKind, ButtonKind, FieldKind, HttpMethod, StepConfig, StorageKind,
    TimeUnit, TriggerKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    TextArea,
    Number,
    Boolean,
    Select { options: Vec<String> },
    Json,
    /// An ordered, editable list whose entries have the given fields.
    List { item: Vec<VisualField> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualField {
    pub id: String,
    pub label: String,
    pub description: String,
    pub field_type: FieldType,
    pub required: bool,
    pub default_value: Option<Value>,
}

impl VisualField {
    fn new(id: &str, field_type: FieldType) -> Self {
        Self {
            id: id.to_string(),
            label: capitalize(id),
            description: String::new(),
            field_type,
            required: false,
            default_value: None,
        }
    }

    fn labelled(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    fn described(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

fn select<'a>(options: impl IntoIterator<Item = &'a str>) -> FieldType {
    FieldType::Select {
        options: options.into_iter().map(str::to_string).collect(),
    }
}

/// A JSON object box, empty by default.
fn json_field(id: &str) -> VisualField {
    VisualField::new(id, FieldType::Json).with_default(Value::Object(Default::default()))
}

/// Fields the configuration panel shows for `step`, in display order.
///
/// The list depends on the current config: `body` only exists for POST and PUT
/// calls, `keywords` only for keyword triggers.
pub fn fields_for(step: &Step) -> Vec<VisualField> {
    let mut fields = vec![VisualField::new("title", FieldType::Text).required()];

    match &step.config {
        StepConfig::Trigger(trigger) => {
            fields.push(
                VisualField::new("type", select([
                    TriggerKind::Keyword.as_str(),
                    TriggerKind::Schedule.as_str(),
                    TriggerKind::Webhook.as_str(),
                ]))
                .labelled("Trigger Type")
                .required(),
            );
            if trigger.kind == TriggerKind::Keyword {
                fields.push(
                    VisualField::new("keywords", FieldType::Text)
                        .described("Comma-separated keywords"),
                );
            }
        }
        StepConfig::Message(_) => {
            fields.push(VisualField::new("message", FieldType::TextArea).required());
            fields.push(VisualField::new(
                "attachments",
                FieldType::List {
                    item: vec![
                        VisualField::new("name", FieldType::Text),
                        VisualField::new("type", select([
                            AttachmentKind::Pdf.as_str(),
                            AttachmentKind::Image.as_str(),
                            AttachmentKind::Doc.as_str(),
                            AttachmentKind::Video.as_str(),
                            AttachmentKind::Audio.as_str(),
                        ])),
                        VisualField::new("url", FieldType::Text).labelled("URL"),
                    ],
                },
            ));
            fields.push(VisualField::new(
                "buttons",
                FieldType::List {
                    item: vec![
                        VisualField::new("text", FieldType::Text).required(),
                        VisualField::new("type", select([
                            ButtonKind::Link.as_str(),
                            ButtonKind::Automation.as_str(),
                        ])),
                        VisualField::new("url", FieldType::Text)
                            .labelled("URL")
                            .described("Link buttons only"),
                        VisualField::new("automation_id", FieldType::Text)
                            .labelled("Automation")
                            .described("Automation buttons only"),
                        VisualField::new("action", FieldType::Text),
                    ],
                },
            ));
        }
        StepConfig::Condition(_) => {
            fields.push(
                VisualField::new("condition", FieldType::TextArea)
                    .described("Expression evaluated by the backend"),
            );
        }
        StepConfig::DataInput(_) => {
            fields.push(VisualField::new(
                "fields",
                FieldType::List {
                    item: vec![
                        VisualField::new("name", FieldType::Text).required(),
                        VisualField::new("type", select([
                            FieldKind::Text.as_str(),
                            FieldKind::Email.as_str(),
                            FieldKind::Phone.as_str(),
                            FieldKind::Number.as_str(),
                        ])),
                        VisualField::new("required", FieldType::Boolean),
                    ],
                },
            ));
            fields.push(
                VisualField::new("storage", select([
                    StorageKind::GoogleSheets.as_str(),
                    StorageKind::Database.as_str(),
                    StorageKind::Csv.as_str(),
                ]))
                .labelled("Storage Type"),
            );
        }
        StepConfig::ApiCall(api) => {
            fields.push(VisualField::new("url", FieldType::Text).labelled("URL").required());
            fields.push(VisualField::new("method", select([
                HttpMethod::Get.as_str(),
                HttpMethod::Post.as_str(),
                HttpMethod::Put.as_str(),
                HttpMethod::Delete.as_str(),
            ])));
            fields.push(json_field("headers"));
            if api.method.accepts_body() {
                fields.push(json_field("body"));
            }
        }
        StepConfig::Webhook(_) => {
            fields.push(VisualField::new("url", FieldType::Text).labelled("URL").required());
            fields.push(json_field("payload"));
        }
        StepConfig::Delay(_) => {
            fields.push(
                VisualField::new("duration", FieldType::Number)
                    .required()
                    .with_default(Value::from(step_canvas::payload::DEFAULT_DELAY_DURATION)),
            );
            fields.push(VisualField::new("unit", select([
                TimeUnit::Seconds.as_str(),
                TimeUnit::Minutes.as_str(),
                TimeUnit::Hours.as_str(),
                TimeUnit::Days.as_str(),
            ])));
        }
        StepConfig::CustomAction(_) => {
            fields.push(
                VisualField::new("actionType", select([
                    ActionKind::Custom.as_str(),
                    ActionKind::Email.as_str(),
                    ActionKind::Sms.as_str(),
                    ActionKind::Notification.as_str(),
                ]))
                .labelled("Action Type"),
            );
            fields.push(VisualField::new("config", FieldType::TextArea));
        }
        StepConfig::Branch(_) => {}
    }

    fields
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}
