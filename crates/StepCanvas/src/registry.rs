//! # Step Registry
//!
//! Static display metadata and default payloads per step type.

use crate::model::StepType;
use crate::payload::{
    ApiCallConfig, ConditionConfig, CustomActionConfig, DataInputConfig, DelayConfig,
    MessageConfig, StepConfig, TriggerConfig, WebhookConfig,
};
use serde::Serialize;
use serde_json::Map;

/// How a step type is presented in the palette and on its card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StepMeta {
    pub title: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Presentation used for anything the registry does not know.
pub const FALLBACK_META: StepMeta = StepMeta {
    title: "Step",
    icon: "settings",
    color: "gray",
};

pub fn meta(step_type: StepType) -> StepMeta {
    match step_type {
        StepType::Trigger => StepMeta {
            title: "Trigger",
            icon: "zap",
            color: "yellow",
        },
        StepType::Message => StepMeta {
            title: "Send Message",
            icon: "message-square",
            color: "blue",
        },
        StepType::Condition => StepMeta {
            title: "Condition",
            icon: "git-branch",
            color: "purple",
        },
        StepType::DataInput => StepMeta {
            title: "Collect Data",
            icon: "database",
            color: "green",
        },
        StepType::ApiCall => StepMeta {
            title: "API Call",
            icon: "globe",
            color: "orange",
        },
        StepType::Webhook => StepMeta {
            title: "Webhook",
            icon: "webhook",
            color: "pink",
        },
        StepType::Delay => StepMeta {
            title: "Delay",
            icon: "clock",
            color: "slate",
        },
        StepType::CustomAction => StepMeta {
            title: "Custom Action",
            icon: "wand",
            color: "indigo",
        },
        // No dedicated artwork for branches.
        StepType::Branch => StepMeta {
            title: "Branch",
            ..FALLBACK_META
        },
    }
}

/// Looks up metadata by wire name. Unknown names get [`FALLBACK_META`].
pub fn meta_for(type_name: &str) -> StepMeta {
    type_name
        .parse::<StepType>()
        .map(meta)
        .unwrap_or(FALLBACK_META)
}

/// The payload a freshly added step starts with.
pub fn default_config(step_type: StepType) -> StepConfig {
    match step_type {
        StepType::Trigger => StepConfig::Trigger(TriggerConfig::default()),
        StepType::Message => StepConfig::Message(MessageConfig::default()),
        StepType::Condition => StepConfig::Condition(ConditionConfig::default()),
        StepType::DataInput => StepConfig::DataInput(DataInputConfig::default()),
        StepType::ApiCall => StepConfig::ApiCall(ApiCallConfig::default()),
        StepType::Webhook => StepConfig::Webhook(WebhookConfig::default()),
        StepType::Delay => StepConfig::Delay(DelayConfig::default()),
        StepType::CustomAction => StepConfig::CustomAction(CustomActionConfig::default()),
        StepType::Branch => StepConfig::Branch(Map::new()),
    }
}

/// Palette entries for the "add step" menu, in display order.
pub fn palette() -> impl Iterator<Item = (StepType, StepMeta)> {
    StepType::ALL.into_iter().map(|t| (t, meta(t)))
}
