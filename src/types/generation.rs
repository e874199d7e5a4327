//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Settings controlling a model call.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}
