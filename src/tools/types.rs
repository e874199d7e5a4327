//! Parameter schemas for tools.

use serde::{Deserialize, Serialize};

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    pub schema: serde_json::Value,
}

impl ToolParameters {
    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    pub fn string(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "string",
                "description": description.into(),
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    pub fn build(self) -> ToolParameters {
        ToolParameters {
            schema: serde_json::json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_marks_required_properties() {
        let params = ToolParameters::object()
            .string("query", "search query", true)
            .string("topic", "optional topic", false)
            .build();

        assert_eq!(params.schema["type"], "object");
        assert_eq!(params.schema["required"], json!(["query"]));
        assert_eq!(params.schema["properties"]["topic"]["type"], "string");
    }
}
