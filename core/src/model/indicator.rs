use std::fmt;

use serde::{Deserialize, Serialize};

/// Grouping of scoring dimensions as defined by the service catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorCategory {
    BasicPerformance,
    GenerationTask,
    Generalization,
    Custom,
}

impl IndicatorCategory {
    pub const ALL: [Self; 4] = [
        Self::BasicPerformance,
        Self::GenerationTask,
        Self::Generalization,
        Self::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BasicPerformance => "basic_performance",
            Self::GenerationTask => "generation_task",
            Self::Generalization => "generalization",
            Self::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BasicPerformance => "Basic performance",
            Self::GenerationTask => "Generation tasks",
            Self::Generalization => "Generalization",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for IndicatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scoring dimension, immutable from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: IndicatorCategory,
    #[serde(default)]
    pub is_builtin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn category_wire_names() {
        for cat in IndicatorCategory::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
        }
    }

    #[test]
    fn decodes_catalog_entry() {
        let ind: Indicator = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "answer_accuracy",
                "display_name": "Answer accuracy",
                "category": "basic_performance",
                "is_builtin": true
            }"#,
        )
        .unwrap();
        assert_eq!(ind.category, IndicatorCategory::BasicPerformance);
        assert!(ind.is_builtin);
    }
}
