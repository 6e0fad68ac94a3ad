use serde::{Deserialize, Serialize};

/// Score of a single indicator within a result. Scores are on [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default)]
    pub indicator_id: Option<i64>,
    #[serde(default)]
    pub indicator_name: String,
    pub score: f64,
    #[serde(default)]
    pub weighted_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarSeries {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub data: Vec<f64>,
}

/// Pre-aggregated radar data computed by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<RadarSeries>,
}

/// Scored output of a completed task (`GET /api/results/task/{id}`).
/// Read-only; kept until a different task is viewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub id: i64,
    pub task_id: i64,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub result_items: Vec<ResultItem>,
    #[serde(default)]
    pub radar_chart_data: Option<RadarChartData>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Highest score across the items, 0 for an empty result.
pub fn max_score(items: &[ResultItem]) -> f64 {
    items.iter().map(|i| i.score).fold(0.0, f64::max)
}

/// Lowest score across the items, 0 for an empty result.
pub fn min_score(items: &[ResultItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(|i| i.score).fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(name: &str, score: f64) -> ResultItem {
        ResultItem {
            indicator_id: None,
            indicator_name: name.to_string(),
            score,
            weighted_score: None,
        }
    }

    #[test]
    fn score_extremes() {
        let items = vec![item("a", 0.42), item("b", 0.91), item("c", 0.77)];
        assert_eq!(max_score(&items), 0.91);
        assert_eq!(min_score(&items), 0.42);
    }

    #[test]
    fn score_extremes_empty() {
        assert_eq!(max_score(&[]), 0.0);
        assert_eq!(min_score(&[]), 0.0);
    }

    #[test]
    fn decodes_result_with_missing_chart_data() {
        let result: EvaluationResult = serde_json::from_str(
            r#"{"id": 1, "task_id": 9, "result_items": [
                {"indicator_name": "accuracy", "score": 0.8}
            ]}"#,
        )
        .unwrap();
        assert!(result.radar_chart_data.is_none());
        assert_eq!(result.result_items.len(), 1);
    }
}
