//! Per-metric assessment returned to callers

use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Classified metric plus its generated narrative
///
/// Field names on the wire follow what the browser front end reads
/// (`expected_range`, `analysis`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAssessment {
    pub metric_name: String,
    pub display_name: String,
    pub actual_value: f64,
    #[serde(rename = "expected_range")]
    pub expected_range_label: String,
    pub description: String,
    pub status: Status,
    #[serde(rename = "analysis")]
    pub narrative: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let assessment = MetricAssessment {
            metric_name: "avg_motion".to_string(),
            display_name: "Average Motion".to_string(),
            actual_value: 5.0,
            expected_range_label: "10-50".to_string(),
            description: "d".to_string(),
            status: Status::SuspiciousLow,
            narrative: "n".to_string(),
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["expected_range"], "10-50");
        assert_eq!(json["analysis"], "n");
        assert_eq!(json["status"], "suspicious_low");
    }
}
