use resonance_core::{Coverage, Field};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// JSON shape served by the metrics endpoint and the static fallback.
///
/// Every field is optional; unknown keys are ignored.  Mistyped values are
/// dropped field by field, so one bad entry never discards the payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMetrics {
    #[serde(rename = "R")]
    pub r:                 Field<f64>,
    #[serde(rename = "K")]
    pub k:                 Field<f64>,
    pub spectral_entropy:  Field<f64>,
    pub mode:              Field<String>,
    pub coherence_score:   Field<f64>,
    pub tail_health_score: Field<f64>,
    pub timing_score:      Field<f64>,
    pub lambda_res:        Field<f64>,
    #[serde(deserialize_with = "lenient")]
    pub gpd:               Option<RawGpd>,
    #[serde(deserialize_with = "lenient")]
    pub tail_quantiles:    Option<RawTailQuantiles>,
    pub p50_latency:       Field<f64>,
    pub p95_latency:       Field<f64>,
    pub p99_latency:       Field<f64>,
    #[serde(rename = "p99_9Latency")]
    pub p99_9_latency:     Field<f64>,
    pub p99_improvement:   Field<f64>,
    pub agent_connected:   Field<bool>,
    #[serde(deserialize_with = "lenient")]
    pub validation:        Option<RawValidation>,
    /// ISO-8601 producer timestamp.
    pub timestamp:         Field<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawGpd {
    pub xi:        Field<f64>,
    pub sigma:     Field<f64>,
    pub threshold: Field<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTailQuantiles {
    pub q99:   Field<f64>,
    #[serde(rename = "q99_9")]
    pub q99_9: Field<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawValidation {
    pub tests_passed: Field<u32>,
    pub total_tests:  Field<u32>,
    pub coverage:     Field<Coverage>,
}

/// Nested object that is treated as missing when it has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match T::deserialize(value) {
        Ok(nested) => Ok(Some(nested)),
        Err(e) => {
            warn!("Ignoring malformed nested object: {e}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_payload() {
        let raw: RawMetrics = serde_json::from_str(
            r#"{
                "R": 0.52, "K": 0.35, "spectralEntropy": 0.48, "mode": "adaptive",
                "coherenceScore": 0.72, "tailHealthScore": 0.65, "timingScore": 0.58,
                "lambdaRes": 12.5,
                "gpd": {"xi": 0.15, "sigma": 8.3, "threshold": 45.2},
                "tailQuantiles": {"q99": 78.5, "q99_9": 125.3},
                "p50Latency": 45, "p95Latency": 68, "p99Latency": 95, "p99_9Latency": 145,
                "p99Improvement": 18.5, "agentConnected": true,
                "validation": {"testsPassed": 29, "totalTests": 29, "coverage": "100%"},
                "timestamp": "2025-11-02T10:00:00Z",
                "somethingNew": [1, 2, 3]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.r, Field::Value(0.52));
        assert_eq!(raw.p99_9_latency, Field::Value(145.0));
        assert_eq!(raw.tail_quantiles.unwrap().q99_9, Field::Value(125.3));
        assert_eq!(raw.agent_connected, Field::Value(true));
        let validation = raw.validation.unwrap();
        assert_eq!(validation.tests_passed, Field::Value(29));
        assert_eq!(validation.coverage, Field::Value(Coverage::Text("100%".into())));
    }

    #[test]
    fn empty_object_is_all_absent() {
        let raw: RawMetrics = serde_json::from_str("{}").unwrap();
        assert_eq!(raw, RawMetrics::default());
        assert_eq!(raw.r, Field::Absent);
        assert!(raw.gpd.is_none());
    }

    #[test]
    fn mistyped_fields_keep_the_rest_of_the_payload() {
        let raw: RawMetrics = serde_json::from_str(
            r#"{"R": 0.5, "validation": {"testsPassed": 29.0, "totalTests": 30}}"#,
        )
        .unwrap();
        assert_eq!(raw.r, Field::Value(0.5));
        let validation = raw.validation.unwrap();
        assert_eq!(validation.tests_passed, Field::Null);
        assert_eq!(validation.total_tests, Field::Value(30));

        let raw: RawMetrics =
            serde_json::from_str(r#"{"R": 0.5, "timestamp": 1730541600000}"#).unwrap();
        assert_eq!(raw.timestamp, Field::Null);

        let raw: RawMetrics =
            serde_json::from_str(r#"{"R": 0.5, "gpd": {"xi": "n/a", "sigma": 8.3}}"#).unwrap();
        let gpd = raw.gpd.unwrap();
        assert_eq!(gpd.xi, Field::Null);
        assert_eq!(gpd.sigma, Field::Value(8.3));
    }

    #[test]
    fn malformed_nested_object_is_dropped() {
        let raw: RawMetrics =
            serde_json::from_str(r#"{"R": 0.4, "gpd": "n/a", "tailQuantiles": null}"#).unwrap();
        assert_eq!(raw.r, Field::Value(0.4));
        assert!(raw.gpd.is_none());
        assert!(raw.tail_quantiles.is_none());
    }

    #[test]
    fn numeric_coverage() {
        let raw: RawValidation = serde_json::from_str(r#"{"coverage": 87.5}"#).unwrap();
        assert_eq!(raw.coverage, Field::Value(Coverage::Percent(87.5)));
    }
}
