use serde_json::Value;

/// Report payload as returned by the service. Only the fields needed for
/// presentation are read; everything else passes through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Report(Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisStats {
    pub harmless: u64,
    pub malicious: u64,
    pub suspicious: u64,
    pub undetected: u64,
    pub timeout: u64,
}

impl AnalysisStats {
    /// Engines that reported the sample as harmless.
    pub fn clean(&self) -> u64 {
        self.harmless
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineVerdict {
    pub engine: String,
    pub category: String,
    pub result: Option<String>,
}

impl EngineVerdict {
    pub fn is_malicious(&self) -> bool {
        self.category == "malicious"
    }

    pub fn is_suspicious(&self) -> bool {
        self.category == "suspicious"
    }
}

impl Report {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// True when the body carries a non-null `data` member.
    pub fn has_data(&self) -> bool {
        !self.0.get("data").map_or(true, Value::is_null)
    }

    pub fn attributes(&self) -> Option<&Value> {
        self.0
            .get("data")
            .and_then(|data| data.get("attributes"))
            .filter(|attrs| attrs.is_object())
    }

    pub fn stats(&self) -> AnalysisStats {
        let Some(stats) = self
            .attributes()
            .and_then(|attrs| attrs.get("last_analysis_stats"))
        else {
            return AnalysisStats::default();
        };
        let count = |key: &str| stats.get(key).and_then(Value::as_u64).unwrap_or(0);
        AnalysisStats {
            harmless: count("harmless"),
            malicious: count("malicious"),
            suspicious: count("suspicious"),
            undetected: count("undetected"),
            timeout: count("timeout"),
        }
    }

    /// Per-engine verdicts, ordered by engine name.
    pub fn verdicts(&self) -> Vec<EngineVerdict> {
        let Some(results) = self
            .attributes()
            .and_then(|attrs| attrs.get("last_analysis_results"))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };
        let mut verdicts: Vec<EngineVerdict> = results
            .iter()
            .map(|(engine, result)| EngineVerdict {
                engine: engine.clone(),
                category: result
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                result: result
                    .get("result")
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned),
            })
            .collect();
        verdicts.sort_by(|a, b| a.engine.cmp(&b.engine));
        verdicts
    }

    /// `last_analysis_date` in unix seconds, when present.
    pub fn last_analysis_date(&self) -> Option<i64> {
        self.attributes()
            .and_then(|attrs| attrs.get("last_analysis_date"))
            .and_then(Value::as_i64)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}
