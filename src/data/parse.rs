use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawSkillRecord {
    #[serde(default)]
    pub(super) id: String,
    #[serde(default, alias = "text")]
    pub(super) label: String,
    #[serde(default)]
    pub(super) group: u32,
    #[serde(default, deserialize_with = "coerce_size")]
    pub(super) size: f32,
}

// A size that is missing, non-numeric, or not finite counts as zero magnitude
// rather than failing the whole dataset.
fn coerce_size<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_size_value(&value))
}

fn coerce_size_value(value: &Value) -> f32 {
    let parsed = match value {
        Value::Number(number) => number.as_f64().map(|size| size as f32),
        Value::String(text) => text.trim().parse::<f32>().ok(),
        _ => None,
    };

    parsed.filter(|size| size.is_finite()).unwrap_or(0.0)
}

pub(super) fn parse_dataset_json(raw: &str) -> Result<Vec<RawSkillRecord>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid dataset JSON")?;

    let entries = match &parsed {
        Value::Array(entries) => entries,
        Value::Object(object) => object
            .get("skills")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("expected a top-level array or a \"skills\" array"))?,
        _ => return Err(anyhow!("unexpected JSON type for a skills dataset")),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            RawSkillRecord::deserialize(entry)
                .with_context(|| format!("invalid skill record at index {index}"))
        })
        .collect()
}
