use std::fs;

use anyhow::{Context, Result};

use super::builtin::builtin_records;
use super::model::{DatasetSource, SkillDataset, SkillRecord};
use super::parse::{RawSkillRecord, parse_dataset_json};

pub fn load_dataset(data_path: Option<&str>) -> Result<SkillDataset> {
    let (source, raw_records) = match data_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset file {path}"))?;
            let records = parse_dataset_json(&raw)
                .with_context(|| format!("failed to parse dataset file {path}"))?;
            (DatasetSource::File(path.to_string()), records)
        }
        None => (DatasetSource::BuiltIn, builtin_records()),
    };

    Ok(SkillDataset {
        source,
        records: normalize_records(raw_records),
    })
}

fn normalize_records(raw_records: Vec<RawSkillRecord>) -> Vec<SkillRecord> {
    let mut records = Vec::with_capacity(raw_records.len());

    for raw in raw_records {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            continue;
        }

        let label = if raw.label.trim().is_empty() {
            id.clone()
        } else {
            raw.label
        };

        let size = if raw.size.is_finite() && raw.size > 0.0 {
            raw.size
        } else {
            0.0
        };

        records.push(SkillRecord {
            id,
            label,
            group: raw.group,
            size,
        });
    }

    records
}
