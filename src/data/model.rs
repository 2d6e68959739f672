#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    BuiltIn,
    File(String),
}

impl DatasetSource {
    pub fn describe(&self) -> &str {
        match self {
            Self::BuiltIn => "built-in",
            Self::File(path) => path,
        }
    }
}

/// One technology/skill entry. `size` is the raw magnitude (years of use);
/// the visual radius is derived from it at chart-build time.
#[derive(Clone, Debug)]
pub struct SkillRecord {
    pub id: String,
    pub label: String,
    pub group: u32,
    pub size: f32,
}

/// An ordered set of skill records.
///
/// `id` values are expected to be unique: the chart binds visual state to
/// records by id, and duplicate ids leave that binding undefined. Duplicates
/// are a precondition violation, not something this layer repairs.
#[derive(Clone, Debug)]
pub struct SkillDataset {
    pub source: DatasetSource,
    pub records: Vec<SkillRecord>,
}

impl SkillDataset {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Largest size in the dataset. Records normalize invalid sizes to zero
    /// before they get here, so zero also covers the degenerate datasets.
    pub fn max_size(&self) -> f32 {
        self.records
            .iter()
            .map(|record| record.size)
            .fold(0.0_f32, f32::max)
    }
}
