mod builtin;
mod load;
mod model;
mod parse;

pub use load::load_dataset;
pub use model::{DatasetSource, SkillDataset, SkillRecord};
