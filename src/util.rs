use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_years(size: f32) -> String {
    if size <= 0.0 {
        "n/a".to_string()
    } else if size.fract() == 0.0 {
        format!("{} yrs", size as u32)
    } else {
        format!("{size:.1} yrs")
    }
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
