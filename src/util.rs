use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const FOLDER_GLYPH: &str = "\u{1F4C2}";
const SOURCE_EXTENSIONS: [&str; 9] = [
    ".py", ".tsx", ".ts", ".jsx", ".js", ".java", ".cpp", ".go", ".rb",
];

/// Strip the backend's folder glyph prefix and well-known source-file
/// extensions so node labels stay short on the canvas.
pub fn clean_label(label: &str) -> String {
    let mut cleaned = label.trim_start();
    if let Some(rest) = cleaned.strip_prefix(FOLDER_GLYPH) {
        cleaned = rest.trim_start();
    }

    for extension in SOURCE_EXTENSIONS {
        if let Some(stem) = cleaned.strip_suffix(extension) {
            return stem.to_owned();
        }
    }
    cleaned.to_owned()
}

/// Deterministic pseudo-random pair in [-1, 1] derived from an id. Used to
/// break exact position ties without introducing run-to-run nondeterminism.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
