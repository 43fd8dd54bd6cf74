use std::ffi::OsStr;
use std::path::Path;

/// Image file extensions the decoder accepts (lowercase, without the dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["tif", "tiff", "png", "jpg", "jpeg", "gif", "webp"];

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(OsStr::to_str).map(|ext| ext.to_ascii_lowercase())
}

pub fn is_supported_image(path: &Path) -> bool {
    extension_of(path).map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str())).unwrap_or(false)
}

pub fn has_extension(name: &str, allowed: &[String]) -> bool {
    extension_of(Path::new(name))
        .map(|ext| allowed.iter().any(|candidate| candidate.eq_ignore_ascii_case(&ext)))
        .unwrap_or(false)
}
