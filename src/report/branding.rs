use crate::report::*;

/// The logo shown next to the report, or the text used in its place.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Branding {
    Image { path: String, bytes: Vec<u8> },
    Text(String),
}

impl Branding {
    /// Reads the image if it is there. A missing or unreadable file is not an error.
    pub fn load(path: &str, fallback: &str) -> Branding {
        match fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => {
                debug!("Branding::load: {:?} ({} bytes)", path, bytes.len());
                Branding::Image {
                    path: path.to_string(),
                    bytes,
                }
            }
            Ok(_) => {
                warn!("Branding image {:?} is empty, using a text label", path);
                Branding::Text(fallback.to_string())
            }
            Err(e) => {
                warn!("Could not read branding image {:?}: {}", path, e);
                Branding::Text(fallback.to_string())
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Branding::Image { path, .. } => {
                let name = Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.clone());
                format!("[{}]", name)
            }
            Branding::Text(s) => s.clone(),
        }
    }
}
