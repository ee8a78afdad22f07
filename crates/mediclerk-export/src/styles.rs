use serde::{Deserialize, Serialize};

/// Document styling for exported notes. Sizes are in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    pub body_font: String,
    pub heading_font: String,
    pub body_size: usize,
    /// Note title.
    pub heading1_size: usize,
    /// Section headings.
    pub heading2_size: usize,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Calibri".to_string(),
            heading_font: "Calibri".to_string(),
            body_size: 11,
            heading1_size: 16,
            heading2_size: 13,
        }
    }
}
