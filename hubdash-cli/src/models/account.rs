use chrono::{DateTime, Utc};
use image::imageops::FilterType;

/// Largest edge, in pixels, kept after decoding an avatar
pub const AVATAR_MAX_EDGE: u32 = 64;

/// Account data shown on the account page
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub name: String,
    pub login: String,
    pub location: String,
    pub blog: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub plan_name: String,
    pub plan_private_repos: u64,
    pub total_private_repos: u64,
    pub avatar: Avatar,
}

/// Decoded avatar as a grid of RGB pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Avatar {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl Avatar {
    /// Decode an encoded image (png, jpeg or gif) and shrink it to fit
    /// within `AVATAR_MAX_EDGE` on both axes.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        let decoded = if decoded.width() > AVATAR_MAX_EDGE || decoded.height() > AVATAR_MAX_EDGE {
            decoded.resize(AVATAR_MAX_EDGE, AVATAR_MAX_EDGE, FilterType::Triangle)
        } else {
            decoded
        };

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Nearest-neighbour sample for a point expressed as a fraction of the
    /// image size.
    pub fn sample(&self, fx: f64, fy: f64) -> Option<[u8; 3]> {
        if self.is_empty() {
            return None;
        }

        let x = ((fx * self.width as f64) as u32).min(self.width - 1);
        let y = ((fy * self.height as f64) as u32).min(self.height - 1);
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}
