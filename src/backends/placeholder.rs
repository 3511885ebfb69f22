use super::GenerationBackend;
use crate::config_loader::Settings;
use crate::error::Result;
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;
use std::time::Duration;

/// Stands in for a real illustration service.
///
/// Prints the prompt that would be sent, waits to mimic generation time and
/// writes a flat-coloured tile so later runs see the item as done.
pub struct PlaceholderImageBackend {
    prompt_template: String,
    delay: Duration,
    size: u32,
}

impl PlaceholderImageBackend {
    pub fn new(prompt_template: impl Into<String>, delay: Duration, size: u32) -> Self {
        Self {
            prompt_template: prompt_template.into(),
            delay,
            size,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.image_prompt_template.clone(),
            Duration::from_millis(settings.placeholder_delay_ms),
            settings.placeholder_size,
        )
    }

    pub fn build_prompt(&self, item: &str) -> String {
        self.prompt_template.replace("{item}", item)
    }
}

impl GenerationBackend for PlaceholderImageBackend {
    fn id(&self) -> &'static str {
        "placeholder"
    }

    fn generate(&self, text: &str, output: &Path) -> Result<()> {
        println!(
            "   Command: generate_image(prompt='{}', output='{}')",
            self.build_prompt(text),
            output.display()
        );

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tile = RgbImage::from_pixel(self.size, self.size, tile_colour(text));
        let partial = output.with_extension("part");
        tile.save_with_format(&partial, ImageFormat::Png)?;
        std::fs::rename(&partial, output)?;
        Ok(())
    }
}

/// Pastel colour derived from the label (FNV-1a), stable across runs.
fn tile_colour(text: &str) -> Rgb<u8> {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in text.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    let [r, g, b, _] = hash.to_le_bytes();
    Rgb([128 + r / 2, 128 + g / 2, 128 + b / 2])
}
