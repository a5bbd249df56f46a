//! Decode sculpt maps from images.

use crate::errors::VolumeError;
use crate::volume::Volume;
use image::DynamicImage;

/// Raw sculpt texel data in the layout [`Volume::sculpt`] consumes.
#[derive(Debug, Clone)]
pub struct SculptMap {
    pub width: u16,
    pub height: u16,
    pub components: u8,
    pub data: Vec<u8>,
}

impl SculptMap {
    /// Flattens a decoded image into tightly packed RGB texels.
    ///
    /// Images wider or taller than `u16::MAX` are truncated to zero size,
    /// which [`Volume::sculpt`] treats as blank data.
    pub fn from_image(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let width = u16::try_from(rgb.width()).unwrap_or(0);
        let height = u16::try_from(rgb.height()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Self {
                width: 0,
                height: 0,
                components: 3,
                data: Vec::new(),
            };
        }
        Self {
            width,
            height,
            components: 3,
            data: rgb.into_raw(),
        }
    }
}

impl Volume {
    /// Applies a decoded image as this volume's sculpt map.
    ///
    /// # Example
    /// ```no_run
    /// # use primvol::{Volume, VolumeParams, SculptId, SculptType};
    /// # fn main() {
    /// let mut params = VolumeParams::default();
    /// params.set_sculpt(Some(SculptId([0; 16])), SculptType::SPHERE);
    /// let mut volume = Volume::new(params, 2.5).unwrap();
    /// let img = image::open("my_sculpt.png").unwrap();
    /// volume.sculpt_from_image(&img, 0, false).unwrap();
    /// # }
    /// ```
    pub fn sculpt_from_image(
        &mut self,
        img: &DynamicImage,
        sculpt_level: i32,
        is_flexible: bool,
    ) -> Result<(), VolumeError> {
        let map = SculptMap::from_image(img);
        self.sculpt(
            map.width,
            map.height,
            map.components,
            &map.data,
            sculpt_level,
            is_flexible,
        )
    }
}
