use serde::{Deserialize, Serialize};

/// unmultiplied version of [`egui::Color32`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UColor32(pub [u8; 4]);

impl UColor32 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);

    #[inline(always)]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline(always)]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline(always)]
    pub const fn with_a(self, a: u8) -> Self {
        let Self([r, g, b, _]) = self;
        Self([r, g, b, a])
    }
}

impl From<UColor32> for egui::Color32 {
    fn from(value: UColor32) -> Self {
        let UColor32([r, g, b, a]) = value;
        Self::from_rgba_unmultiplied(r, g, b, a)
    }
}

impl From<egui::Color32> for UColor32 {
    fn from(value: egui::Color32) -> Self {
        let [r, g, b, a] = value.to_srgba_unmultiplied();
        Self([r, g, b, a])
    }
}
