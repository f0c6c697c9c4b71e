// Global theme colours
// All colours are u32 in packed ARGB format: 0xAARRGGBB

// Window chrome
pub const WINDOW_BG: u32 = 0xFF_17_21_2B; // Header and footer bars
pub const CHAT_BG: u32 = 0xFF_0E_16_21; // Behind the message stream
pub const HAIRLINE: u32 = 0xFF_2B_52_78; // Separator between bars and canvas

// Bubbles
pub const BUBBLE_OWN: u32 = 0xFF_2B_52_78;
pub const BUBBLE_OTHER: u32 = 0xFF_18_25_33;

// Text
pub const TEXT: u32 = 0xFF_FF_FF_FF;
pub const TIME_TEXT: u32 = 0xFF_70_84_99;
pub const SENDER_NAME: u32 = 0xFF_5B_B3_F0;
pub const SERVICE_TEXT: u32 = 0xFF_70_84_99;
pub const STATUS_TEXT: u32 = 0xFF_A0_B0_C0;
pub const STATUS_ERROR: u32 = 0xFF_FF_60_60;
pub const PLACEHOLDER_TEXT: u32 = 0xFF_70_84_99; // Empty search box hint

// Date separator pill
pub const DATE_PILL: u32 = 0xFF_23_2E_3C;
pub const DATE_TEXT: u32 = 0xFF_FF_FF_FF;

// Export title block
pub const TITLE_TEXT: u32 = 0xFF_FF_FF_FF;
pub const SUBTITLE_TEXT: u32 = 0xFF_70_84_99;

// Fonts
pub const FONT_WEIGHT_REGULAR: u16 = 400;
pub const FONT_WEIGHT_BOLD: u16 = 700;

/// Colour set handed to the layout painter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: u32,
    pub bubble_own: u32,
    pub bubble_other: u32,
    pub text: u32,
    pub time: u32,
    pub sender: u32,
    pub service: u32,
    pub date_pill: u32,
    pub date_text: u32,
}

impl Palette {
    pub const fn dark() -> Self {
        Self {
            background: CHAT_BG,
            bubble_own: BUBBLE_OWN,
            bubble_other: BUBBLE_OTHER,
            text: TEXT,
            time: TIME_TEXT,
            sender: SENDER_NAME,
            service: SERVICE_TEXT,
            date_pill: DATE_PILL,
            date_text: DATE_TEXT,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

/// Split packed ARGB into `[r, g, b, a]`
#[inline]
pub const fn argb_to_rgba(argb: u32) -> [u8; 4] {
    [
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
        (argb >> 24) as u8,
    ]
}

#[inline]
pub const fn rgba_to_argb(rgba: [u8; 4]) -> u32 {
    (rgba[3] as u32) << 24 | (rgba[0] as u32) << 16 | (rgba[1] as u32) << 8 | rgba[2] as u32
}
