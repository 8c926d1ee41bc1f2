//! Colour math used by the hue sweep and the status indicator.

pub type Rgb = smart_leds::RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

/// Number of steps on the full-saturation hue wheel (6 sectors x 255).
const WHEEL_STEPS: u32 = 1530;

/// 8-bit gamma correction table, gamma 2.6.
#[rustfmt::skip]
const GAMMA8: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3,
    3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 5, 6, 6, 6, 6, 7,
    7, 7, 8, 8, 8, 9, 9, 9, 10, 10, 10, 11, 11, 11, 12, 12,
    13, 13, 13, 14, 14, 15, 15, 16, 16, 17, 17, 18, 18, 19, 19, 20,
    20, 21, 21, 22, 22, 23, 24, 24, 25, 25, 26, 27, 27, 28, 29, 29,
    30, 31, 31, 32, 33, 34, 34, 35, 36, 37, 38, 38, 39, 40, 41, 42,
    42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57,
    58, 59, 60, 61, 62, 63, 64, 65, 66, 68, 69, 70, 71, 72, 73, 75,
    76, 77, 78, 80, 81, 82, 84, 85, 86, 88, 89, 90, 92, 93, 94, 96,
    97, 99, 100, 102, 103, 105, 106, 108, 109, 111, 112, 114, 115, 117, 119, 120,
    122, 124, 125, 127, 129, 130, 132, 134, 136, 137, 139, 141, 143, 145, 146, 148,
    150, 152, 154, 156, 158, 160, 162, 164, 166, 168, 170, 172, 174, 176, 178, 180,
    182, 184, 186, 188, 191, 193, 195, 197, 199, 202, 204, 206, 209, 211, 213, 215,
    218, 220, 223, 225, 227, 230, 232, 235, 237, 240, 242, 245, 247, 250, 252, 255,
];

/// Convert a 16-bit hue to a full-saturation, full-value colour.
///
/// The hue circle is quantized to 1530 steps: red, yellow, green, cyan,
/// blue, magenta and back to red.
#[allow(clippy::cast_possible_truncation)]
pub fn hue_to_rgb(hue: u16) -> Rgb {
    let step = ((u32::from(hue) * WHEEL_STEPS + 32_768) >> 16) as u16;
    match step {
        0..=254 => Rgb::new(255, step as u8, 0),
        255..=509 => Rgb::new((510 - step) as u8, 255, 0),
        510..=764 => Rgb::new(0, 255, (step - 510) as u8),
        765..=1019 => Rgb::new(0, (1020 - step) as u8, 255),
        1020..=1274 => Rgb::new((step - 1020) as u8, 0, 255),
        1275..=1529 => Rgb::new(255, 0, (1530 - step) as u8),
        _ => RED,
    }
}

/// Apply the gamma table to each channel.
pub fn gamma(color: Rgb) -> Rgb {
    Rgb::new(
        GAMMA8[usize::from(color.r)],
        GAMMA8[usize::from(color.g)],
        GAMMA8[usize::from(color.b)],
    )
}

/// Scale a channel by `brightness / 255` with integer truncation.
#[allow(clippy::cast_possible_truncation)]
pub const fn scale_channel(value: u8, brightness: u8) -> u8 {
    ((value as u16 * brightness as u16) / 255) as u8
}

/// Scale every channel of a colour by `brightness / 255`.
pub const fn scale(color: Rgb, brightness: u8) -> Rgb {
    Rgb {
        r: scale_channel(color.r, brightness),
        g: scale_channel(color.g, brightness),
        b: scale_channel(color.b, brightness),
    }
}

/// Map a phase in `[0, 1)` onto the 16-bit hue circle.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn phase_to_hue(phase: f32) -> u16 {
    (phase * 65535.0) as u16
}

/// Colour of the hue sweep at `phase`, gamma corrected and dimmed.
pub fn sweep_color(phase: f32, brightness: u8) -> Rgb {
    scale(gamma(hue_to_rgb(phase_to_hue(phase))), brightness)
}
