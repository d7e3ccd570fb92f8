use crate::{
    color::{Color, PHASE_AMPLITUDE, PHASE_OFFSET, phase_color},
    spiral::DiskStyle,
};

/// Hand picked fill and outline pairs the controls step through.
pub const PRESET_STYLES: [DiskStyle; 5] = [
    DiskStyle { fill: Color::WHITE, stroke: Color::BLACK },
    DiskStyle { fill: Color::new(0xFF, 0x6B, 0x6B), stroke: Color::new(0x2B, 0x2D, 0x42) },
    DiskStyle { fill: Color::new(0x4E, 0xCD, 0xC4), stroke: Color::new(0x1A, 0x53, 0x5C) },
    DiskStyle { fill: Color::new(0xFF, 0xE6, 0x6D), stroke: Color::new(0xFF, 0x6B, 0x35) },
    DiskStyle { fill: Color::BLACK, stroke: Color::WHITE },
];

/// The preset following `current`, wrapping around at the end.
///
/// Styles that aren't presets step into the first one.
pub fn next_preset(current: DiskStyle) -> DiskStyle {
    match PRESET_STYLES.iter().position(|style| *style == current) {
        Some(index) => PRESET_STYLES[(index + 1) % PRESET_STYLES.len()],
        None => PRESET_STYLES[0],
    }
}

/// Drives the automatic color cycling of the disk style.
///
/// The cycling index walks back and forth across `[0, 255]`, bouncing at each end, and every step
/// yields a fill color out of [phase_color] and its complement as the stroke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteCycler {
    index: u8,
    ascending: bool,
}

impl PaletteCycler {
    pub fn new() -> Self {
        Self { index: 0, ascending: true }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// The style for the current index.
    pub fn style(&self) -> DiskStyle {
        let fill = phase_color(self.index, PHASE_AMPLITUDE, PHASE_OFFSET);
        DiskStyle { fill, stroke: fill.complement() }
    }

    /// Move one step and return the style for the new index.
    pub fn advance(&mut self) -> DiskStyle {
        match (self.ascending, self.index) {
            (true, u8::MAX) => {
                self.ascending = false;
                self.index -= 1;
            }
            (false, 0) => {
                self.ascending = true;
                self.index += 1;
            }
            (true, _) => self.index += 1,
            (false, _) => self.index -= 1,
        };
        self.style()
    }
}

impl Default for PaletteCycler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn stroke_is_complement() {
        let mut cycler = PaletteCycler::new();
        for _ in 0..10 {
            let style = cycler.advance();
            assert_eq!(style.stroke, style.fill.complement());
        }
    }

    #[test]
    fn bounces_at_upper_bound() {
        let mut cycler = PaletteCycler::new();
        for _ in 0..255 {
            cycler.advance();
        }
        assert_eq!(cycler.index(), 255);
        cycler.advance();
        assert_eq!(cycler.index(), 254);
    }

    #[test]
    fn bounces_at_lower_bound() {
        let mut cycler = PaletteCycler::new();
        // up to 255 and back down to 0
        for _ in 0..510 {
            cycler.advance();
        }
        assert_eq!(cycler.index(), 0);
        cycler.advance();
        assert_eq!(cycler.index(), 1);
    }

    #[test]
    fn never_leaves_range() {
        let mut cycler = PaletteCycler::new();
        let mut previous = cycler.index();
        for _ in 0..2000 {
            cycler.advance();
            let delta = (cycler.index() as i32 - previous as i32).abs();
            assert_eq!(delta, 1);
            previous = cycler.index();
        }
    }

    #[rstest]
    #[case::first(PRESET_STYLES[0], PRESET_STYLES[1])]
    #[case::wraps(PRESET_STYLES[4], PRESET_STYLES[0])]
    #[case::custom(DiskStyle { fill: Color::new(1, 2, 3), stroke: Color::BLACK }, PRESET_STYLES[0])]
    fn preset_steps(#[case] current: DiskStyle, #[case] expected: DiskStyle) {
        assert_eq!(next_preset(current), expected);
    }

    #[test]
    fn default_style_is_first_preset() {
        assert_eq!(PRESET_STYLES[0], DiskStyle::default());
    }
}
