use crate::config::{MAX_FRAME_RATE, MIN_FRAME_RATE};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use strum::{Display, EnumIter};

/// How much the frame rate changes on every step.
pub const FRAME_RATE_STEP: f64 = 5.0;

/// How much the viewport width changes on every step.
pub const VIEWPORT_STEP: f64 = 20.0;

/// The narrowest viewport steps can take the animation to.
pub const MIN_VIEWPORT_WIDTH: f64 = 20.0;

/// A change requested through the settings controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ControlAction {
    ToggleRunning,
    ToggleOpacity,
    InvertColors,
    Reverse,
    TogglePalette,
    NextColors,
    FasterFrameRate,
    SlowerFrameRate,
    WiderViewport,
    NarrowerViewport,
    Quit,
}

impl ControlAction {
    /// Map a key press into an action.
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let action = match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Self::Quit,
            KeyCode::Char(' ') => Self::ToggleRunning,
            KeyCode::Char('o') => Self::ToggleOpacity,
            KeyCode::Char('i') => Self::InvertColors,
            KeyCode::Char('r') => Self::Reverse,
            KeyCode::Char('c') => Self::TogglePalette,
            KeyCode::Char('p') => Self::NextColors,
            KeyCode::Char('+') | KeyCode::Char('=') => Self::FasterFrameRate,
            KeyCode::Char('-') => Self::SlowerFrameRate,
            KeyCode::Char(']') => Self::WiderViewport,
            KeyCode::Char('[') => Self::NarrowerViewport,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }

    /// A short description of the key bound to this action and what it does.
    pub fn help(&self) -> &'static str {
        match self {
            Self::ToggleRunning => "space: pause/resume",
            Self::ToggleOpacity => "o: opacity",
            Self::InvertColors => "i: invert",
            Self::Reverse => "r: reverse",
            Self::TogglePalette => "c: cycle colors",
            Self::NextColors => "p: next colors",
            Self::FasterFrameRate => "+: faster",
            Self::SlowerFrameRate => "-: slower",
            Self::WiderViewport => "]: wider",
            Self::NarrowerViewport => "[: narrower",
            Self::Quit => "q: quit",
        }
    }
}

/// Step a signed frame rate's magnitude by `delta`, keeping its sign and staying within
/// [MIN_FRAME_RATE] and [MAX_FRAME_RATE].
pub fn step_frame_rate(frames_per_second: f64, delta: f64) -> f64 {
    let magnitude = (frames_per_second.abs() + delta).clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
    magnitude.copysign(frames_per_second)
}

/// Step a viewport width by `delta`, never going below [MIN_VIEWPORT_WIDTH].
pub fn step_viewport_width(width: f64, delta: f64) -> f64 {
    (width + delta).max(MIN_VIEWPORT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[rstest]
    #[case(KeyCode::Char(' '), ControlAction::ToggleRunning)]
    #[case(KeyCode::Char('o'), ControlAction::ToggleOpacity)]
    #[case(KeyCode::Char('i'), ControlAction::InvertColors)]
    #[case(KeyCode::Char('r'), ControlAction::Reverse)]
    #[case(KeyCode::Char('c'), ControlAction::TogglePalette)]
    #[case(KeyCode::Char('p'), ControlAction::NextColors)]
    #[case(KeyCode::Char('+'), ControlAction::FasterFrameRate)]
    #[case(KeyCode::Char('-'), ControlAction::SlowerFrameRate)]
    #[case(KeyCode::Char(']'), ControlAction::WiderViewport)]
    #[case(KeyCode::Char('['), ControlAction::NarrowerViewport)]
    #[case(KeyCode::Esc, ControlAction::Quit)]
    fn key_bindings(#[case] code: KeyCode, #[case] expected: ControlAction) {
        assert_eq!(ControlAction::from_key(&key(code)), Some(expected));
    }

    #[test]
    fn ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(ControlAction::from_key(&event), Some(ControlAction::Quit));
    }

    #[test]
    fn unbound_key() {
        assert_eq!(ControlAction::from_key(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn every_action_has_help() {
        for action in ControlAction::iter() {
            assert!(!action.help().is_empty(), "{action} has no help");
        }
    }

    #[rstest]
    #[case::faster(20.0, 5.0, 25.0)]
    #[case::slower(20.0, -5.0, 15.0)]
    #[case::floor(3.0, -5.0, 1.0)]
    #[case::reverse_faster(-20.0, 5.0, -25.0)]
    #[case::reverse_floor(-3.0, -5.0, -1.0)]
    #[case::ceiling(998.0, 5.0, 1000.0)]
    fn frame_rate_steps(#[case] current: f64, #[case] delta: f64, #[case] expected: f64) {
        assert_eq!(step_frame_rate(current, delta), expected);
    }

    #[test]
    fn viewport_steps() {
        assert_eq!(step_viewport_width(400.0, VIEWPORT_STEP), 420.0);
        assert_eq!(step_viewport_width(30.0, -VIEWPORT_STEP), MIN_VIEWPORT_WIDTH);
    }
}
