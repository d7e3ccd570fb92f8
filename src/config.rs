use crate::spiral::DiskStyle;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use strum::Display;

/// The largest number of disks a single frame may contain.
pub const MAX_DISK_COUNT: usize = 65_536;

/// The slowest frame rate, in either direction.
pub const MIN_FRAME_RATE: f64 = 1.0;

/// The fastest frame rate, in either direction.
pub const MAX_FRAME_RATE: f64 = 1000.0;

/// The raw configuration, as read from a config file and command line overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpiralConfig {
    /// The width of the viewport disks are laid out in.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    /// The number of disks in one sweep of a spiral arm.
    #[serde(default = "default_disks_per_cycle")]
    pub disks_per_cycle: u32,

    /// Controls how tight the spiral is and, along with `disks_per_cycle`, how many disks there are.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// The animation frame rate. Negative values play the animation backwards.
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: f64,

    /// The number of seconds in a full animation loop.
    #[serde(default = "default_cycle_duration")]
    pub cycle_duration: f64,

    /// Whether disk opacity follows each disk's phase.
    #[serde(default)]
    pub opacity_mode: bool,

    /// Whether colors cycle automatically.
    #[serde(default)]
    pub palette_cycling: bool,

    /// How often the palette moves one step while cycling.
    #[serde(default = "default_palette_interval_millis")]
    pub palette_interval_millis: u64,

    /// Whether the animation starts running rather than paused.
    #[serde(default = "default_running")]
    pub running: bool,

    #[serde(default)]
    pub style: DiskStyle,
}

impl SpiralConfig {
    /// Load the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        // an empty file is an empty config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the configuration from the user's config directory, if there's one there.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate this configuration and turn it into one the animation can run with.
    pub fn validate(&self) -> Result<Configuration, ConfigError> {
        validate_positive(ConfigField::ViewportWidth, self.viewport_width)?;
        validate_positive(ConfigField::Speed, self.speed)?;
        validate_positive(ConfigField::CycleDuration, self.cycle_duration)?;
        validate_frame_rate(self.frames_per_second)?;
        if self.disks_per_cycle == 0 {
            return Err(ConfigError::Invalid(ConfigField::DisksPerCycle, "must be positive"));
        }
        if self.palette_interval_millis == 0 {
            return Err(ConfigError::Invalid(ConfigField::PaletteInterval, "must be positive"));
        }
        validate_disk_count(self.disks_per_cycle, self.speed)?;
        Ok(Configuration {
            viewport_width: self.viewport_width,
            disks_per_cycle: self.disks_per_cycle,
            speed: self.speed,
            frames_per_second: self.frames_per_second,
            cycle_duration: self.cycle_duration,
            opacity_mode: self.opacity_mode,
            palette_cycling: self.palette_cycling,
            palette_interval: Duration::from_millis(self.palette_interval_millis),
            style: self.style,
            geometry_revision: 0,
        })
    }
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            disks_per_cycle: default_disks_per_cycle(),
            speed: default_speed(),
            frames_per_second: default_frames_per_second(),
            cycle_duration: default_cycle_duration(),
            opacity_mode: false,
            palette_cycling: false,
            palette_interval_millis: default_palette_interval_millis(),
            running: default_running(),
            style: DiskStyle::default(),
        }
    }
}

/// The path to the config file in the user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "spiral-disks")?;
    Some(dirs.config_dir().join("config.yaml"))
}

fn default_viewport_width() -> f64 {
    400.0
}

fn default_disks_per_cycle() -> u32 {
    8
}

fn default_speed() -> f64 {
    0.05
}

fn default_frames_per_second() -> f64 {
    20.0
}

fn default_cycle_duration() -> f64 {
    2.0
}

fn default_palette_interval_millis() -> u64 {
    50
}

fn default_running() -> bool {
    true
}

/// The direction the animation plays in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    fn signum(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// A validated configuration.
///
/// Every setter validates its input and leaves the current value untouched when it's invalid, so
/// a `Configuration` can always be used to generate frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    viewport_width: f64,
    disks_per_cycle: u32,
    speed: f64,
    frames_per_second: f64,
    cycle_duration: f64,
    opacity_mode: bool,
    palette_cycling: bool,
    palette_interval: Duration,
    style: DiskStyle,
    geometry_revision: u64,
}

impl Configuration {
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn disks_per_cycle(&self) -> u32 {
        self.disks_per_cycle
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The number of disks in a frame.
    pub fn disk_count(&self) -> usize {
        (self.disks_per_cycle as f64 / self.speed).floor() as usize
    }

    /// The signed frame rate.
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    pub fn direction(&self) -> Direction {
        if self.frames_per_second < 0.0 { Direction::Reverse } else { Direction::Forward }
    }

    pub fn cycle_duration(&self) -> f64 {
        self.cycle_duration
    }

    /// The number of ticks in a full animation loop.
    pub fn ticks_per_cycle(&self) -> u64 {
        ((self.cycle_duration * self.frames_per_second.abs()).round() as u64).max(1)
    }

    /// The time between two ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frames_per_second.abs())
    }

    pub fn opacity_mode(&self) -> bool {
        self.opacity_mode
    }

    pub fn palette_cycling(&self) -> bool {
        self.palette_cycling
    }

    pub fn palette_interval(&self) -> Duration {
        self.palette_interval
    }

    pub fn style(&self) -> DiskStyle {
        self.style
    }

    /// A counter bumped every time a setting that changes the frame layout is modified.
    pub fn geometry_revision(&self) -> u64 {
        self.geometry_revision
    }

    pub fn set_viewport_width(&mut self, width: f64) -> Result<(), ConfigError> {
        validate_positive(ConfigField::ViewportWidth, width)?;
        if width != self.viewport_width {
            self.viewport_width = width;
            self.geometry_revision += 1;
        }
        Ok(())
    }

    pub fn set_disks_per_cycle(&mut self, disks_per_cycle: u32) -> Result<(), ConfigError> {
        if disks_per_cycle == 0 {
            return Err(ConfigError::Invalid(ConfigField::DisksPerCycle, "must be positive"));
        }
        validate_disk_count(disks_per_cycle, self.speed)?;
        if disks_per_cycle != self.disks_per_cycle {
            self.disks_per_cycle = disks_per_cycle;
            self.geometry_revision += 1;
        }
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), ConfigError> {
        validate_positive(ConfigField::Speed, speed)?;
        validate_disk_count(self.disks_per_cycle, speed)?;
        if speed != self.speed {
            self.speed = speed;
            self.geometry_revision += 1;
        }
        Ok(())
    }

    pub fn set_frames_per_second(&mut self, frames_per_second: f64) -> Result<(), ConfigError> {
        validate_frame_rate(frames_per_second)?;
        self.frames_per_second = frames_per_second;
        Ok(())
    }

    /// Point the frame rate in the given direction, keeping its magnitude.
    pub fn set_direction(&mut self, direction: Direction) {
        self.frames_per_second = self.frames_per_second.abs() * direction.signum();
    }

    pub fn set_cycle_duration(&mut self, duration: f64) -> Result<(), ConfigError> {
        validate_positive(ConfigField::CycleDuration, duration)?;
        if duration != self.cycle_duration {
            self.cycle_duration = duration;
            self.geometry_revision += 1;
        }
        Ok(())
    }

    pub fn set_opacity_mode(&mut self, enabled: bool) {
        self.opacity_mode = enabled;
    }

    pub fn set_palette_cycling(&mut self, enabled: bool) {
        self.palette_cycling = enabled;
    }

    pub fn set_style(&mut self, style: DiskStyle) {
        self.style = style;
    }

    /// Swap the fill and stroke colors.
    pub fn invert_style(&mut self) {
        self.style = self.style.inverted();
    }
}

impl Default for Configuration {
    fn default() -> Self {
        let config = SpiralConfig::default();
        Self {
            viewport_width: config.viewport_width,
            disks_per_cycle: config.disks_per_cycle,
            speed: config.speed,
            frames_per_second: config.frames_per_second,
            cycle_duration: config.cycle_duration,
            opacity_mode: config.opacity_mode,
            palette_cycling: config.palette_cycling,
            palette_interval: Duration::from_millis(config.palette_interval_millis),
            style: config.style,
            geometry_revision: 0,
        }
    }
}

fn validate_positive(field: ConfigField, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(field, "must be a positive number"))
    }
}

fn validate_frame_rate(frames_per_second: f64) -> Result<(), ConfigError> {
    if (MIN_FRAME_RATE..=MAX_FRAME_RATE).contains(&frames_per_second.abs()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(ConfigField::FramesPerSecond, "must be between 1 and 1000 in either direction"))
    }
}

fn validate_disk_count(disks_per_cycle: u32, speed: f64) -> Result<(), ConfigError> {
    let count = (disks_per_cycle as f64 / speed).floor();
    if count < 1.0 {
        Err(ConfigError::Invalid(ConfigField::Speed, "leaves no disks to draw"))
    } else if count > MAX_DISK_COUNT as f64 {
        Err(ConfigError::Invalid(ConfigField::Speed, "produces too many disks"))
    } else {
        Ok(())
    }
}

/// A configuration field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigField {
    ViewportWidth,
    DisksPerCycle,
    Speed,
    FramesPerSecond,
    CycleDuration,
    PaletteInterval,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0} {1}")]
    Invalid(ConfigField, &'static str),

    #[error("reading config file {0:?}: {1}")]
    Io(PathBuf, io::Error),

    #[error("parsing config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use rstest::rstest;
    use std::io::Write;

    fn configuration() -> Configuration {
        SpiralConfig::default().validate().expect("invalid default config")
    }

    #[test]
    fn default_disk_count() {
        // floor(8 / 0.05)
        assert_eq!(configuration().disk_count(), 160);
    }

    #[test]
    fn default_timing() {
        let config = configuration();
        assert_eq!(config.ticks_per_cycle(), 40);
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
    }

    #[rstest]
    #[case::zero_frame_rate(SpiralConfig { frames_per_second: 0.0, ..Default::default() }, ConfigField::FramesPerSecond)]
    #[case::nan_frame_rate(SpiralConfig { frames_per_second: f64::NAN, ..Default::default() }, ConfigField::FramesPerSecond)]
    #[case::tiny_frame_rate(SpiralConfig { frames_per_second: 1e-20, ..Default::default() }, ConfigField::FramesPerSecond)]
    #[case::tiny_reverse_frame_rate(SpiralConfig { frames_per_second: -0.5, ..Default::default() }, ConfigField::FramesPerSecond)]
    #[case::huge_frame_rate(SpiralConfig { frames_per_second: 1e12, ..Default::default() }, ConfigField::FramesPerSecond)]
    #[case::zero_speed(SpiralConfig { speed: 0.0, ..Default::default() }, ConfigField::Speed)]
    #[case::negative_speed(SpiralConfig { speed: -1.0, ..Default::default() }, ConfigField::Speed)]
    #[case::zero_disks(SpiralConfig { disks_per_cycle: 0, ..Default::default() }, ConfigField::DisksPerCycle)]
    #[case::negative_width(SpiralConfig { viewport_width: -10.0, ..Default::default() }, ConfigField::ViewportWidth)]
    #[case::zero_duration(SpiralConfig { cycle_duration: 0.0, ..Default::default() }, ConfigField::CycleDuration)]
    #[case::no_disks(SpiralConfig { disks_per_cycle: 1, speed: 2.0, ..Default::default() }, ConfigField::Speed)]
    #[case::too_many_disks(SpiralConfig { speed: 0.00001, ..Default::default() }, ConfigField::Speed)]
    fn invalid(#[case] config: SpiralConfig, #[case] expected: ConfigField) {
        let Err(ConfigError::Invalid(field, _)) = config.validate() else { panic!("not rejected") };
        assert_eq!(field, expected);
    }

    #[test]
    fn rejected_setter_keeps_value() {
        let mut config = configuration();
        assert!(config.set_frames_per_second(0.0).is_err());
        assert!(config.set_frames_per_second(1e-20).is_err());
        assert!(config.set_speed(0.0).is_err());
        assert!(config.set_viewport_width(f64::INFINITY).is_err());
        assert_eq!(config.frames_per_second(), 20.0);
        assert_eq!(config.speed(), 0.05);
        assert_eq!(config.viewport_width(), 400.0);
        assert_eq!(config.geometry_revision(), 0);
    }

    #[rstest]
    #[case::fastest(MAX_FRAME_RATE, Duration::from_millis(1))]
    #[case::slowest(MIN_FRAME_RATE, Duration::from_secs(1))]
    #[case::slowest_reverse(-MIN_FRAME_RATE, Duration::from_secs(1))]
    fn frame_rate_bounds(#[case] frames_per_second: f64, #[case] expected: Duration) {
        let mut config = configuration();
        config.set_frames_per_second(frames_per_second).expect("set fps failed");
        assert_eq!(config.tick_interval(), expected);
    }

    #[test]
    fn geometry_changes_bump_revision() {
        let mut config = configuration();
        config.set_speed(0.1).expect("set speed failed");
        assert_eq!(config.geometry_revision(), 1);
        assert_eq!(config.disk_count(), 80);

        config.set_disks_per_cycle(4).expect("set disks failed");
        assert_eq!(config.geometry_revision(), 2);
        assert_eq!(config.disk_count(), 40);

        config.set_viewport_width(200.0).expect("set width failed");
        assert_eq!(config.geometry_revision(), 3);

        // unchanged values and non geometry settings leave it alone
        config.set_viewport_width(200.0).expect("set width failed");
        config.set_frames_per_second(10.0).expect("set fps failed");
        config.set_opacity_mode(true);
        assert_eq!(config.geometry_revision(), 3);
    }

    #[test]
    fn direction() {
        let mut config = configuration();
        assert_eq!(config.direction(), Direction::Forward);
        config.set_direction(Direction::Reverse);
        assert_eq!(config.frames_per_second(), -20.0);
        assert_eq!(config.direction(), Direction::Reverse);
        assert_eq!(config.ticks_per_cycle(), 40);
        config.set_direction(Direction::Reverse);
        assert_eq!(config.frames_per_second(), -20.0);
        config.set_direction(Direction::Forward);
        assert_eq!(config.frames_per_second(), 20.0);
    }

    #[test]
    fn invert_style() {
        let mut config = configuration();
        config.invert_style();
        assert_eq!(config.style(), DiskStyle { fill: Color::BLACK, stroke: Color::WHITE });
    }

    #[test]
    fn load_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file failed");
        let contents = r##"
speed: 0.1
frames_per_second: -30
opacity_mode: true
style:
  fill: "#FF0000"
  stroke: "#00ff00"
"##;
        file.write_all(contents.as_bytes()).expect("write failed");

        let config = SpiralConfig::load(file.path()).expect("load failed");
        assert_eq!(config.speed, 0.1);
        assert_eq!(config.frames_per_second, -30.0);
        assert!(config.opacity_mode);
        assert_eq!(config.disks_per_cycle, 8);
        assert_eq!(config.style, DiskStyle { fill: Color::new(255, 0, 0), stroke: Color::new(0, 255, 0) });

        let config = config.validate().expect("invalid config");
        assert_eq!(config.direction(), Direction::Reverse);
        assert_eq!(config.disk_count(), 80);
    }

    #[test]
    fn load_empty_file() {
        let file = tempfile::NamedTempFile::new().expect("temp file failed");
        let config = SpiralConfig::load(file.path()).expect("load failed");
        assert_eq!(config, SpiralConfig::default());
    }

    #[rstest]
    #[case::unknown_field("bogus: 3")]
    #[case::bad_color("style:\n  fill: nope\n  stroke: \"#000000\"")]
    fn load_invalid_file(#[case] contents: &str) {
        let mut file = tempfile::NamedTempFile::new().expect("temp file failed");
        file.write_all(contents.as_bytes()).expect("write failed");
        assert!(matches!(SpiralConfig::load(file.path()), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn load_missing_file() {
        let result = SpiralConfig::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }
}
