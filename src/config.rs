//! Color scheme and interval configuration
//!
//! `ntop.conf` holds one `KEY VALUE` pair per line. Colors are console
//! attribute words: the low nibble is the foreground, the high nibble the
//! background, each built from blue=1, green=2, red=4 and intensity=8.

use std::fs;
use std::io;
use std::ops::BitOr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::style::Color;
use thiserror::Error;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_REDRAW_MS, DEFAULT_SAMPLE_MS, MAX_INTERVAL_MS, MIN_INTERVAL_MS,
};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

// ============================================================================
// Console attributes
// ============================================================================

const FOREGROUND_BLUE: u16 = 0x1;
const FOREGROUND_GREEN: u16 = 0x2;
const FOREGROUND_RED: u16 = 0x4;
const FOREGROUND_INTENSITY: u16 = 0x8;
const FOREGROUND_WHITE: u16 = FOREGROUND_RED | FOREGROUND_GREEN | FOREGROUND_BLUE;
const FOREGROUND_CYAN: u16 = FOREGROUND_INTENSITY | FOREGROUND_GREEN | FOREGROUND_BLUE;
const BACKGROUND_BLUE: u16 = 0x10;
const BACKGROUND_GREEN: u16 = 0x20;
const BACKGROUND_RED: u16 = 0x40;
const BACKGROUND_INTENSITY: u16 = 0x80;
const BACKGROUND_WHITE: u16 = BACKGROUND_RED | BACKGROUND_GREEN | BACKGROUND_BLUE;
const BACKGROUND_CYAN: u16 = BACKGROUND_INTENSITY | BACKGROUND_GREEN | BACKGROUND_BLUE;

/// A console text attribute: foreground and background in one word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleAttr(pub u16);

impl BitOr for ConsoleAttr {
    type Output = ConsoleAttr;

    fn bitor(self, rhs: Self) -> Self::Output {
        ConsoleAttr(self.0 | rhs.0)
    }
}

/// Maps one 4-bit console color to the matching terminal color.
fn nibble_color(nibble: u16) -> Color {
    match nibble & 0xF {
        0x0 => Color::Black,
        0x1 => Color::DarkBlue,
        0x2 => Color::DarkGreen,
        0x3 => Color::DarkCyan,
        0x4 => Color::DarkRed,
        0x5 => Color::DarkMagenta,
        0x6 => Color::DarkYellow,
        0x7 => Color::Grey,
        0x8 => Color::DarkGrey,
        0x9 => Color::Blue,
        0xA => Color::Green,
        0xB => Color::Cyan,
        0xC => Color::Red,
        0xD => Color::Magenta,
        0xE => Color::Yellow,
        _ => Color::White,
    }
}

impl ConsoleAttr {
    pub fn fg(&self) -> Color {
        nibble_color(self.0)
    }

    /// Background color; an empty high nibble keeps the terminal default.
    pub fn bg(&self) -> Color {
        match (self.0 >> 4) & 0xF {
            0 => Color::Reset,
            nibble => nibble_color(nibble),
        }
    }
}

// ============================================================================
// Color scheme
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub fg: ConsoleAttr,
    /// Secondary text and tagged rows
    pub bg: ConsoleAttr,
    pub fg_highlight: ConsoleAttr,
    /// Selected row, active column, command line
    pub bg_highlight: ConsoleAttr,
    pub menu_bar: ConsoleAttr,
    pub list_header: ConsoleAttr,
    pub cpu_bar: ConsoleAttr,
    pub memory_bar: ConsoleAttr,
    pub page_bar: ConsoleAttr,
    pub error: ConsoleAttr,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            fg: ConsoleAttr(FOREGROUND_WHITE),
            bg: ConsoleAttr(FOREGROUND_INTENSITY),
            fg_highlight: ConsoleAttr(FOREGROUND_CYAN),
            bg_highlight: ConsoleAttr(BACKGROUND_CYAN),
            menu_bar: ConsoleAttr(BACKGROUND_BLUE),
            list_header: ConsoleAttr(BACKGROUND_GREEN),
            cpu_bar: ConsoleAttr(FOREGROUND_RED),
            memory_bar: ConsoleAttr(FOREGROUND_GREEN),
            page_bar: ConsoleAttr(FOREGROUND_GREEN),
            error: ConsoleAttr(FOREGROUND_RED | FOREGROUND_INTENSITY),
        }
    }
}

impl ColorScheme {
    /// Scheme selected by `-C`
    pub fn monochrome() -> Self {
        Self {
            fg: ConsoleAttr(FOREGROUND_WHITE),
            bg: ConsoleAttr(FOREGROUND_INTENSITY),
            fg_highlight: ConsoleAttr(FOREGROUND_INTENSITY | FOREGROUND_WHITE),
            bg_highlight: ConsoleAttr(BACKGROUND_WHITE),
            menu_bar: ConsoleAttr(0),
            list_header: ConsoleAttr(BACKGROUND_WHITE),
            cpu_bar: ConsoleAttr(FOREGROUND_WHITE),
            memory_bar: ConsoleAttr(FOREGROUND_WHITE),
            page_bar: ConsoleAttr(FOREGROUND_WHITE),
            error: ConsoleAttr(FOREGROUND_INTENSITY | FOREGROUND_WHITE),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub colors: ColorScheme,
    /// Full-screen redraw cadence
    pub redraw_interval: Duration,
    /// Length of one sampling interval
    pub sample_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors: ColorScheme::default(),
            redraw_interval: Duration::from_millis(DEFAULT_REDRAW_MS),
            sample_interval: Duration::from_millis(DEFAULT_SAMPLE_MS),
        }
    }
}

/// Parses an integer like C `strtol` with base 0.
///
/// `0x` selects hex, a leading `0` octal, anything else decimal. Parsing
/// stops at the first character that is not a digit of the base; `None`
/// means no digit was found at all.
fn parse_c_integer(text: &str) -> Option<i64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (radix, digits) = if let Some(hex) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
    {
        (16, hex)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        // A lone "0" followed by junk, e.g. "0z", is still zero
        return (radix == 8).then_some(0);
    }

    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}

fn clamp_interval(ms: i64) -> Duration {
    let ms = ms.clamp(MIN_INTERVAL_MS as i64, MAX_INTERVAL_MS as i64);
    Duration::from_millis(ms as u64)
}

impl Config {
    /// Configuration for this run.
    ///
    /// The monochrome scheme skips the config file entirely.
    pub fn load(monochrome: bool) -> Result<Self, ConfigError> {
        if monochrome {
            return Ok(Self { colors: ColorScheme::monochrome(), ..Self::default() });
        }
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    /// Reads `path` over the defaults. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                log::info!("reading config from {}", path.display());
                Ok(Self::parse(&text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    /// Applies every recognized line of `text` to the defaults.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        for line in text.lines() {
            config.apply_line(line);
        }
        config
    }

    fn apply_line(&mut self, line: &str) {
        let mut fields = line.split_whitespace();
        let Some(key) = fields.next() else {
            return;
        };
        if key.starts_with('#') {
            return;
        }
        let Some(raw) = fields.next() else {
            return;
        };
        let Some(value) = parse_c_integer(raw) else {
            log::warn!("config: ignoring {} with unparsable value {:?}", key, raw);
            return;
        };

        // Attribute words are 16 bits wide
        let attr = ConsoleAttr(value as u16);
        let colors = &mut self.colors;
        match key.to_ascii_lowercase().as_str() {
            "fgcolor" => colors.fg = attr,
            "bgcolor" => colors.bg = attr,
            "fghighlightcolor" => colors.fg_highlight = attr,
            "bghighlightcolor" => colors.bg_highlight = attr,
            "menubarcolor" => colors.menu_bar = attr,
            "processlistheadercolor" => colors.list_header = attr,
            "cpubarcolor" => colors.cpu_bar = attr,
            "memorybarcolor" => colors.memory_bar = attr,
            "pagememorybarcolor" => colors.page_bar = attr,
            "errorcolor" => colors.error = attr,
            "redrawinterval" => self.redraw_interval = clamp_interval(value),
            "sampleinterval" => self.sample_interval = clamp_interval(value),
            _ => log::debug!("config: unknown key {}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_c_integer_bases() {
        assert_eq!(parse_c_integer("42"), Some(42));
        assert_eq!(parse_c_integer("0x1F"), Some(31));
        assert_eq!(parse_c_integer("0X1f"), Some(31));
        assert_eq!(parse_c_integer("017"), Some(15));
        assert_eq!(parse_c_integer("0"), Some(0));
        assert_eq!(parse_c_integer("-12"), Some(-12));
        assert_eq!(parse_c_integer("250ms"), Some(250), "stops at the first non-digit");
        assert_eq!(parse_c_integer("blue"), None);
        assert_eq!(parse_c_integer("0x"), None);
    }

    #[test]
    fn test_parse_overrides_defaults() {
        let config = Config::parse(
            "# colors\n\
             FGColor 0x0F\n\
             bghighlightcolor 0x70\n\
             RedrawInterval 500\n\
             SampleInterval 5\n\
             Unknown 1\n\
             CPUBarColor purple\n\
             MemoryBarColor\n",
        );
        assert_eq!(config.colors.fg, ConsoleAttr(0x0F));
        assert_eq!(config.colors.bg_highlight, ConsoleAttr(0x70));
        assert_eq!(config.redraw_interval, Duration::from_millis(500));
        assert_eq!(
            config.sample_interval,
            Duration::from_millis(MIN_INTERVAL_MS),
            "intervals are clamped"
        );
        assert_eq!(config.colors.cpu_bar, ColorScheme::default().cpu_bar, "bad value ignored");
        assert_eq!(config.colors.memory_bar, ColorScheme::default().memory_bar);
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        let config = Config::parse("#FGColor 0x01\n   \n");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_attribute_mapping() {
        let selected = ConsoleAttr(BACKGROUND_CYAN);
        assert_eq!(selected.fg(), Color::Black);
        assert_eq!(selected.bg(), Color::Cyan);

        let text = ConsoleAttr(FOREGROUND_WHITE);
        assert_eq!(text.fg(), Color::Grey);
        assert_eq!(text.bg(), Color::Reset);

        let tagged_selected = ConsoleAttr(FOREGROUND_INTENSITY) | selected;
        assert_eq!(tagged_selected.fg(), Color::DarkGrey);
        assert_eq!(tagged_selected.bg(), Color::Cyan);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("ntop-test-no-such-config.conf");
        let config = Config::load_from(&path).expect("missing file is fine");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_monochrome_skips_file() {
        let config = Config::load(true).expect("monochrome");
        assert_eq!(config.colors, ColorScheme::monochrome());
    }
}
