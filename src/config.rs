use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::scan::{DEFAULT_EXTENSIONS, ExtensionMatcher};
use crate::zone::Zone;

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
/// 43 800 minutes, roughly one month.
const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(43_800 * 60);

const DEFAULT_SLIDE_DURATION: Duration = Duration::from_secs(30);
const MAX_SLIDE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_BORDER: u32 = 300;
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKGROUND: &str = "000000";
const DEFAULT_BORDER_COLOR: &str = "255, 255, 255";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Directory scanned (recursively) for dated photos.
    pub photo_dir: PathBuf,
    /// Case-sensitive glob patterns matched against bare filenames.
    pub extensions: Vec<String>,
    /// Shuffle the visible photos on every refresh instead of sorting them.
    pub shuffle: bool,
    /// Optional deterministic seed for the shuffle RNG.
    pub shuffle_seed: Option<u64>,
    /// `Local` or an IANA zone name; used for filename dates and the cutoff.
    pub timezone: Zone,
    /// How often the photo list is rebuilt.
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,
    pub server: ServerSettings,
    pub display: DisplaySettings,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            photo_dir: PathBuf::from("img"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            shuffle: false,
            shuffle_seed: None,
            timezone: Zone::Local,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            server: ServerSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Reject settings the slideshow cannot run with and reset out-of-range
    /// numbers to their defaults, logging each substitution.
    pub fn validated(mut self) -> Result<Self> {
        ensure!(
            !self.photo_dir.as_os_str().is_empty(),
            "photo-dir must not be empty"
        );
        ensure!(
            !self.extensions.is_empty(),
            "extensions must list at least one pattern"
        );
        ExtensionMatcher::new(self.extensions.as_slice())
            .context("invalid extensions configuration")?;

        if !(MIN_REFRESH_INTERVAL..=MAX_REFRESH_INTERVAL).contains(&self.refresh_interval) {
            tracing::warn!(
                requested = %humantime::format_duration(self.refresh_interval),
                "refresh-interval must be between 1 minute and 43800 minutes; using 1 hour"
            );
            self.refresh_interval = DEFAULT_REFRESH_INTERVAL;
        }
        self.server.validate();
        self.display.validate();
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ServerSettings {
    pub bind_address: IpAddr,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    fn validate(&mut self) {
        if self.port == 0 {
            tracing::warn!("server.port must be between 1 and 65535; using {DEFAULT_PORT}");
            self.port = DEFAULT_PORT;
        }
    }
}

/// Parameters handed to the page renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Time each photo stays on screen.
    #[serde(with = "humantime_serde")]
    pub slide_duration: Duration,
    /// Page background as a hex RGB string without `#`.
    pub background: String,
    /// Glow border size in pixels; `0` disables it.
    pub border: u32,
    /// Border color as `"r, g, b"`.
    pub border_color: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            slide_duration: DEFAULT_SLIDE_DURATION,
            background: DEFAULT_BACKGROUND.to_string(),
            border: 0,
            border_color: DEFAULT_BORDER_COLOR.to_string(),
        }
    }
}

impl DisplaySettings {
    pub fn border_enabled(&self) -> bool {
        self.border > 0
    }

    fn validate(&mut self) {
        if self.slide_duration > MAX_SLIDE_DURATION {
            tracing::warn!(
                requested = %humantime::format_duration(self.slide_duration),
                "display.slide-duration must be at most 24 hours; using 30 seconds"
            );
            self.slide_duration = DEFAULT_SLIDE_DURATION;
        }
        if self.border > MAX_BORDER {
            tracing::warn!(
                requested = self.border,
                "display.border must be between 0 and {MAX_BORDER}; border disabled"
            );
            self.border = 0;
        }
        if is_hex_color(&self.background) {
            self.background = self.background.trim_start_matches('#').to_string();
        } else {
            tracing::warn!(
                requested = %self.background,
                "display.background must be a hex color such as 1a1a1a; using {DEFAULT_BACKGROUND}"
            );
            self.background = DEFAULT_BACKGROUND.to_string();
        }
        match parse_rgb(&self.border_color) {
            Some([r, g, b]) => self.border_color = format!("{r}, {g}, {b}"),
            None => {
                tracing::warn!(
                    requested = %self.border_color,
                    "display.border-color must look like \"255, 255, 255\"; using default"
                );
                self.border_color = DEFAULT_BORDER_COLOR.to_string();
            }
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    let value = value.trim_start_matches('#');
    matches!(value.len(), 3 | 6) && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn parse_rgb(value: &str) -> Option<[u8; 3]> {
    let mut parts = value.split(',').map(|p| p.trim().parse::<u8>());
    let rgb = [parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?];
    parts.next().is_none().then_some(rgb)
}
