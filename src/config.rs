use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub typing: TypingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TypingConfig {
    /// Longest text one segment may stage on the clipboard; the rest is
    /// silently dropped
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
    /// Delay between staging the clipboard and sending the paste chord (ms)
    #[serde(default = "default_paste_settle_ms")]
    pub paste_settle_ms: u64,
    /// Delay after the paste chord before the next segment (ms)
    #[serde(default = "default_paste_grace_ms")]
    pub paste_grace_ms: u64,
    /// Per-segment trace on stderr
    #[serde(default)]
    pub verbose: bool,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            paste_settle_ms: default_paste_settle_ms(),
            paste_grace_ms: default_paste_grace_ms(),
            verbose: false,
        }
    }
}

fn default_max_text_chars() -> usize {
    10_000
}

fn default_paste_settle_ms() -> u64 {
    50
}

fn default_paste_grace_ms() -> u64 {
    100
}

impl Config {
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if path.exists() {
            fs::read_to_string(path)
                .ok()
                .and_then(|s| toml::from_str(&s).ok())
                .unwrap_or_default()
        } else {
            Config::default()
        }
    }
}
