// Startup configuration. Read once from the process environment, with an
// optional `.env` file filling in whatever is not already set.

use crate::error::Error;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 800;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub debug: bool,
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("canvas_width", &self.canvas_width)
            .field("canvas_height", &self.canvas_height)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any) and read the real environment.
    pub fn from_env() -> Result<Self, Error> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. A missing or blank `OPENAI_API_KEY`
    /// is fatal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty())
            .ok_or(Error::MissingApiKey)?;

        let api_base = lookup("OPENAI_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        let model = lookup("MATH_NOTES_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        Ok(Self {
            api_key,
            api_base,
            model,
            max_tokens: parse_or(&lookup, "MATH_NOTES_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            timeout_secs: parse_or(&lookup, "MATH_NOTES_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            debug: lookup("MATH_NOTES_DEBUG").is_some_and(|v| parse_flag(&v)),
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(api_base: &str) -> Self {
        let base = api_base.to_owned();
        Self::from_lookup(move |name| match name {
            "OPENAI_API_KEY" => Some("sk-test".into()),
            "OPENAI_BASE_URL" => Some(base.clone()),
            _ => None,
        })
        .expect("test config")
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| Error::InvalidConfig { name, value: raw }),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_or_blank_key_is_fatal() {
        assert!(matches!(Config::from_lookup(lookup_from(&[])), Err(Error::MissingApiKey)));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")])),
            Err(Error::MissingApiKey)
        ));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-1")])).expect("config");
        assert_eq!(config.api_key, "sk-1");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!((config.canvas_width, config.canvas_height), (1200, 800));
        assert!(!config.debug);
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-1"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("MATH_NOTES_MODEL", "local-vision"),
            ("MATH_NOTES_MAX_TOKENS", " 64 "),
            ("MATH_NOTES_TIMEOUT_SECS", "5"),
            ("MATH_NOTES_DEBUG", "TRUE"),
        ]))
        .expect("config");
        assert_eq!(config.api_base, "http://localhost:8080/v1");
        assert_eq!(config.model, "local-vision");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.timeout_secs, 5);
        assert!(config.debug);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-1"), ("MATH_NOTES_MAX_TOKENS", "lots")]))
            .expect_err("should reject");
        assert!(matches!(err, Error::InvalidConfig { name: "MATH_NOTES_MAX_TOKENS", .. }));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-secret")])).expect("config");
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
