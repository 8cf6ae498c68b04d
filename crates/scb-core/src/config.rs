use std::{env, fs, path::Path, time::Duration};

use chrono::{FixedOffset, NaiveTime};

use crate::{broadcast::BroadcastConfig, errors::Error, Result};

/// Typed configuration for the bot, loaded from the environment (with an
/// optional `.env` file that never overrides existing variables).
#[derive(Clone, Debug)]
pub struct Config {
    // Messenger
    pub page_access_token: String,
    pub verify_token: String,

    // Providers
    pub api_bible_key: Option<String>,
    pub api_bible_id: String,

    // HTTP surface
    pub port: u16,

    // Transport limits
    pub message_limit: usize,
    pub safe_message_limit: usize,

    // Broadcast
    pub broadcast_times: Vec<NaiveTime>,
    pub broadcast_utc_offset: FixedOffset,
    pub pacing_delay: Duration,
    pub welcome_delay: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let page_access_token = env_str("PAGE_ACCESS_TOKEN").unwrap_or_default();
        if page_access_token.trim().is_empty() {
            return Err(Error::Config(
                "PAGE_ACCESS_TOKEN environment variable is required".to_string(),
            ));
        }

        let verify_token = env_str("VERIFY_TOKEN").unwrap_or_default();
        if verify_token.trim().is_empty() {
            return Err(Error::Config(
                "VERIFY_TOKEN environment variable is required".to_string(),
            ));
        }

        // The keyed provider is optional; without a key it is simply not wired.
        let api_bible_key = env_str("API_BIBLE_KEY").and_then(non_empty);
        // KJV on API.bible.
        let api_bible_id =
            env_str("API_BIBLE_ID").unwrap_or_else(|| "de4e12af7f28f599-02".to_string());

        let port = env_u16("PORT").unwrap_or(3000);

        // Messenger caps text messages at 2000 chars; chunk below that.
        let message_limit = env_usize("MESSAGE_LIMIT").unwrap_or(2000);
        let safe_message_limit = env_usize("SAFE_MESSAGE_LIMIT").unwrap_or(1900);

        let broadcast_times = parse_times(env_str("BROADCAST_TIMES"))?;
        let offset_hours = env_i32("BROADCAST_UTC_OFFSET_HOURS").unwrap_or(8);
        let broadcast_utc_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
            Error::Config(format!("invalid BROADCAST_UTC_OFFSET_HOURS: {offset_hours}"))
        })?;

        let pacing_delay = Duration::from_millis(env_u64("PACING_DELAY_MS").unwrap_or(100));
        let welcome_delay = Duration::from_secs(env_u64("WELCOME_DELAY_SECS").unwrap_or(2));

        Ok(Self {
            page_access_token,
            verify_token,
            api_bible_key,
            api_bible_id,
            port,
            message_limit,
            safe_message_limit,
            broadcast_times,
            broadcast_utc_offset,
            pacing_delay,
            welcome_delay,
        })
    }

    pub fn broadcast(&self) -> BroadcastConfig {
        BroadcastConfig {
            fire_times: self.broadcast_times.clone(),
            utc_offset: self.broadcast_utc_offset,
            pacing_delay: self.pacing_delay,
        }
    }
}

/// Morning and evening in the broadcast time zone.
const DEFAULT_BROADCAST_TIMES: &str = "06:00,18:00";

fn parse_times(raw: Option<String>) -> Result<Vec<NaiveTime>> {
    let raw = raw.unwrap_or_else(|| DEFAULT_BROADCAST_TIMES.to_string());
    let mut times = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let t = NaiveTime::parse_from_str(part, "%H:%M")
            .map_err(|_| Error::Config(format!("invalid broadcast time: {part}")))?;
        times.push(t);
    }
    if times.is_empty() {
        return Err(Error::Config("BROADCAST_TIMES is empty".to_string()));
    }
    Ok(times)
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u16(key: &str) -> Option<u16> {
    env_str(key).and_then(|s| s.trim().parse::<u16>().ok())
}

fn env_i32(key: &str) -> Option<i32> {
    env_str(key).and_then(|s| s.trim().parse::<i32>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_broadcast_times() {
        let times = parse_times(None).unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times[0], NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(times[1], NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn parses_custom_times_and_rejects_garbage() {
        let times = parse_times(Some("07:30, 21:15".to_string())).unwrap();
        assert_eq!(times[1], NaiveTime::from_hms_opt(21, 15, 0).unwrap());

        assert!(parse_times(Some("25:99".to_string())).is_err());
        assert!(parse_times(Some("".to_string())).is_err());
    }
}
