// Client for the WAQI city feed API.
use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api returned status \"{0}\"")]
    Status(String),
    #[error("malformed feed: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("AQTOP_API_URL")
                .unwrap_or_else(|_| "https://api.waqi.info".into()),
            token: std::env::var("AQTOP_TOKEN").unwrap_or_else(|_| "demo".into()),
        }
    }

    fn feed_url(&self, city: &str) -> String {
        format!("{}/feed/{}/?token={}", self.base_url, city, self.token)
    }
}

#[derive(Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reading {
    pub v: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Station {
    pub geo: [f64; 2],
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedTime {
    pub s: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityFeed {
    pub aqi: f64,
    #[serde(default)]
    pub iaqi: HashMap<String, Reading>,
    pub time: FeedTime,
    pub city: Station,
}

impl CityFeed {
    // Individual sensor reading, e.g. "t" (temperature), "h" (humidity).
    pub fn reading(&self, code: &str) -> Option<f64> {
        self.iaqi.get(code).map(|r| r.v)
    }

    // All readings as (code, value) pairs in stable alphabetical order.
    // Formatting is left to the display layer.
    pub fn pollutants(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .iaqi
            .iter()
            .map(|(code, r)| (code.clone(), r.v))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn lat(&self) -> f64 {
        self.city.geo[0]
    }

    pub fn lng(&self) -> f64 {
        self.city.geo[1]
    }
}

fn decode_feed(raw: &str) -> Result<CityFeed, ApiError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.status != "ok" {
        // error payloads carry a message in `data`
        let detail = envelope
            .data
            .as_str()
            .map(|s| format!("{}: {}", envelope.status, s))
            .unwrap_or(envelope.status);
        return Err(ApiError::Status(detail));
    }
    Ok(serde_json::from_value(envelope.data)?)
}

pub async fn fetch_city(cfg: &ApiConfig, city: &str) -> Result<CityFeed, ApiError> {
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
    let res = client.get(cfg.feed_url(city)).send().await?;
    let body = res.error_for_status()?.text().await?;
    decode_feed(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_FEED: &str = r#"{
        "status": "ok",
        "data": {
            "aqi": 154,
            "city": { "geo": [18.5204, 73.8567], "name": "Pune" },
            "iaqi": {
                "pm25": { "v": 154 },
                "pm10": { "v": 88 },
                "h": { "v": 61.5 },
                "t": { "v": 27.0 }
            },
            "time": { "s": "2026-08-07 11:00:00" }
        }
    }"#;

    #[test]
    fn decodes_a_well_formed_feed() {
        let feed = decode_feed(OK_FEED).unwrap();
        assert_eq!(feed.aqi, 154.0);
        assert_eq!(feed.city.name, "Pune");
        assert_eq!(feed.lat(), 18.5204);
        assert_eq!(feed.lng(), 73.8567);
        assert_eq!(feed.time.s, "2026-08-07 11:00:00");
    }

    #[test]
    fn missing_sensor_readings_are_none() {
        let feed = decode_feed(OK_FEED).unwrap();
        assert_eq!(feed.reading("t"), Some(27.0));
        assert_eq!(feed.reading("w"), None);
    }

    #[test]
    fn pollutants_come_out_in_stable_order() {
        let feed = decode_feed(OK_FEED).unwrap();
        let codes: Vec<String> = feed.pollutants().into_iter().map(|(c, _)| c).collect();
        assert_eq!(codes, vec!["h", "pm10", "pm25", "t"]);
    }

    #[test]
    fn error_status_is_surfaced_with_its_message() {
        let raw = r#"{ "status": "error", "data": "Unknown station" }"#;
        match decode_feed(raw) {
            Err(ApiError::Status(msg)) => assert_eq!(msg, "error: Unknown station"),
            other => panic!("expected status error, got {:?}", other.map(|f| f.aqi)),
        }
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        assert!(matches!(decode_feed("<html>"), Err(ApiError::Decode(_))));
    }
}
