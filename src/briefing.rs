//! Mission briefings
//!
//! Flavor text shown before each wave. The text comes from a remote text
//! generator when one is configured; any failure is replaced with a fixed
//! fallback so the briefing screen never blocks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Waves after this one are flavored as endless survival
const CAMPAIGN_FLAVOR_WAVES: u32 = 5;

/// Title, description, and intel line for one wave
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Briefing {
    pub title: String,
    pub description: String,
    #[serde(rename = "enemyIntel")]
    pub enemy_intel: String,
}

#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("generator answered with status {0}")]
    Status(u16),
    #[error("malformed briefing: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("generator returned no text")]
    Empty,
}

impl Briefing {
    /// Used when no generator is configured
    pub fn offline(wave: u32) -> Self {
        Self {
            title: format!("Sector {} Initiated", wave),
            description: "Communications offline. Proceed with caution.".to_string(),
            enemy_intel: "Unknown hostiles detected on radar.".to_string(),
        }
    }

    /// Used when the generator fails or answers with garbage
    pub fn fallback(wave: u32) -> Self {
        Self {
            title: format!("Wave {}: Emergency Override", wave),
            description: "AI Link Unstable. Manual control engaged.".to_string(),
            enemy_intel: "Hostile forces incoming. Eliminate all targets.".to_string(),
        }
    }

    /// Parse a generator reply. Empty fields count as a malformed reply.
    pub fn parse(text: &str) -> Result<Self, BriefingError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BriefingError::Empty);
        }
        let briefing: Briefing = serde_json::from_str(text)?;
        if briefing.title.trim().is_empty() {
            return Err(BriefingError::Empty);
        }
        Ok(briefing)
    }
}

/// Mode flavor used in the prompt
pub fn mode_flavor(wave: u32) -> &'static str {
    if wave > CAMPAIGN_FLAVOR_WAVES {
        "Endless Survival"
    } else {
        "Campaign Operation"
    }
}

/// Prompt sent to the text generator
pub fn prompt(wave: u32) -> String {
    format!(
        "You are a sci-fi military commander. Generate a very short, intense mission briefing for \"Wave {}\" of a space battle in \"{}\" mode. Format as JSON: {{title, description, enemyIntel}}. Keep it under 50 words total. JSON only.",
        wave,
        mode_flavor(wave)
    )
}

/// Settle a fetch outcome, substituting the fallback on any error
pub fn resolve(result: Result<Briefing, BriefingError>, wave: u32) -> Briefing {
    match result {
        Ok(briefing) => briefing,
        Err(e) => {
            log::warn!("Briefing for wave {} unavailable ({}), using fallback", wave, e);
            Briefing::fallback(wave)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::fetch_briefing;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    use super::{Briefing, BriefingError, prompt};

    fn js_err(e: JsValue) -> BriefingError {
        BriefingError::Network(format!("{:?}", e))
    }

    /// POST the prompt to `endpoint` and parse the reply body as a briefing
    pub async fn fetch_briefing(endpoint: &str, wave: u32) -> Result<Briefing, BriefingError> {
        let window = web_sys::window().ok_or_else(|| BriefingError::Network("no window".to_string()))?;

        let body = serde_json::json!({ "prompt": prompt(wave) }).to_string();
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(endpoint, &opts).map_err(js_err)?;
        request.headers().set("Content-Type", "application/json").map_err(js_err)?;

        let reply = JsFuture::from(window.fetch_with_request(&request)).await.map_err(js_err)?;
        let response: Response = reply.dyn_into().map_err(js_err)?;
        if !response.ok() {
            return Err(BriefingError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(js_err)?).await.map_err(js_err)?;
        let text = text.as_string().ok_or(BriefingError::Empty)?;
        Briefing::parse(&text)
    }
}
