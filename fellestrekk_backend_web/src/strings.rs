// Copyright 2026 the Fellestrekk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Localized labels over HTTP.

use alloc::format;

use fellestrekk_core::strings::Strings;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Fetches `/strings/<lang>.json`.
///
/// Any failure (network, HTTP status, JSON) yields [`Strings::default`]; the
/// table stays usable with the built-in labels.
pub async fn load_strings(lang: &str) -> Strings {
    match fetch_text(&format!("/strings/{lang}.json")).await {
        Ok(Some(text)) => parse_strings(&text),
        _ => Strings::default(),
    }
}

/// Parses a strings file, falling back to the defaults if it is not valid
/// JSON.
#[must_use]
pub fn parse_strings(text: &str) -> Strings {
    serde_json::from_str(text).unwrap_or_default()
}

async fn fetch_text(url: &str) -> Result<Option<alloc::string::String>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Ok(None);
    }
    Ok(JsFuture::from(response.text()?).await?.as_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_json_falls_back_to_defaults() {
        assert_eq!(parse_strings("<html>404</html>"), Strings::default());
        assert_eq!(parse_strings(r#"{"player": "Joueur"}"#).player, "Joueur");
    }
}
