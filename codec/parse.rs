/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use url::Url;

use super::{ActionRequestFields, ActionUrl, BlinkFields, CodecError, ensure_https, unescape_link};
use crate::registries::protocol::{
    BLINKS_QUERY_PARAM, LABEL_QUERY_PARAM, MESSAGE_QUERY_PARAM, ProtocolScheme,
};

pub fn parse_url_str(text: &str) -> Result<ActionUrl, CodecError> {
    let url = Url::parse(text.trim()).map_err(|error| CodecError::InvalidUrl(error.to_string()))?;
    parse_url(&url)
}

/// Parse an Action URL or a blink. `http`/`https` URLs are treated as blinks;
/// anything else must use a registered Action scheme.
pub fn parse_url(url: &Url) -> Result<ActionUrl, CodecError> {
    match url.scheme() {
        "http" | "https" => parse_blink_url(url).map(ActionUrl::Blink),
        scheme => {
            if ProtocolScheme::from_scheme(scheme).is_none() {
                return Err(CodecError::InvalidProtocol(scheme.to_string()));
            }
            parse_action_request_url(url).map(ActionUrl::Action)
        }
    }
}

fn parse_action_request_url(url: &Url) -> Result<ActionRequestFields, CodecError> {
    // `scheme://authority/...` has no opaque part to carry a link.
    let opaque = if url.cannot_be_a_base() { url.path() } else { "" };
    if opaque.is_empty() {
        return Err(CodecError::MissingPathname);
    }
    if !opaque.contains(|c| c == ':' || c == '%') {
        return Err(CodecError::InvalidPathname);
    }

    let link = Url::parse(&unescape_link(opaque)?)
        .map_err(|error| CodecError::InvalidUrl(error.to_string()))?;
    ensure_https(&link)?;

    // Absent hints decode as empty strings rather than `None`.
    let label = query_value(url, LABEL_QUERY_PARAM).unwrap_or_default();
    let message = query_value(url, MESSAGE_QUERY_PARAM).unwrap_or_default();

    Ok(ActionRequestFields {
        link,
        label: Some(label),
        message: Some(message),
    })
}

fn parse_blink_url(blink: &Url) -> Result<BlinkFields, CodecError> {
    let value = query_value(blink, BLINKS_QUERY_PARAM)
        .filter(|value| !value.is_empty())
        .ok_or(CodecError::MissingActionParam)?;
    let inner = unescape_link(&value)?;

    let nested =
        parse_url_str(&inner).map_err(|error| CodecError::NestedParseFailed(Box::new(error)))?;
    match nested {
        ActionUrl::Action(action) => Ok(BlinkFields {
            blink: blink.clone(),
            action,
        }),
        ActionUrl::Blink(_) => Err(CodecError::NestedBlink),
    }
}

fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
