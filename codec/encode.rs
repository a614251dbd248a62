/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::borrow::Cow;

use url::Url;

use super::{ActionRequestFields, BlinkFields, CodecError, ensure_https, escape_component};
use crate::registries::protocol::{
    BLINKS_QUERY_PARAM, LABEL_QUERY_PARAM, MESSAGE_QUERY_PARAM, ProtocolScheme,
};

/// Encode `fields` as `<scheme>:<link>[?label=..&message=..]`.
///
/// A link carrying a query or fragment is percent-encoded as a whole so its
/// own parameters cannot mix with the outer `label`/`message`. Otherwise the
/// link is used as-is; only the bare root path `/` is dropped, so
/// `https://a.io/donate/` keeps its trailing slash.
pub fn encode_action_url(
    fields: &ActionRequestFields,
    scheme: ProtocolScheme,
) -> Result<Url, CodecError> {
    ensure_https(&fields.link)?;

    let link = fields.link.as_str();
    let pathname = if fields.link.query().is_some() || fields.link.fragment().is_some() {
        Cow::Owned(escape_component(link))
    } else if fields.link.path() == "/" {
        Cow::Borrowed(link.strip_suffix('/').unwrap_or(link))
    } else {
        Cow::Borrowed(link)
    };

    let mut url = Url::parse(&format!("{scheme}:{pathname}"))
        .map_err(|error| CodecError::InvalidUrl(error.to_string()))?;

    if fields.label.is_some() || fields.message.is_some() {
        let mut pairs = url.query_pairs_mut();
        if let Some(label) = &fields.label {
            pairs.append_pair(LABEL_QUERY_PARAM, label);
        }
        if let Some(message) = &fields.message {
            pairs.append_pair(MESSAGE_QUERY_PARAM, message);
        }
    }

    Ok(url)
}

/// Encode a blink: the Action URL for `fields.action`, escaped, becomes the
/// `action` query parameter of `fields.blink`. Other parameters on the blink
/// are kept; an existing `action` parameter is replaced.
pub fn encode_blink_url(fields: &BlinkFields, scheme: ProtocolScheme) -> Result<Url, CodecError> {
    if !matches!(fields.blink.scheme(), "http" | "https") {
        return Err(CodecError::InvalidBlink(fields.blink.scheme().to_string()));
    }
    let action = encode_action_url(&fields.action, scheme)?;

    let mut url = fields.blink.clone();
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != BLINKS_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(BLINKS_QUERY_PARAM, &escape_component(action.as_str()));

    Ok(url)
}
