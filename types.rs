/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! JSON payloads exchanged with action providers.

use std::str::FromStr;

use actions_wire::{Pubkey, WireError, parse_pubkey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Body of the metadata GET. Currently empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGetRequest {}

/// Provider metadata describing how to render an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGetResponse {
    /// Absolute image URL.
    pub icon: String,
    pub title: String,
    pub description: String,
    /// Button text.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
    /// Non-fatal error to show alongside the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
}

impl ActionGetResponse {
    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    pub fn linked_actions(&self) -> &[LinkedAction] {
        self.links
            .as_ref()
            .map(|links| links.actions.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLinks {
    #[serde(default)]
    pub actions: Vec<LinkedAction>,
}

/// Related action on the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAction {
    pub href: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

/// User input accepted by a linked action, substituted into `href`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl ActionParameter {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPostRequest {
    /// Base58 public key of the account that may sign the transaction.
    pub account: String,
}

impl ActionPostRequest {
    pub fn new(account: &Pubkey) -> Self {
        Self {
            account: account.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPostResponse {
    /// Base64 serialized transaction.
    #[serde(default)]
    pub transaction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    pub message: String,
}

/// Lookup tag embedded as a read-only account in a transaction. Carries no
/// signing authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference(Pubkey);

impl Reference {
    pub const fn new(key: Pubkey) -> Self {
        Self(key)
    }

    pub fn pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl From<Pubkey> for Reference {
    fn from(key: Pubkey) -> Self {
        Self(key)
    }
}

impl FromStr for Reference {
    type Err = WireError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_pubkey(text).map(Self)
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
