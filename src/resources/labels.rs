// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::labels::{APP_KEY, APP_VALUE, TIER_KEY};
use std::collections::BTreeMap;

/// Canonical label set of a tier, shared by pod templates and selectors
pub fn labels(tier: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (APP_KEY.to_string(), APP_VALUE.to_string()),
        (TIER_KEY.to_string(), tier.to_string()),
    ])
}
