// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// One membership organization: its membership-service-provider identifier
/// and the logical names of the peers it runs. Every listed peer must
/// resolve against the peer mapping.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationConfig {
    pub msp_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<String>,
}
