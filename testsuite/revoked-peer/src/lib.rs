// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0


#[cfg(test)]
mod revoked_peer;

#[cfg(test)]
mod test_utils;
