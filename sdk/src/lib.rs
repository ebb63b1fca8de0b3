// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Boundary contracts for the external ledger client and the scenario
//! driver that sequences operations against them.

pub mod provider;
pub mod scenario;
