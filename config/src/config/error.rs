// Copyright (c) The Quill Core Contributors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Inconsistent topology: {0}")]
    Inconsistency(String),
    #[error("Error accessing {0}: {1}")]
    IO(String, #[source] std::io::Error),
    #[error("Error (de)serializing {0}: {1}")]
    Yaml(String, #[source] serde_yaml::Error),
    #[error("Config is missing expected value: {0}")]
    Missing(&'static str),
    #[error("Invalid matcher pattern {0}: {1}")]
    Pattern(String, #[source] regex::Error),
}

pub fn invariant(cond: bool, msg: String) -> Result<(), Error> {
    if !cond {
        Err(Error::Inconsistency(msg))
    } else {
        Ok(())
    }
}
