// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Annolink: replay an annotation session and export it

use std::process::ExitCode;

fn main() -> ExitCode {
    match annolink::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
