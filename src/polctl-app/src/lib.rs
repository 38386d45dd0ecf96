// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod config;
pub mod logging;
pub mod util;

pub use config::{ConfigError, ConfigFile};
pub use logging::init_logging;
pub use util::join_url;
