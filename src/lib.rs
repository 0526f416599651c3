// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logtag writes human-readable log lines carrying hierarchical key-value context.
//!
//! # Overview
//!
//! Every call writes exactly one line:
//!
//! ```text
//! TIMESTAMP LEVEL NAME "MESSAGE" [TAG]*
//! ```
//!
//! where `TIMESTAMP` is `YYYY-MM-DD HH:MM:SS.mmm` in UTC and each `TAG` is
//! `[prefix.]key="value"`. Tags come from three scopes:
//!
//! * system tags, rendered bare;
//! * app tags, rendered under the logger's prefix;
//! * per-call tags, rendered like app tags.
//!
//! Loggers are derived from each other with [`Logger::derive`]. A child logger shares its
//! parent's [`Sink`] and starts from a copy of its parent's tags; tags already set on the
//! parent always win over the child's configuration.
//!
//! # Examples
//!
//! ```
//! use logtag::Config;
//! use logtag::Tags;
//!
//! let root = Config::new()
//!     .name("billing")
//!     .prefix("billing")
//!     .system_tag("service", "payments")
//!     .build();
//!
//! let worker = root.derive(Config::new().app_tag("worker", "3"));
//! worker
//!     .info("invoice sent", Some(&Tags::from([("invoice", "INV-7")])))
//!     .unwrap();
//! // 2024-08-11 14:44:57.172 INFO billing "invoice sent" service="payments" billing.worker="3" billing.invoice="INV-7"
//! ```
//!
//! With the `bridge-log` feature, a logger can also serve the [`log`] facade:
//!
//! ```
//! # #[cfg(feature = "bridge-log")]
//! # {
//! logtag::Config::new().name("app").build().apply();
//!
//! log::info!(request_id = "1234"; "This is an info message.");
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub extern crate jiff;

pub mod layout;
pub mod sink;
pub mod tags;
pub mod trap;

mod bridge;
mod error;
mod level;
mod logger;
mod quote;
mod record;

pub use self::error::Error;
pub use self::layout::Layout;
pub use self::level::Level;
pub use self::logger::Config;
pub use self::logger::Logger;
pub use self::record::Record;
pub use self::sink::Sink;
pub use self::tags::Tags;
pub use self::trap::Trap;
