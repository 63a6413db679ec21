// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Instant answers for the popup query box.
//!
//! [`registry::classify`] decides whether a query is a special request
//! (arithmetic, currency, weather, translation, definition, or an AI
//! question) and [`fetch::AnswerFetcher`] resolves the claim through
//! pluggable providers into a displayable [`fetch::InstantAnswer`].

pub mod currency;
pub mod fetch;
pub mod lang;
pub mod math;
pub mod prefix;
pub mod registry;
pub mod weather;

pub use fetch::*;
pub use registry::*;
