// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod history;
pub mod hotpage;
pub mod keys;
pub mod model;
pub mod nav;
pub mod results;

pub use history::*;
pub use keys::*;
pub use model::*;
pub use nav::*;
pub use results::*;
