// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod filter;
pub mod model;

pub use controller::*;
pub use filter::*;
pub use model::*;
