// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod app;
mod errors;
mod install;
mod landing;
mod result;
#[cfg(feature = "ssr")]
pub mod shell;
mod utils;
