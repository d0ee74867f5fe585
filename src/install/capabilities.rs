// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::error::CapabilityError;
use super::outcome::QueryParams;
use serde::Serialize;

/// Page navigation for the installation flow. The browser version is `crate::web::browser::LocationNavigator`.
pub trait Navigator {
	/// Sends the user to another page. On success the current page is about to go away.
	fn navigate_to(&self, url: &str) -> Result<(), CapabilityError>;
}

/// Key-value storage that lives as long as the browser tab
pub trait EphemeralStore {
	fn put(&self, key: &str, value: &str) -> Result<(), CapabilityError>;
	fn get(&self, key: &str) -> Result<Option<String>, CapabilityError>;
	fn remove(&self, key: &str) -> Result<(), CapabilityError>;
}

pub trait QuerySource {
	fn current_params(&self) -> QueryParams;
}

pub trait Presenter {
	fn render_success(&self, guild_id: Option<&str>);
	fn render_error(&self, message: &str);
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AnalyticsEvent {
	pub action: &'static str,
	pub category: &'static str,
	pub label: &'static str,
	pub value: u8,
}

impl AnalyticsEvent {
	pub fn installation(success: bool) -> Self {
		Self {
			action: "discord_install",
			category: "bot_installation",
			label: if success { "success" } else { "error" },
			value: u8::from(success),
		}
	}
}

pub trait AnalyticsSink {
	fn emit(&self, event: &AnalyticsEvent) -> Result<(), CapabilityError>;
}

/// Analytics sink for pages with no analytics provider
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
	fn emit(&self, _event: &AnalyticsEvent) -> Result<(), CapabilityError> {
		Ok(())
	}
}
