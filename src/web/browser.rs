// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::install::capabilities::{AnalyticsEvent, AnalyticsSink, EphemeralStore, Navigator, QuerySource};
use crate::install::error::CapabilityError;
use crate::install::outcome::{QueryParams, parse_query};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Storage, Window};

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(catch, js_name = gtag)]
	fn gtag_event(command: &str, action: &str, params: &JsValue) -> Result<(), JsValue>;
}

/// Gets the browser window. Only works in the browser, so callers run from event handlers and effects.
fn browser_window() -> Result<Window, CapabilityError> {
	web_sys::window().ok_or(CapabilityError::Unavailable("window"))
}

fn rejected(error: JsValue) -> CapabilityError {
	CapabilityError::Rejected(format!("{:?}", error))
}

/// Navigates by setting `window.location.href`
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
	fn navigate_to(&self, url: &str) -> Result<(), CapabilityError> {
		browser_window()?.location().set_href(url).map_err(rejected)
	}
}

/// The tab's `sessionStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionStorage;

impl SessionStorage {
	fn storage(&self) -> Result<Storage, CapabilityError> {
		browser_window()?
			.session_storage()
			.map_err(rejected)?
			.ok_or(CapabilityError::Unavailable("sessionStorage"))
	}
}

impl EphemeralStore for SessionStorage {
	fn put(&self, key: &str, value: &str) -> Result<(), CapabilityError> {
		self.storage()?.set_item(key, value).map_err(rejected)
	}

	fn get(&self, key: &str) -> Result<Option<String>, CapabilityError> {
		self.storage()?.get_item(key).map_err(rejected)
	}

	fn remove(&self, key: &str) -> Result<(), CapabilityError> {
		self.storage()?.remove_item(key).map_err(rejected)
	}
}

/// Reads parameters from `window.location.search`
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationQuery;

impl QuerySource for LocationQuery {
	fn current_params(&self) -> QueryParams {
		let search = browser_window().and_then(|window| window.location().search().map_err(rejected));
		match search {
			Ok(search) => parse_query(&search),
			Err(error) => {
				tracing::warn!(source = ?error, "Couldn't read the page's query string");
				QueryParams::new()
			}
		}
	}
}

/// Sends events to Google Analytics through the page's global `gtag` function.
/// Pages that don't load gtag get an error back from `emit`, which the flow ignores.
#[derive(Clone, Copy, Debug, Default)]
pub struct GtagAnalytics;

impl AnalyticsSink for GtagAnalytics {
	fn emit(&self, event: &AnalyticsEvent) -> Result<(), CapabilityError> {
		let params = Object::new();
		Reflect::set(&params, &"event_category".into(), &event.category.into()).map_err(rejected)?;
		Reflect::set(&params, &"event_label".into(), &event.label.into()).map_err(rejected)?;
		Reflect::set(&params, &"value".into(), &f64::from(event.value).into()).map_err(rejected)?;
		gtag_event("event", event.action, &params).map_err(rejected)
	}
}

pub fn close_window() {
	let closed = browser_window().and_then(|window| window.close().map_err(rejected));
	if let Err(error) = closed {
		tracing::warn!(source = ?error, "Couldn't close the window");
	}
}
