// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::error::InstallError;
use oauth2::url::form_urlencoded;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type QueryParams = HashMap<String, String>;

/// What Discord told us when it sent the user back to the landing page
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CallbackResult {
	Success { guild_id: Option<String> },
	Denied { reason: String },
	Malformed,
}

impl CallbackResult {
	/// Classifies the landing page's query parameters.
	///
	/// An `error` parameter always wins over `code`. Empty values count as missing, and parameters other than
	/// `code`, `error`, and `guild_id` are ignored.
	pub fn from_params(params: &QueryParams) -> Self {
		let param = |key: &str| params.get(key).filter(|value| !value.is_empty());

		if let Some(reason) = param("error") {
			return Self::Denied { reason: reason.clone() };
		}
		if param("code").is_some() {
			return Self::Success {
				guild_id: param("guild_id").cloned(),
			};
		}
		Self::Malformed
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// Gets the error describing this result, if it isn't a success
	pub fn error(&self) -> Option<InstallError> {
		match self {
			Self::Success { .. } => None,
			Self::Denied { reason } => Some(InstallError::ProviderDenied { reason: reason.clone() }),
			Self::Malformed => Some(InstallError::MissingCode),
		}
	}

	/// The outcome name reported to analytics
	pub fn analytics_label(&self) -> &'static str {
		if self.is_success() { "success" } else { "error" }
	}
}

/// Parses a URL query string (with or without its leading `?`). When a key repeats, the first value is kept.
pub fn parse_query(query: &str) -> QueryParams {
	let query = query.strip_prefix('?').unwrap_or(query);
	let mut params = QueryParams::new();
	for (key, value) in form_urlencoded::parse(query.as_bytes()) {
		params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
	}
	params
}
