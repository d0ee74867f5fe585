// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::capabilities::EphemeralStore;
use super::error::CapabilityError;
use chrono::{DateTime, TimeDelta, Utc};

pub const INSTALL_STARTED_KEY: &str = "niftycord_install_started";
pub const INSTALL_TIMESTAMP_KEY: &str = "niftycord_install_timestamp";

/// Records that the user was sent off to Discord to install the bot
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InstallationMarker {
	pub started: bool,
	pub started_at: DateTime<Utc>,
}

impl InstallationMarker {
	pub fn new(started_at: DateTime<Utc>) -> Self {
		Self {
			started: true,
			started_at,
		}
	}

	pub fn started_at_epoch_millis(&self) -> i64 {
		self.started_at.timestamp_millis()
	}

	pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
		now - self.started_at
	}

	pub fn write(&self, store: &impl EphemeralStore) -> Result<(), CapabilityError> {
		store.put(INSTALL_STARTED_KEY, if self.started { "true" } else { "false" })?;
		store.put(INSTALL_TIMESTAMP_KEY, &self.started_at_epoch_millis().to_string())
	}

	/// Reads a marker back. Missing or unreadable entries mean there's no marker.
	pub fn read(store: &impl EphemeralStore) -> Result<Option<Self>, CapabilityError> {
		let started = store.get(INSTALL_STARTED_KEY)?;
		let timestamp = store.get(INSTALL_TIMESTAMP_KEY)?;
		let (Some(started), Some(timestamp)) = (started, timestamp) else {
			return Ok(None);
		};
		if started != "true" {
			return Ok(None);
		}
		let started_at = timestamp
			.parse::<i64>()
			.ok()
			.and_then(DateTime::from_timestamp_millis);
		Ok(started_at.map(Self::new))
	}

	pub fn clear(store: &impl EphemeralStore) -> Result<(), CapabilityError> {
		store.remove(INSTALL_STARTED_KEY)?;
		store.remove(INSTALL_TIMESTAMP_KEY)
	}
}
