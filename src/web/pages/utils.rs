// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::InstallConfig;
use crate::install::capabilities::Presenter;
use leptos::prelude::*;

/// Hands the server's installation settings to the page
#[server]
pub async fn get_install_config() -> Result<InstallConfig, ServerFnError> {
	use crate::web::state::AppState;

	let state = expect_context::<AppState>();
	Ok(state.config.install.clone())
}

/// What an installation page currently shows for the flow
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InstallView {
	Pending,
	Installed { guild_id: Option<String> },
	Failed { message: String },
}

/// Presents installation results by updating a signal the page renders from
#[derive(Clone, Copy, Debug)]
pub struct SignalPresenter {
	view: RwSignal<InstallView>,
}

impl SignalPresenter {
	pub fn new(view: RwSignal<InstallView>) -> Self {
		Self { view }
	}
}

impl Presenter for SignalPresenter {
	fn render_success(&self, guild_id: Option<&str>) {
		self.view.set(InstallView::Installed {
			guild_id: guild_id.map(String::from),
		});
	}

	fn render_error(&self, message: &str) {
		self.view.set(InstallView::Failed {
			message: message.to_string(),
		});
	}
}
