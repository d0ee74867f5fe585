// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::result::InstallStatus;
use super::utils::{InstallView, SignalPresenter, get_install_config};
use crate::config::InstallConfig;
use crate::install::controller::InstallFlowController;
use crate::web::browser::{GtagAnalytics, LocationNavigator, LocationQuery, SessionStorage};
use leptos::prelude::*;
use std::sync::Arc;

/// The page Discord redirects back to once the user has approved or denied the installation
#[component]
pub fn LandingPage() -> impl IntoView {
	let config = Resource::new(|| (), |_| get_install_config());
	let status = RwSignal::new(InstallView::Pending);

	Effect::new(move |_| {
		let Some(config) = config.get() else {
			return;
		};
		// Classification doesn't depend on the settings
		let config = config.unwrap_or_else(|error| {
			tracing::warn!(source = ?error, "Failed to load install config for the landing page");
			InstallConfig::default()
		});

		let mut controller = InstallFlowController::new(
			Arc::new(config),
			LocationNavigator,
			SessionStorage,
			SignalPresenter::new(status),
		)
		.with_analytics(GtagAnalytics);
		let result = controller.complete(&LocationQuery);
		tracing::info!(outcome = result.analytics_label(), "Bot installation finished");
	});

	view! {
		<main id="install_landing_page">
			<Show when=move || status.get() == InstallView::Pending>
				<p class="install_pending">"Finishing up your installation..."</p>
			</Show>
			<InstallStatus status />
		</main>
	}
}
