// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::result::{InstallStatus, QuickStartCommands};
use super::utils::{InstallView, SignalPresenter, get_install_config};
use crate::config::InstallConfig;
use crate::install::auth_url::build_invite_url;
use crate::install::controller::InstallFlowController;
use crate::web::browser::{LocationNavigator, SessionStorage};
use chrono::TimeDelta;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use std::sync::Arc;

/// How long an installation can be away at Discord before we consider it abandoned
const ABANDONED_FLOW_MINUTES: i64 = 30;

const BOT_FEATURES: [&str; 7] = [
	"NFT Trading Commands",
	"Wallet Management",
	"Marketplace Integration",
	"Asset Minting",
	"Cross-Server Trading",
	"Rich Embeds",
	"Interactive Buttons",
];

const INSTALLATION_STEPS: [&str; 5] = [
	"Click \"Install to Discord\"",
	"Select your Discord server",
	"Review and grant permissions",
	"Complete installation",
	"Start using NiftyCord commands",
];

#[component]
pub fn InstallPage() -> impl IntoView {
	let config = Resource::new(|| (), |_| get_install_config());

	view! {
		<main id="install_page">
			<h1>"Add NiftyCord to Discord"</h1>
			<Transition fallback=|| view! { <p class="install_loading">"Loading..."</p> }>
				{
					move || config.get().map(|config| match config {
						Ok(config) => view! { <InstallPanel config /> }.into_any(),
						Err(_) => view! {
							<p class="install_unavailable">"Installation is unavailable right now. Please try again later."</p>
						}.into_any(),
					})
				}
			</Transition>
			<section class="install_features">
				<h2>"Features"</h2>
				<ul>
					{BOT_FEATURES.iter().map(|feature| view! { <li>{*feature}</li> }).collect::<Vec<_>>()}
				</ul>
			</section>
			<section class="install_steps">
				<h2>"How to Install"</h2>
				<ol>
					{INSTALLATION_STEPS.iter().map(|step| view! { <li>{*step}</li> }).collect::<Vec<_>>()}
				</ol>
			</section>
			<section class="install_quick_start">
				<h2>"After Installing"</h2>
				<QuickStartCommands />
			</section>
		</main>
	}
}

#[component]
fn InstallPanel(config: InstallConfig) -> impl IntoView {
	let config = Arc::new(config);
	let status = RwSignal::new(InstallView::Pending);
	let abandoned = RwSignal::new(false);
	let query = use_query_map();

	let invite_url = build_invite_url(&config).ok();
	let permission_labels = config.requested_permission_labels();

	Effect::new({
		let config = Arc::clone(&config);
		move |_| {
			let controller = InstallFlowController::new(
				Arc::clone(&config),
				LocationNavigator,
				SessionStorage,
				SignalPresenter::new(status),
			);
			if let Some(marker) = controller.abandoned_flow(TimeDelta::minutes(ABANDONED_FLOW_MINUTES)) {
				tracing::info!(started_at = %marker.started_at, "Found an unfinished bot installation");
				abandoned.set(true);
			}
		}
	});

	let start_install = move |_| {
		let guild_id = query.with_untracked(|query| query.get("guild_id"));
		let mut controller = InstallFlowController::new(
			Arc::clone(&config),
			LocationNavigator,
			SessionStorage,
			SignalPresenter::new(status),
		);
		controller.start(guild_id.as_deref());
	};

	view! {
		<Show when=move || abandoned.get()>
			<p class="install_abandoned">
				"It looks like your last installation wasn't finished. You can start it again below."
			</p>
		</Show>
		<button class="btn btn-primary install_button" on:click=start_install>
			"Install to Discord"
		</button>
		{
			invite_url.map(|url| view! {
				<p class="install_manual">
					"Prefer to add the bot yourself? "
					<a href={url}>"Use the invite link"</a>
				</p>
			})
		}
		<section class="install_permissions">
			<h2>"Requested Permissions"</h2>
			<ul>
				{permission_labels.into_iter().map(|label| view! { <li>{label}</li> }).collect::<Vec<_>>()}
			</ul>
		</section>
		<InstallStatus status />
	}
}
