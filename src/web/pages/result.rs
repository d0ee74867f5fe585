// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::utils::InstallView;
use crate::web::browser::close_window;
use leptos::prelude::*;

const QUICK_START_COMMANDS: [(&str, &str); 6] = [
	("/admin setup", "to configure your server"),
	("/admin mint", "to create NFT collections"),
	("/niftywallet", "lets your members create wallets"),
	("/marketplace", "to browse and trade NFTs"),
	("/niftytrade", "to start trading"),
	("/niftyhelp", "to get help"),
];

/// Builds the quick start list shown after installing and on the install page
#[component]
pub fn QuickStartCommands() -> impl IntoView {
	view! {
		<ul class="next-steps">
			{
				QUICK_START_COMMANDS
					.iter()
					.map(|(command, description)| view! {
						<li>
							<code>{*command}</code>
							" "
							{*description}
						</li>
					})
					.collect::<Vec<_>>()
			}
		</ul>
	}
}

/// Renders the current state of an installation flow
#[component]
pub fn InstallStatus(status: RwSignal<InstallView>) -> impl IntoView {
	move || match status.get() {
		InstallView::Pending => ().into_any(),
		InstallView::Installed { guild_id } => view! { <InstallSuccess guild_id /> }.into_any(),
		InstallView::Failed { message } => view! { <InstallFailure message /> }.into_any(),
	}
}

#[component]
pub fn InstallSuccess(guild_id: Option<String>) -> impl IntoView {
	let server_link = guild_id.filter(|id| !id.is_empty()).map(|id| format!("https://discord.com/channels/{}", id));
	let discord_link = server_link
		.clone()
		.unwrap_or_else(|| String::from("https://discord.com/channels/@me"));

	view! {
		<div id="install-success" class="success-message">
			<div class="success-icon">"✅"</div>
			<h2>"NiftyCord Bot Installed Successfully!"</h2>
			<p>"Your Discord server is now ready for NFT trading. Here's what you can do next:"</p>
			<QuickStartCommands />
			<div class="action-buttons">
				<button class="btn btn-primary" on:click=move |_| close_window()>"Close Window"</button>
				<a class="btn btn-secondary" href={discord_link} target="_blank" rel="noopener">
					{if server_link.is_some() { "Open Your Server" } else { "Open Discord" }}
				</a>
			</div>
		</div>
	}
}

#[component]
pub fn InstallFailure(message: String) -> impl IntoView {
	view! {
		<div id="install-error" class="error-message">
			<div class="error-icon">"❌"</div>
			<h2>"Installation Failed"</h2>
			<p>{message}</p>
			<div class="action-buttons">
				<a class="btn btn-primary" href="/">"Try Again"</a>
				<button class="btn btn-secondary" on:click=move |_| close_window()>"Close"</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn quick_start_lists_every_bot_command() {
		let commands: Vec<&str> = QUICK_START_COMMANDS.iter().map(|(command, _)| *command).collect();
		assert_eq!(
			commands,
			vec!["/admin setup", "/admin mint", "/niftywallet", "/marketplace", "/niftytrade", "/niftyhelp"]
		);
	}
}
