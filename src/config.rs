// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use kdl::{KdlDocument, KdlValue};
use miette::{Result, miette};
use serde::{Deserialize, Serialize};
use twilight_model::guild::Permissions;

pub const DISCORD_AUTHORIZE_URL: &str = "https://discord.com/api/oauth2/authorize";

const DEFAULT_CLIENT_ID: &str = "834820829941727342";
const DEFAULT_REDIRECT_URI: &str = "https://niftycord.com/services/install-success.html";
const DEFAULT_SCOPE: &str = "bot applications.commands";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Human-readable names for the permissions the bot asks for, in display order
const PERMISSION_LABELS: [(Permissions, &str); 8] = [
	(Permissions::SEND_MESSAGES, "Send Messages"),
	(Permissions::USE_SLASH_COMMANDS, "Use Slash Commands"),
	(Permissions::EMBED_LINKS, "Embed Links"),
	(Permissions::ATTACH_FILES, "Attach Files"),
	(Permissions::READ_MESSAGE_HISTORY, "Read Message History"),
	(Permissions::ADD_REACTIONS, "Add Reactions"),
	(Permissions::MANAGE_MESSAGES, "Manage Messages"),
	(Permissions::ADMINISTRATOR, "Administrator"),
];

#[derive(Clone, Debug)]
pub struct ConfigData {
	pub install: InstallConfig,
	pub web: WebConfig,
}

/// The Discord application settings used to build installation links.
///
/// Loaded once at startup and shared behind an `Arc`; nothing mutates it afterward.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct InstallConfig {
	pub client_id: String,
	pub redirect_uri: String,
	pub scope: String,
	/// Permission bitmask as Discord expects it in the query string. Not validated here.
	pub permissions: String,
	pub authorize_endpoint: String,
}

impl Default for InstallConfig {
	fn default() -> Self {
		Self {
			client_id: String::from(DEFAULT_CLIENT_ID),
			redirect_uri: String::from(DEFAULT_REDIRECT_URI),
			scope: String::from(DEFAULT_SCOPE),
			permissions: Permissions::ADMINISTRATOR.bits().to_string(),
			authorize_endpoint: String::from(DISCORD_AUTHORIZE_URL),
		}
	}
}

impl InstallConfig {
	/// Replaces the permission mask with the bits of the given permission set
	pub fn with_permissions(mut self, permissions: Permissions) -> Self {
		self.permissions = permissions.bits().to_string();
		self
	}

	/// Interprets the permission mask numerically, if it parses
	pub fn requested_permissions(&self) -> Option<Permissions> {
		self.permissions
			.trim()
			.parse::<u64>()
			.ok()
			.map(Permissions::from_bits_truncate)
	}

	/// Gets display names for the requested permissions that users commonly care about
	pub fn requested_permission_labels(&self) -> Vec<&'static str> {
		let Some(permissions) = self.requested_permissions() else {
			return Vec::new();
		};
		PERMISSION_LABELS
			.iter()
			.filter(|(permission, _)| permissions.contains(*permission))
			.map(|(_, label)| *label)
			.collect()
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WebConfig {
	pub bind_addr: String,
}

impl Default for WebConfig {
	fn default() -> Self {
		Self {
			bind_addr: String::from(DEFAULT_BIND_ADDR),
		}
	}
}

#[cfg(feature = "ssr")]
pub async fn parse_config(config_path: &str) -> Result<ConfigData> {
	use miette::IntoDiagnostic;

	let config_file_contents = tokio::fs::read_to_string(config_path).await.into_diagnostic()?;
	parse_config_document(&config_file_contents)
}

/// Parses a KDL configuration document. Any setting left out keeps its default value.
pub fn parse_config_document(contents: &str) -> Result<ConfigData> {
	let document: KdlDocument = contents.parse()?;

	let mut install = InstallConfig::default();
	if let Some(install_document) = document.get("install").and_then(|node| node.children()) {
		if let Some(client_id) = string_arg(install_document, "client_id")? {
			install.client_id = client_id;
		}
		if let Some(redirect_uri) = string_arg(install_document, "redirect_uri")? {
			install.redirect_uri = redirect_uri;
		}
		if let Some(scope) = string_arg(install_document, "scope")? {
			install.scope = scope;
		}
		if let Some(permissions) = string_arg(install_document, "permissions")? {
			install.permissions = permissions;
		}
		if let Some(authorize_endpoint) = string_arg(install_document, "authorize_endpoint")? {
			install.authorize_endpoint = authorize_endpoint;
		}
	}

	let mut web = WebConfig::default();
	if let Some(web_document) = document.get("web").and_then(|node| node.children()) {
		if let Some(bind_addr) = string_arg(web_document, "bind_addr")? {
			web.bind_addr = bind_addr;
		}
	}

	Ok(ConfigData { install, web })
}

/// Gets the first argument of a named node as a string. Integers are accepted since IDs and
/// permission masks are naturally written as numbers.
fn string_arg(document: &KdlDocument, name: &str) -> Result<Option<String>> {
	match document.get_arg(name) {
		None => Ok(None),
		Some(KdlValue::String(value)) => Ok(Some(value.clone())),
		Some(KdlValue::Integer(value)) => Ok(Some(value.to_string())),
		Some(other) => Err(miette!("Config setting `{}` must be a string, not {}", name, other)),
	}
}
