// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::error::InstallError;
use crate::config::InstallConfig;
use oauth2::AuthUrl;
use oauth2::url::Url;

/// Builds the Discord OAuth2 authorization URL that installs the bot and then redirects back to the landing page.
///
/// Query parameters are always emitted in the same order: `client_id`, `redirect_uri`, `response_type`, `scope`,
/// `permissions`, and `guild_id` when a guild was picked ahead of time. An empty guild ID is treated as no guild.
pub fn build_auth_url(config: &InstallConfig, guild_id: Option<&str>) -> Result<String, InstallError> {
	let mut url = authorize_endpoint(config)?;
	{
		let mut query = url.query_pairs_mut();
		query
			.append_pair("client_id", &config.client_id)
			.append_pair("redirect_uri", &config.redirect_uri)
			.append_pair("response_type", "code")
			.append_pair("scope", &config.scope)
			.append_pair("permissions", &config.permissions);
		if let Some(guild_id) = guild_id.filter(|id| !id.is_empty()) {
			query.append_pair("guild_id", guild_id);
		}
	}
	Ok(url.into())
}

/// Builds the plain bot invite link for manual installation. No redirect happens after this one.
pub fn build_invite_url(config: &InstallConfig) -> Result<String, InstallError> {
	let mut url = authorize_endpoint(config)?;
	url.query_pairs_mut()
		.append_pair("client_id", &config.client_id)
		.append_pair("permissions", &config.permissions)
		.append_pair("scope", &config.scope);
	Ok(url.into())
}

fn authorize_endpoint(config: &InstallConfig) -> Result<Url, InstallError> {
	let auth_url = AuthUrl::new(config.authorize_endpoint.clone()).map_err(InstallError::Construction)?;
	Ok(auth_url.url().clone())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn query_keys(url: &str) -> Vec<String> {
		let url = Url::parse(url).unwrap();
		url.query_pairs().map(|(key, _)| key.into_owned()).collect()
	}

	fn query_value(url: &str, key: &str) -> Option<String> {
		let url = Url::parse(url).unwrap();
		url.query_pairs()
			.find(|(pair_key, _)| pair_key == key)
			.map(|(_, value)| value.into_owned())
	}

	#[test]
	fn auth_url_without_guild() {
		let url = build_auth_url(&InstallConfig::default(), None).unwrap();
		assert!(url.starts_with("https://discord.com/api/oauth2/authorize?"));
		assert_eq!(
			query_keys(&url),
			vec!["client_id", "redirect_uri", "response_type", "scope", "permissions"]
		);
		assert_eq!(query_value(&url, "client_id").as_deref(), Some("834820829941727342"));
		assert_eq!(query_value(&url, "response_type").as_deref(), Some("code"));
		assert_eq!(query_value(&url, "scope").as_deref(), Some("bot applications.commands"));
		assert_eq!(query_value(&url, "permissions").as_deref(), Some("8"));
		assert!(url.contains("permissions=8"));
		assert!(!url.contains("guild_id"));
	}

	#[test]
	fn auth_url_with_guild() {
		let url = build_auth_url(&InstallConfig::default(), Some("999")).unwrap();
		assert_eq!(
			query_keys(&url),
			vec!["client_id", "redirect_uri", "response_type", "scope", "permissions", "guild_id"]
		);
		assert_eq!(query_value(&url, "guild_id").as_deref(), Some("999"));
	}

	#[test]
	fn empty_guild_is_omitted() {
		let url = build_auth_url(&InstallConfig::default(), Some("")).unwrap();
		assert!(!url.contains("guild_id"));
	}

	#[test]
	fn redirect_uri_is_encoded_once() {
		let url = build_auth_url(&InstallConfig::default(), None).unwrap();
		assert!(url.contains("redirect_uri=https%3A%2F%2Fniftycord.com%2Fservices%2Finstall-success.html"));
		assert_eq!(
			query_value(&url, "redirect_uri").as_deref(),
			Some("https://niftycord.com/services/install-success.html")
		);
	}

	#[test]
	fn guild_id_is_forwarded_verbatim() {
		let url = build_auth_url(&InstallConfig::default(), Some("not a snowflake&x=1")).unwrap();
		assert_eq!(query_value(&url, "guild_id").as_deref(), Some("not a snowflake&x=1"));
		assert_eq!(query_keys(&url).len(), 6);
	}

	#[test]
	fn invite_url_has_no_redirect() {
		let url = build_invite_url(&InstallConfig::default()).unwrap();
		assert_eq!(query_keys(&url), vec!["client_id", "permissions", "scope"]);
		assert!(!url.contains("redirect_uri"));
		assert!(!url.contains("response_type"));
	}

	#[test]
	fn bad_endpoint_fails_construction() {
		let config = InstallConfig {
			authorize_endpoint: String::from("not a url"),
			..InstallConfig::default()
		};
		assert!(matches!(build_auth_url(&config, None), Err(InstallError::Construction(_))));
		assert!(matches!(build_invite_url(&config), Err(InstallError::Construction(_))));
	}
}
