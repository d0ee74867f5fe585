// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> miette::Result<()> {
	use niftycord_install::config::parse_config;
	use niftycord_install::web::server::run_server;
	use std::sync::Arc;

	tracing_subscriber::fmt::init();

	let config = Arc::new(parse_config("config.kdl").await?);
	tracing::info!(client_id = %config.install.client_id, "Loaded install configuration");

	run_server(config).await
}

#[cfg(not(feature = "ssr"))]
fn main() {}
