// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Diagnostic;
use oauth2::url::ParseError;
use thiserror::Error;

/// Shown when the installation could not be started from this page
pub const START_FAILED_MESSAGE: &str = "Failed to start Discord installation. Please try again.";

/// Everything that ends an installation flow early. The `Display` output is what users see.
#[derive(Debug, Diagnostic, Error)]
pub enum InstallError {
	#[error("Failed to build the Discord authorization URL")]
	#[diagnostic(
		code(install::construction),
		help("check the `authorize_endpoint` setting in the install configuration")
	)]
	Construction(#[source] ParseError),
	#[error("Discord installation failed: {reason}")]
	#[diagnostic(code(install::provider_denied))]
	ProviderDenied { reason: String },
	#[error("No authorization code received from Discord.")]
	#[diagnostic(code(install::missing_code))]
	MissingCode,
}

/// Failures of the browser capabilities the installation flow depends on
#[derive(Debug, Error)]
pub enum CapabilityError {
	#[error("{0} is unavailable")]
	Unavailable(&'static str),
	#[error("browser rejected the operation: {0}")]
	Rejected(String),
}
