// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::auth_url::{build_auth_url, build_invite_url};
use super::capabilities::{
	AnalyticsEvent, AnalyticsSink, EphemeralStore, Navigator, NoopAnalytics, Presenter, QuerySource,
};
use super::error::{InstallError, START_FAILED_MESSAGE};
use super::marker::InstallationMarker;
use super::outcome::{CallbackResult, QueryParams};
use crate::config::InstallConfig;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FlowState {
	Idle,
	Redirecting,
	/// Terminal; a new page load gets a new controller
	Returned(CallbackResult),
}

/// Drives one bot installation attempt for a single page load.
///
/// Sending the user to Discord goes through [`start`](Self::start), and reading the result when Discord sends
/// them back goes through [`complete`](Self::complete). Everything the controller does to the page happens
/// through the capabilities it was constructed with.
pub struct InstallFlowController<N, S, P, A = NoopAnalytics> {
	config: Arc<InstallConfig>,
	navigator: N,
	store: S,
	presenter: P,
	analytics: A,
	state: FlowState,
}

impl<N, S, P> InstallFlowController<N, S, P>
where
	N: Navigator,
	S: EphemeralStore,
	P: Presenter,
{
	pub fn new(config: Arc<InstallConfig>, navigator: N, store: S, presenter: P) -> Self {
		Self {
			config,
			navigator,
			store,
			presenter,
			analytics: NoopAnalytics,
			state: FlowState::Idle,
		}
	}
}

impl<N, S, P, A> InstallFlowController<N, S, P, A>
where
	N: Navigator,
	S: EphemeralStore,
	P: Presenter,
	A: AnalyticsSink,
{
	pub fn with_analytics<B: AnalyticsSink>(self, analytics: B) -> InstallFlowController<N, S, P, B> {
		InstallFlowController {
			config: self.config,
			navigator: self.navigator,
			store: self.store,
			presenter: self.presenter,
			analytics,
			state: self.state,
		}
	}

	pub fn config(&self) -> &InstallConfig {
		&self.config
	}

	pub fn state(&self) -> &FlowState {
		&self.state
	}

	pub fn auth_url(&self, guild_id: Option<&str>) -> Result<String, InstallError> {
		build_auth_url(&self.config, guild_id)
	}

	pub fn invite_url(&self) -> Result<String, InstallError> {
		build_invite_url(&self.config)
	}

	/// Sends the user to Discord to install the bot, optionally preselecting a guild.
	///
	/// Failures are shown to the user through the presenter rather than returned.
	pub fn start(&mut self, guild_id: Option<&str>) {
		if let FlowState::Returned(_) = self.state {
			tracing::warn!("Ignoring installation start on a finished flow");
			return;
		}

		let auth_url = match self.auth_url(guild_id) {
			Ok(url) => url,
			Err(error) => {
				tracing::error!(source = ?error, "Failed to build Discord authorization URL");
				self.fail_start();
				return;
			}
		};

		// Only abandoned-flow detection reads the marker
		if let Err(error) = InstallationMarker::new(Utc::now()).write(&self.store) {
			tracing::warn!(source = ?error, "Failed to store installation marker");
		}

		self.state = FlowState::Redirecting;
		if let Err(error) = self.navigator.navigate_to(&auth_url) {
			tracing::error!(source = ?error, "Failed to navigate to Discord authorization page");
			self.state = FlowState::Idle;
			self.fail_start();
		}
	}

	fn fail_start(&self) {
		self.presenter.render_error(START_FAILED_MESSAGE);
		self.emit_analytics(false);
	}

	fn emit_analytics(&self, success: bool) {
		let event = AnalyticsEvent::installation(success);
		if let Err(error) = self.analytics.emit(&event) {
			tracing::debug!(source = ?error, "Analytics event was not delivered");
		}
	}

	/// Classifies the parameters Discord returned to the landing page
	pub fn handle_return(&self, params: &QueryParams) -> CallbackResult {
		CallbackResult::from_params(params)
	}

	/// Shows the result to the user and reports it to analytics
	pub fn on_result(&self, result: &CallbackResult) {
		match result {
			CallbackResult::Success { guild_id } => self.presenter.render_success(guild_id.as_deref()),
			CallbackResult::Denied { .. } | CallbackResult::Malformed => {
				let message = result
					.error()
					.map(|error| error.to_string())
					.unwrap_or_default();
				self.presenter.render_error(&message);
			}
		}

		self.emit_analytics(result.is_success());
	}

	/// Handles the landing page by classifying the returned parameters and showing the result.
	/// Calling this again after the flow has finished returns the same result without showing it twice.
	pub fn complete(&mut self, query: &impl QuerySource) -> CallbackResult {
		if let FlowState::Returned(result) = &self.state {
			return result.clone();
		}

		let result = self.handle_return(&query.current_params());

		match InstallationMarker::read(&self.store) {
			Ok(Some(marker)) => {
				tracing::debug!(
					elapsed_ms = marker.age(Utc::now()).num_milliseconds(),
					"Returned from Discord installation"
				);
				if let Err(error) = InstallationMarker::clear(&self.store) {
					tracing::warn!(source = ?error, "Failed to clear installation marker");
				}
			}
			Ok(None) => tracing::debug!("Returned from Discord without a stored installation marker"),
			Err(error) => tracing::warn!(source = ?error, "Failed to read installation marker"),
		}

		self.on_result(&result);
		self.state = FlowState::Returned(result.clone());
		result
	}

	/// Finds an installation that was started but never came back, if it's older than `max_age`.
	/// A found marker is cleared so the same abandoned flow is only reported once.
	pub fn abandoned_flow(&self, max_age: TimeDelta) -> Option<InstallationMarker> {
		self.abandoned_flow_at(max_age, Utc::now())
	}

	pub fn abandoned_flow_at(&self, max_age: TimeDelta, now: DateTime<Utc>) -> Option<InstallationMarker> {
		let marker = match InstallationMarker::read(&self.store) {
			Ok(marker) => marker?,
			Err(error) => {
				tracing::warn!(source = ?error, "Failed to read installation marker");
				return None;
			}
		};
		if marker.age(now) <= max_age {
			return None;
		}
		if let Err(error) = InstallationMarker::clear(&self.store) {
			tracing::warn!(source = ?error, "Failed to clear abandoned installation marker");
		}
		Some(marker)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::install::capabilities::fakes::{
		FixedQuery, MemoryStore, RecordingAnalytics, RecordingNavigator, RecordingPresenter, Rendered,
	};
	use crate::install::marker::{INSTALL_STARTED_KEY, INSTALL_TIMESTAMP_KEY};

	type TestController = InstallFlowController<RecordingNavigator, MemoryStore, RecordingPresenter, RecordingAnalytics>;

	fn controller_with(config: InstallConfig, navigator: RecordingNavigator, analytics: RecordingAnalytics) -> TestController {
		InstallFlowController::new(
			Arc::new(config),
			navigator,
			MemoryStore::default(),
			RecordingPresenter::default(),
		)
		.with_analytics(analytics)
	}

	fn controller() -> TestController {
		controller_with(
			InstallConfig::default(),
			RecordingNavigator::default(),
			RecordingAnalytics::default(),
		)
	}

	fn query(pairs: &[(&str, &str)]) -> FixedQuery {
		FixedQuery(
			pairs
				.iter()
				.map(|(key, value)| (key.to_string(), value.to_string()))
				.collect(),
		)
	}

	#[test]
	fn new_controller_is_idle() {
		assert_eq!(controller().state(), &FlowState::Idle);
	}

	#[test]
	fn start_writes_marker_and_navigates() {
		let mut controller = controller();
		let before = Utc::now().timestamp_millis();
		controller.start(Some("999"));

		let visited = controller.navigator.visited.borrow();
		assert_eq!(visited.len(), 1);
		assert_eq!(visited[0], controller.auth_url(Some("999")).unwrap());
		assert!(visited[0].contains("guild_id=999"));

		let values = controller.store.values.borrow();
		assert_eq!(values.get(INSTALL_STARTED_KEY).map(String::as_str), Some("true"));
		let timestamp: i64 = values.get(INSTALL_TIMESTAMP_KEY).unwrap().parse().unwrap();
		assert!(timestamp >= before);

		assert_eq!(controller.state(), &FlowState::Redirecting);
		assert!(controller.presenter.rendered.borrow().is_empty());
		assert!(controller.analytics.events.borrow().is_empty());
	}

	#[test]
	fn failed_start_survives_analytics_failure() {
		let config = InstallConfig {
			authorize_endpoint: String::from("nowhere"),
			..InstallConfig::default()
		};
		let analytics = RecordingAnalytics {
			fail: true,
			..RecordingAnalytics::default()
		};
		let mut controller = controller_with(config, RecordingNavigator::default(), analytics);
		controller.start(None);

		assert_eq!(
			*controller.presenter.rendered.borrow(),
			vec![Rendered::Error(String::from(START_FAILED_MESSAGE))]
		);
		assert_eq!(controller.analytics.events.borrow().len(), 1);
	}

	#[test]
	fn start_with_bad_endpoint_renders_error() {
		let config = InstallConfig {
			authorize_endpoint: String::from("nowhere"),
			..InstallConfig::default()
		};
		let mut controller = controller_with(config, RecordingNavigator::default(), RecordingAnalytics::default());
		controller.start(None);

		assert!(controller.navigator.visited.borrow().is_empty());
		assert!(controller.store.values.borrow().is_empty());
		assert_eq!(
			*controller.presenter.rendered.borrow(),
			vec![Rendered::Error(String::from(START_FAILED_MESSAGE))]
		);
		assert_eq!(
			*controller.analytics.events.borrow(),
			vec![AnalyticsEvent::installation(false)]
		);
		assert_eq!(controller.state(), &FlowState::Idle);
	}

	#[test]
	fn start_navigation_failure_renders_error() {
		let navigator = RecordingNavigator {
			fail: true,
			..RecordingNavigator::default()
		};
		let mut controller = controller_with(InstallConfig::default(), navigator, RecordingAnalytics::default());
		controller.start(None);

		assert_eq!(
			*controller.presenter.rendered.borrow(),
			vec![Rendered::Error(String::from(START_FAILED_MESSAGE))]
		);
		let events = controller.analytics.events.borrow();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].label, "error");
		assert_eq!(events[0].value, 0);
		assert_eq!(controller.state(), &FlowState::Idle);
	}

	#[test]
	fn start_survives_storage_failure() {
		let mut controller = InstallFlowController::new(
			Arc::new(InstallConfig::default()),
			RecordingNavigator::default(),
			MemoryStore {
				fail_writes: true,
				..MemoryStore::default()
			},
			RecordingPresenter::default(),
		);
		controller.start(None);

		assert_eq!(controller.navigator.visited.borrow().len(), 1);
		assert_eq!(controller.state(), &FlowState::Redirecting);
	}

	#[test]
	fn complete_success_renders_and_tracks() {
		let mut controller = controller();
		let result = controller.complete(&query(&[("code", "abc123"), ("guild_id", "999")]));

		assert_eq!(
			result,
			CallbackResult::Success {
				guild_id: Some(String::from("999"))
			}
		);
		assert_eq!(
			*controller.presenter.rendered.borrow(),
			vec![Rendered::Success(Some(String::from("999")))]
		);
		assert_eq!(
			*controller.analytics.events.borrow(),
			vec![AnalyticsEvent {
				action: "discord_install",
				category: "bot_installation",
				label: "success",
				value: 1,
			}]
		);
		assert_eq!(controller.state(), &FlowState::Returned(result));
	}

	#[test]
	fn complete_denied_renders_reason() {
		let mut controller = controller();
		controller.complete(&query(&[("error", "access_denied"), ("code", "abc123")]));

		assert_eq!(
			*controller.presenter.rendered.borrow(),
			vec![Rendered::Error(String::from("Discord installation failed: access_denied"))]
		);
		let events = controller.analytics.events.borrow();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].label, "error");
		assert_eq!(events[0].value, 0);
	}

	#[test]
	fn complete_malformed_renders_missing_code() {
		let mut controller = controller();
		let result = controller.complete(&query(&[]));

		assert_eq!(result, CallbackResult::Malformed);
		assert_eq!(
			*controller.presenter.rendered.borrow(),
			vec![Rendered::Error(String::from("No authorization code received from Discord."))]
		);
	}

	#[test]
	fn complete_clears_marker() {
		let mut controller = controller();
		InstallationMarker::new(Utc::now()).write(&controller.store).unwrap();
		controller.complete(&query(&[("code", "abc123")]));
		assert!(controller.store.values.borrow().is_empty());
	}

	#[test]
	fn complete_is_terminal() {
		let mut controller = controller();
		let first = controller.complete(&query(&[("code", "abc123")]));
		let second = controller.complete(&query(&[("error", "access_denied")]));

		assert_eq!(first, second);
		assert_eq!(controller.presenter.rendered.borrow().len(), 1);
		assert_eq!(controller.analytics.events.borrow().len(), 1);

		controller.start(None);
		assert!(controller.navigator.visited.borrow().is_empty());
	}

	#[test]
	fn analytics_failure_does_not_affect_presentation() {
		let analytics = RecordingAnalytics {
			fail: true,
			..RecordingAnalytics::default()
		};
		let mut controller = controller_with(InstallConfig::default(), RecordingNavigator::default(), analytics);
		controller.complete(&query(&[("code", "abc123")]));

		assert_eq!(
			*controller.presenter.rendered.borrow(),
			vec![Rendered::Success(None)]
		);
		assert_eq!(controller.analytics.events.borrow().len(), 1);
	}

	#[test]
	fn handle_return_does_not_render() {
		let controller = controller();
		let params = query(&[("code", "abc123")]).0;
		let result = controller.handle_return(&params);

		assert!(result.is_success());
		assert!(controller.presenter.rendered.borrow().is_empty());
		assert_eq!(controller.state(), &FlowState::Idle);
	}

	#[test]
	fn stale_marker_is_abandoned_once() {
		let controller = controller();
		let started_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
		InstallationMarker::new(started_at).write(&controller.store).unwrap();

		let now = started_at + TimeDelta::hours(1);
		let abandoned = controller.abandoned_flow_at(TimeDelta::minutes(30), now);
		assert_eq!(abandoned, Some(InstallationMarker::new(started_at)));
		assert_eq!(controller.abandoned_flow_at(TimeDelta::minutes(30), now), None);
	}

	#[test]
	fn recent_marker_is_not_abandoned() {
		let controller = controller();
		let started_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
		InstallationMarker::new(started_at).write(&controller.store).unwrap();

		let now = started_at + TimeDelta::minutes(5);
		assert_eq!(controller.abandoned_flow_at(TimeDelta::minutes(30), now), None);
		assert!(!controller.store.values.borrow().is_empty());
	}

	#[test]
	fn invite_url_uses_shared_config() {
		let controller = controller();
		let invite_url = controller.invite_url().unwrap();
		assert!(invite_url.contains("client_id=834820829941727342"));
		assert!(!invite_url.contains("redirect_uri"));
	}
}
