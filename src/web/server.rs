// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::pages::app::App;
use super::pages::shell::shell;
use super::state::AppState;
use crate::config::ConfigData;
use crate::install::auth_url::build_invite_url;
use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list, render_app_to_stream};
use miette::IntoDiagnostic;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::util::ServiceExt;
use tower_http::services::ServeDir;

pub async fn run_server(config: Arc<ConfigData>) -> miette::Result<()> {
	let web_config = get_configuration(None).into_diagnostic()?;
	let site_addr = &config.web.bind_addr;
	let leptos_options = web_config.leptos_options;
	let routes = generate_route_list(App);

	let app_state = AppState {
		leptos_options,
		config: Arc::clone(&config),
	};

	let app = Router::new()
		.leptos_routes_with_context(
			&app_state,
			routes,
			{
				let app_state = app_state.clone();
				move || provide_context(app_state.clone())
			},
			{
				let leptos_options = app_state.leptos_options.clone();
				move || shell(leptos_options.clone())
			},
		)
		.route("/invite", get(invite_route))
		.fallback(file_and_error_handler)
		.with_state(app_state);

	tracing::info!(address = %site_addr, "Listening for install page requests");
	let listener = TcpListener::bind(&site_addr).await.into_diagnostic()?;
	axum::serve(listener, app.into_make_service()).await.into_diagnostic()?;

	Ok(())
}

/// Route function sending users straight to the manual bot invite
async fn invite_route(State(state): State<AppState>) -> Response {
	match build_invite_url(&state.config.install) {
		Ok(url) => Redirect::to(&url).into_response(),
		Err(error) => {
			tracing::error!(source = ?error, "Failed to build bot invite URL");
			StatusCode::INTERNAL_SERVER_ERROR.into_response()
		}
	}
}

async fn file_and_error_handler(uri: Uri, State(state): State<AppState>, request: Request) -> Response {
	let site_root_dir = state.leptos_options.site_root.clone();
	let response = get_static_file(uri.clone(), &site_root_dir).await;
	let response = match response {
		Ok(response) => response,
		Err(error) => return error.into_response(),
	};

	if response.status() == StatusCode::OK {
		response.into_response()
	} else {
		let handler = render_app_to_stream(App);
		handler(request).await.into_response()
	}
}

async fn get_static_file(uri: Uri, root: &str) -> Result<Response, StatusCode> {
	let Ok(request) = Request::builder().uri(uri.clone()).body(Body::empty()) else {
		return Err(StatusCode::INTERNAL_SERVER_ERROR);
	};

	match ServeDir::new(root).oneshot(request).await {
		Ok(response) => Ok(response.into_response()),
		Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
	}
}
