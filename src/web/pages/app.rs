// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::errors::not_found::NotFound;
use super::install::InstallPage;
use super::landing::LandingPage;
use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::StaticSegment;
use leptos_router::components::{Route, Router, Routes};

#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Stylesheet href="/pkg/niftycord-install.css" />
		<Title text="Install NiftyCord" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=StaticSegment("") view=InstallPage />
				<Route path=(StaticSegment("services"), StaticSegment("install-success.html")) view=LandingPage />
			</Routes>
		</Router>
	}
}
