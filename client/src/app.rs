//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::access_gate::RequireAuth;
use crate::components::navbar::Navbar;
use crate::config::{ANON_KEY_META, BackendConfig, STORAGE_BUCKET_META, URL_META};
use crate::net::Backend;
use crate::pages::{
    etape_detail::EtapeDetailPage, etape_form::EtapeFormPage, home::HomePage, login::LoginPage,
    not_found::NotFoundPage, signup::SignupPage, tag_form::TagFormPage, tag_list::TagListPage,
    voyage_detail::VoyageDetailPage, voyage_form::VoyageFormPage, voyage_list::VoyageListPage,
};
use crate::routes;
use crate::state::session::{CredentialPolicy, SessionProvider, SessionState};
use crate::util::task;

/// HTML shell rendered on the server for SSR + hydration.
///
/// `backend` is written into `<meta>` tags so the hydrated client can find
/// the hosted backend without a rebuild.
pub fn shell(options: LeptosOptions, backend: Option<BackendConfig>) -> impl IntoView {
    let meta = backend.map(|config| {
        view! {
            <meta name=URL_META content=config.url/>
            <meta name=ANON_KEY_META content=config.anon_key/>
            <meta name=STORAGE_BUCKET_META content=config.storage_bucket/>
        }
    });
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                {meta}
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the backend, the session signal and the session provider, then
/// sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let backend = Backend::from_config(BackendConfig::load());
    let session = RwSignal::new(SessionState::default());
    let provider = Arc::new(
        SessionProvider::new(Arc::clone(&backend.identity), CredentialPolicy::default()).with_observer(Arc::new(
            move |snapshot: &SessionState| {
                // The signal is gone once the app unmounts.
                let _ = session.try_set(snapshot.clone());
            },
        )),
    );

    provide_context(backend);
    provide_context(session);
    provide_context(Arc::clone(&provider));

    task::spawn({
        let provider = Arc::clone(&provider);
        async move { provider.initialize().await }
    });
    on_cleanup(move || provider.teardown());

    view! {
        <Stylesheet id="leptos" href="/pkg/travel-log.css"/>
        <Title text="Travel Log"/>

        <Router>
            <Navbar/>
            <main class="page">
                <Routes fallback=|| view! { <Redirect path=routes::NOT_FOUND/> }>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("signup") view=SignupPage/>
                    <Route path=StaticSegment("404") view=NotFoundPage/>
                    <Route
                        path=StaticSegment("voyages")
                        view=|| view! { <RequireAuth><VoyageListPage/></RequireAuth> }
                    />
                    <Route
                        path=(StaticSegment("voyages"), StaticSegment("new"))
                        view=|| view! { <RequireAuth><VoyageFormPage/></RequireAuth> }
                    />
                    <Route
                        path=(StaticSegment("voyages"), ParamSegment("id"))
                        view=|| view! { <RequireAuth><VoyageDetailPage/></RequireAuth> }
                    />
                    <Route
                        path=(StaticSegment("voyages"), ParamSegment("id"), StaticSegment("edit"))
                        view=|| view! { <RequireAuth><VoyageFormPage/></RequireAuth> }
                    />
                    <Route
                        path=(StaticSegment("voyages"), ParamSegment("id"), StaticSegment("etapes"), StaticSegment("new"))
                        view=|| view! { <RequireAuth><EtapeFormPage/></RequireAuth> }
                    />
                    <Route
                        path=(
                            StaticSegment("voyages"),
                            ParamSegment("id"),
                            StaticSegment("etapes"),
                            ParamSegment("etape_id"),
                        )
                        view=|| view! { <RequireAuth><EtapeDetailPage/></RequireAuth> }
                    />
                    <Route
                        path=(
                            StaticSegment("voyages"),
                            ParamSegment("id"),
                            StaticSegment("etapes"),
                            ParamSegment("etape_id"),
                            StaticSegment("edit"),
                        )
                        view=|| view! { <RequireAuth><EtapeFormPage/></RequireAuth> }
                    />
                    <Route path=StaticSegment("tags") view=|| view! { <RequireAuth><TagListPage/></RequireAuth> }/>
                    <Route
                        path=(StaticSegment("tags"), StaticSegment("new"))
                        view=|| view! { <RequireAuth><TagFormPage/></RequireAuth> }
                    />
                    <Route
                        path=(StaticSegment("tags"), ParamSegment("id"), StaticSegment("edit"))
                        view=|| view! { <RequireAuth><TagFormPage/></RequireAuth> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
