use yew::prelude::*;
use yew_router::prelude::*;

use crate::query::use_query_client;
use crate::session::use_session;
use crate::Route;

/// Clears the session and every cached query, then returns home
#[hook]
pub fn use_logout() -> Callback<MouseEvent> {
    let session = use_session();
    let client = use_query_client();
    let navigator = use_navigator();

    Callback::from(move |_: MouseEvent| {
        log::debug!("User logged out");
        client.clear();
        session.logout();
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Home);
        }
    })
}

#[function_component(Navbar)]
pub fn navbar() -> Html {
    let session = use_session();
    let on_logout = use_logout();

    html! {
        <div class="navbar bg-primary text-primary-content">
            <div class="navbar-start">
                <Link<Route> to={Route::Home} classes="btn btn-ghost text-xl">{"Investor Registry"}</Link<Route>>
            </div>
            <div class="navbar-end gap-2">
                if session.is_authenticated() {
                    <Link<Route> to={Route::Dashboard} classes="btn btn-ghost">{"Dashboard"}</Link<Route>>
                    if let Some(username) = session.username() {
                        <span class="hidden sm:inline">{username}</span>
                    }
                    <button class="btn btn-outline btn-sm" onclick={on_logout}>{"Log out"}</button>
                } else {
                    <Link<Route> to={Route::Login} classes="btn btn-ghost">{"Sign in"}</Link<Route>>
                    <Link<Route> to={Route::Register} classes="btn btn-secondary btn-sm">{"Register"}</Link<Route>>
                }
            </div>
        </div>
    }
}
