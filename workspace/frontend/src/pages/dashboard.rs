use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::investors::list_investors;
use crate::common::error::ErrorDisplay;
use crate::common::loading::Loading;
use crate::components::investor_form::InvestorForm;
use crate::components::investor_table::InvestorTable;
use crate::components::navbar::use_logout;
use crate::components::state_lookup::StateLookup;
use crate::components::threshold_panel::ThresholdPanel;
use crate::hooks::FetchState;
use crate::query::{use_query, QueryKey};
use crate::session::use_session;
use crate::Route;

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let session = use_session();
    let on_logout = use_logout();
    if !session.is_authenticated() {
        log::debug!("Dashboard requires a session, redirecting to login");
        return html! { <Redirect<Route> to={Route::Login} /> };
    }
    let username = session.username().unwrap_or("investor").to_string();

    html! {
        <div class="container mx-auto p-4 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">{format!("Welcome, {}", username)}</h1>
                <button class="btn btn-ghost btn-sm" onclick={on_logout}>{"Log out"}</button>
            </div>
            <InvestorForm />
            <InvestorDirectory />
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <ThresholdPanel />
                <StateLookup />
            </div>
        </div>
    }
}

/// Every registered investor
#[function_component(InvestorDirectory)]
fn investor_directory() -> Html {
    let session = use_session();
    let token = session.token().map(str::to_string);
    let key = QueryKey::new(["investors"]).for_token(token.as_deref());
    let enabled = token.is_some();
    let query = use_query(key, enabled, move || {
        let token = token.clone().unwrap_or_default();
        async move { list_investors(&token).await }
    });

    let content = match &query.state {
        FetchState::NotStarted => html! {},
        FetchState::Loading => html! { <Loading label="Loading investors..." /> },
        FetchState::Success(investors) => html! { <InvestorTable investors={investors.clone()} /> },
        FetchState::Error(message) => html! {
            <ErrorDisplay message={message.clone()} on_retry={query.refetch.clone()} />
        },
    };

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h2 class="card-title">{"Investors"}</h2>
                    if let Some(investors) = query.state.data() {
                        <span class="badge badge-neutral">{investors.len()}</span>
                    }
                </div>
                { content }
            </div>
        </div>
    }
}
