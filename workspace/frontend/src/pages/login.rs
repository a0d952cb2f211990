use common::{Credentials, LoginResponse};
use serde::{Deserialize, Serialize};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::auth::login;
use crate::common::error::FieldError;
use crate::common::form::{field, form_data};
use crate::common::loading::ButtonSpinner;
use crate::query::use_mutation;
use crate::session::use_session;
use crate::Route;

/// Query string set by the register page after a successful sign-up
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginQuery {
    #[serde(default)]
    pub registered: bool,
}

#[function_component(Login)]
pub fn login_page() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let registered = use_location()
        .and_then(|location| location.query::<LoginQuery>().ok())
        .map(|query| query.registered)
        .unwrap_or(false);
    let form_ref = use_node_ref();
    let form_error = use_state(|| None::<String>);

    let on_login = {
        let session = session.clone();
        Callback::from(move |response: LoginResponse| {
            log::info!("Login succeeded, token valid for {}", response.expires_in);
            session.set_token(response.token);
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Dashboard);
            }
        })
    };
    let mutation = use_mutation(
        |credentials: Credentials| async move { login(&credentials).await },
        &[],
        on_login,
    );
    let is_submitting = mutation.is_pending();

    let on_submit = {
        let form_ref = form_ref.clone();
        let form_error = form_error.clone();
        let run = mutation.run.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if is_submitting {
                return;
            }
            let Some(data) = form_data(&form_ref) else {
                return;
            };
            match crate::validation::credentials(&field(&data, "username"), &field(&data, "password")) {
                Ok(credentials) => {
                    form_error.set(None);
                    run.emit(credentials);
                }
                Err(message) => form_error.set(Some(message)),
            }
        })
    };

    if session.is_authenticated() && !mutation.state.is_success() {
        return html! { <Redirect<Route> to={Route::Dashboard} /> };
    }

    let error = (*form_error)
        .clone()
        .or_else(|| mutation.state.error().cloned());

    html! {
        <div class="flex justify-center py-10">
            <div class="card bg-base-100 shadow w-full max-w-sm">
                <div class="card-body">
                    <h1 class="card-title">{"Sign in"}</h1>
                    if registered {
                        <div class="alert alert-success py-2 text-sm">{"Account created, you can sign in now."}</div>
                    }
                    <FieldError message={error} />
                    <form ref={form_ref} onsubmit={on_submit} class="space-y-3" novalidate={true}>
                        <input type="text" name="username" class="input input-bordered w-full"
                            placeholder="Username" autocomplete="username" disabled={is_submitting} />
                        <input type="password" name="password" class="input input-bordered w-full"
                            placeholder="Password" autocomplete="current-password" disabled={is_submitting} />
                        <button type="submit" class="btn btn-primary w-full" disabled={is_submitting}>
                            if is_submitting {
                                <ButtonSpinner />
                            }
                            {"Sign in"}
                        </button>
                    </form>
                    <p class="text-sm">
                        {"No account? "}
                        <Link<Route> to={Route::Register} classes="link">{"Register"}</Link<Route>>
                    </p>
                </div>
            </div>
        </div>
    }
}
