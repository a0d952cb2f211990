use common::{Credentials, UserDto};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::auth::register;
use crate::common::error::FieldError;
use crate::common::form::{field, form_data};
use crate::common::loading::ButtonSpinner;
use crate::pages::login::LoginQuery;
use crate::query::use_mutation;
use crate::Route;

#[function_component(Register)]
pub fn register_page() -> Html {
    let navigator = use_navigator();
    let form_ref = use_node_ref();
    let form_error = use_state(|| None::<String>);

    let on_registered = Callback::from(move |user: UserDto| {
        log::info!("User registered with ID: {}", user.id);
        let Some(navigator) = &navigator else {
            return;
        };
        let query = LoginQuery { registered: true };
        if let Err(e) = navigator.push_with_query(&Route::Login, &query) {
            log::error!("Failed to encode login query: {}", e);
            navigator.push(&Route::Login);
        }
    });
    let mutation = use_mutation(
        |credentials: Credentials| async move { register(&credentials).await },
        &[],
        on_registered,
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

    let error = (*form_error)
        .clone()
        .or_else(|| mutation.state.error().cloned());

    html! {
        <div class="flex justify-center py-10">
            <div class="card bg-base-100 shadow w-full max-w-sm">
                <div class="card-body">
                    <h1 class="card-title">{"Create account"}</h1>
                    <FieldError message={error} />
                    <form ref={form_ref} onsubmit={on_submit} class="space-y-3" novalidate={true}>
                        <input type="text" name="username" class="input input-bordered w-full"
                            placeholder="Username" autocomplete="username" disabled={is_submitting} />
                        <input type="password" name="password" class="input input-bordered w-full"
                            placeholder="Password" autocomplete="new-password" disabled={is_submitting} />
                        <button type="submit" class="btn btn-primary w-full" disabled={is_submitting}>
                            if is_submitting {
                                <ButtonSpinner />
                            }
                            {"Register"}
                        </button>
                    </form>
                    <p class="text-sm">
                        {"Already registered? "}
                        <Link<Route> to={Route::Login} classes="link">{"Sign in"}</Link<Route>>
                    </p>
                </div>
            </div>
        </div>
    }
}
