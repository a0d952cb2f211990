use yew::prelude::*;

use crate::api_client::investors::get_investor_state;
use crate::common::error::{ErrorDisplay, FieldError};
use crate::common::form::{field, form_data};
use crate::common::loading::Loading;
use crate::hooks::FetchState;
use crate::query::{use_query, QueryKey};
use crate::session::use_session;

fn badge_class(state: &str) -> &'static str {
    match state {
        "active" => "badge badge-success badge-lg",
        "inactive" => "badge badge-ghost badge-lg",
        _ => "badge badge-warning badge-lg",
    }
}

/// Ask the server for one investor's state by id
#[function_component(StateLookup)]
pub fn state_lookup() -> Html {
    let session = use_session();
    let form_ref = use_node_ref();
    let investor_id = use_state(|| None::<i32>);
    let input_error = use_state(|| None::<String>);

    let token = session.token().map(str::to_string);
    let key = QueryKey::new(["investors", "state"])
        .param("id", investor_id.unwrap_or_default())
        .for_token(token.as_deref());
    let enabled = token.is_some() && investor_id.is_some();
    let query = {
        let investor_id = investor_id.unwrap_or_default();
        use_query(key, enabled, move || {
            let token = token.clone().unwrap_or_default();
            async move { get_investor_state(&token, investor_id).await }
        })
    };

    let on_submit = {
        let form_ref = form_ref.clone();
        let investor_id = investor_id.clone();
        let input_error = input_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(data) = form_data(&form_ref) else {
                return;
            };
            match crate::validation::investor_id(&field(&data, "investor_id")) {
                Ok(id) => {
                    input_error.set(None);
                    investor_id.set(Some(id));
                }
                Err(message) => {
                    input_error.set(Some(message));
                    investor_id.set(None);
                }
            }
        })
    };

    let result = match (&query.state, *investor_id) {
        (FetchState::Loading, _) => html! { <Loading label="Checking state..." /> },
        (FetchState::Success(state), Some(id)) => html! {
            <div class="flex items-center gap-3">
                <span>{format!("Investor #{}", id)}</span>
                <span class={badge_class(&state.state)}>{&state.state}</span>
            </div>
        },
        (FetchState::Error(message), _) => html! {
            <ErrorDisplay title="State lookup failed" message={message.clone()} />
        },
        _ => html! {},
    };

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{"Investor state"}</h2>
                <form ref={form_ref} onsubmit={on_submit} class="join" novalidate={true}>
                    <input type="number" name="investor_id" class="input input-bordered join-item"
                        placeholder="Investor ID" min="1" step="1" />
                    <button type="submit" class="btn btn-accent join-item">{"Check"}</button>
                </form>
                <FieldError message={(*input_error).clone()} />
                { result }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_class() {
        assert!(badge_class("active").contains("badge-success"));
        assert!(badge_class("inactive").contains("badge-ghost"));
        assert!(badge_class("unknown").contains("badge-warning"));
    }
}
