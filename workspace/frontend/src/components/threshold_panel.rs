use common::DEFAULT_THRESHOLD;
use rust_decimal::Decimal;
use yew::prelude::*;

use crate::api_client::investors::list_investors_above;
use crate::common::error::{ErrorDisplay, FieldError};
use crate::common::form::{field, form_data};
use crate::common::loading::Loading;
use crate::components::investor_table::InvestorTable;
use crate::hooks::FetchState;
use crate::query::{use_query, QueryKey};
use crate::session::use_session;

/// Investors whose investment reaches a chosen amount
#[function_component(ThresholdPanel)]
pub fn threshold_panel() -> Html {
    let session = use_session();
    let form_ref = use_node_ref();
    let amount = use_state(|| Decimal::from(DEFAULT_THRESHOLD));
    let input_error = use_state(|| None::<String>);

    let token = session.token().map(str::to_string);
    let key = QueryKey::new(["investors", "greater"])
        .param("amount", *amount)
        .for_token(token.as_deref());
    let enabled = token.is_some();
    let query = {
        let amount = *amount;
        use_query(key, enabled, move || {
            let token = token.clone().unwrap_or_default();
            async move { list_investors_above(&token, amount).await }
        })
    };

    let on_submit = {
        let form_ref = form_ref.clone();
        let amount = amount.clone();
        let input_error = input_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(data) = form_data(&form_ref) else {
                return;
            };
            match crate::validation::threshold(&field(&data, "amount")) {
                Ok(value) => {
                    log::debug!("Filtering investors at or above {}", value);
                    input_error.set(None);
                    amount.set(value);
                }
                Err(message) => input_error.set(Some(message)),
            }
        })
    };

    let results = match &query.state {
        FetchState::NotStarted => html! {},
        FetchState::Loading => html! { <Loading label="Filtering investors..." /> },
        FetchState::Success(investors) => html! {
            <InvestorTable
                investors={investors.clone()}
                empty_text={format!("No investors with at least {}", common::format_amount(*amount))}
            />
        },
        FetchState::Error(message) => html! {
            <ErrorDisplay message={message.clone()} on_retry={query.refetch.clone()} />
        },
    };

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{"Investors above a threshold"}</h2>
                <form ref={form_ref} onsubmit={on_submit} class="join" novalidate={true}>
                    <input type="number" name="amount" class="input input-bordered join-item"
                        placeholder={DEFAULT_THRESHOLD.to_string()}
                        value={DEFAULT_THRESHOLD.to_string()} min="0" step="0.01" />
                    <button type="submit" class="btn btn-secondary join-item">{"Filter"}</button>
                </form>
                <FieldError message={(*input_error).clone()} />
                { results }
            </div>
        </div>
    }
}
