use common::{CreateInvestorRequest, CreatedInvestorDto};
use yew::prelude::*;

use crate::api_client::investors::create_investor;
use crate::common::error::FieldError;
use crate::common::form::{field, form_data, reset};
use crate::common::loading::ButtonSpinner;
use crate::query::use_mutation;
use crate::session::use_session;

/// Every investor view depends on the set of investors
const INVALIDATES: &[&[&str]] = &[&["investors"]];

#[function_component(InvestorForm)]
pub fn investor_form() -> Html {
    let session = use_session();
    let form_ref = use_node_ref();
    let form_error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);

    let on_created = {
        let form_ref = form_ref.clone();
        let notice = notice.clone();
        Callback::from(move |investor: CreatedInvestorDto| {
            log::info!("Investor created with ID: {}", investor.id);
            reset(&form_ref);
            notice.set(Some(format!(
                "Registered {} {} (#{})",
                investor.name, investor.surname, investor.id
            )));
        })
    };

    let token = session.token().map(str::to_string);
    let mutation = use_mutation(
        move |request: CreateInvestorRequest| {
            let token = token.clone();
            async move {
                let token = token.ok_or_else(|| "You are not signed in".to_string())?;
                create_investor(&token, &request).await
            }
        },
        INVALIDATES,
        on_created,
    );
    let is_submitting = mutation.is_pending();

    let on_submit = {
        let form_ref = form_ref.clone();
        let form_error = form_error.clone();
        let notice = notice.clone();
        let run = mutation.run.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if is_submitting {
                return;
            }
            let Some(data) = form_data(&form_ref) else {
                log::error!("Investor form is not mounted");
                return;
            };

            notice.set(None);
            match crate::validation::new_investor(
                &field(&data, "name"),
                &field(&data, "surname"),
                &field(&data, "investment"),
            ) {
                Ok(request) => {
                    form_error.set(None);
                    log::debug!("Submitting investor {} {}", request.name, request.surname);
                    run.emit(request);
                }
                Err(message) => form_error.set(Some(message)),
            }
        })
    };

    let error = (*form_error)
        .clone()
        .or_else(|| mutation.state.error().cloned());

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{"New investor"}</h2>
                <FieldError message={error} />
                if let Some(notice) = (*notice).as_ref() {
                    <div class="alert alert-success py-2 text-sm">{notice}</div>
                }
                <form ref={form_ref} onsubmit={on_submit} class="space-y-3" novalidate={true}>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                        <input type="text" name="name" class="input input-bordered w-full"
                            placeholder="Name" disabled={is_submitting} />
                        <input type="text" name="surname" class="input input-bordered w-full"
                            placeholder="Surname" disabled={is_submitting} />
                        <input type="number" name="investment" class="input input-bordered w-full"
                            placeholder="Investment" min="0" step="0.01" disabled={is_submitting} />
                    </div>
                    <div class="card-actions justify-end">
                        <button type="submit" class="btn btn-primary" disabled={is_submitting}>
                            if is_submitting {
                                <ButtonSpinner />
                                {"Saving..."}
                            } else {
                                {"Add investor"}
                            }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
