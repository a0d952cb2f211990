use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: AttrValue,
    #[prop_or(AttrValue::Static("Request failed"))]
    pub title: AttrValue,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

/// Error panel for a failed query, with an optional retry button
#[function_component(ErrorDisplay)]
pub fn error_display(props: &ErrorDisplayProps) -> Html {
    log::warn!("{}: {}", props.title, props.message);

    let retry = props.on_retry.clone().map(|on_retry| {
        Callback::from(move |_: MouseEvent| {
            log::debug!("Retrying after error");
            on_retry.emit(());
        })
    });

    html! {
        <div class="alert alert-error" role="alert">
            <div class="flex flex-col">
                <span class="font-semibold">{&props.title}</span>
                <span class="text-sm">{&props.message}</span>
            </div>
            if let Some(onclick) = retry {
                <button class="btn btn-sm" {onclick}>{"Retry"}</button>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FieldErrorProps {
    pub message: Option<String>,
}

/// One-line form error; renders nothing without a message
#[function_component(FieldError)]
pub fn field_error(props: &FieldErrorProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <div class="alert alert-error py-2 text-sm" role="alert">
                <span>{message}</span>
            </div>
        },
        None => html! {},
    }
}
