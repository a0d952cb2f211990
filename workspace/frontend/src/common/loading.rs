use yew::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub enum LoadingSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl LoadingSize {
    fn class(&self) -> &'static str {
        match self {
            LoadingSize::Small => "loading-sm",
            LoadingSize::Medium => "loading-md",
            LoadingSize::Large => "loading-lg",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or_default]
    pub size: LoadingSize,
    /// Caption under the spinner, e.g. "Loading investors..."
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="flex flex-col justify-center items-center py-8 gap-3" role="status">
            <span class={classes!("loading", "loading-spinner", props.size.class())}></span>
            if let Some(label) = &props.label {
                <p class="text-sm text-base-content/60">{label}</p>
            }
        </div>
    }
}

/// Small spinner that sits inside a submit button
#[function_component(ButtonSpinner)]
pub fn button_spinner() -> Html {
    html! { <span class="loading loading-spinner loading-xs"></span> }
}
