use web_sys::{FormData, HtmlFormElement};
use yew::NodeRef;

/// Snapshot of the form behind `form_ref`
pub fn form_data(form_ref: &NodeRef) -> Option<FormData> {
    let form = form_ref.cast::<HtmlFormElement>()?;
    FormData::new_with_form(&form).ok()
}

/// Text value of a named field, empty when absent
pub fn field(data: &FormData, name: &str) -> String {
    data.get(name).as_string().unwrap_or_default()
}

pub fn reset(form_ref: &NodeRef) {
    if let Some(form) = form_ref.cast::<HtmlFormElement>() {
        form.reset();
    }
}
