use common::{format_amount, InvestorDto};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct InvestorTableProps {
    pub investors: Vec<InvestorDto>,
    #[prop_or(AttrValue::Static("No investors yet"))]
    pub empty_text: AttrValue,
}

#[function_component(InvestorTable)]
pub fn investor_table(props: &InvestorTableProps) -> Html {
    if props.investors.is_empty() {
        return html! {
            <p class="text-center text-base-content/60 py-6">{&props.empty_text}</p>
        };
    }

    html! {
        <div class="overflow-x-auto">
            <table class="table table-zebra">
                <thead>
                    <tr>
                        <th>{"ID"}</th>
                        <th>{"Name"}</th>
                        <th>{"Surname"}</th>
                        <th class="text-right">{"Investment"}</th>
                        <th>{"Registered by"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for props.investors.iter().map(investor_row) }
                </tbody>
            </table>
        </div>
    }
}

fn investor_row(investor: &InvestorDto) -> Html {
    let registered_by = investor
        .registered_by
        .as_ref()
        .map(|user| user.username.clone())
        .unwrap_or_else(|| "-".to_string());

    html! {
        <tr key={investor.id}>
            <td>{investor.id}</td>
            <td>{&investor.name}</td>
            <td>{&investor.surname}</td>
            <td class="text-right font-mono">{format_amount(investor.investment)}</td>
            <td>{registered_by}</td>
        </tr>
    }
}
