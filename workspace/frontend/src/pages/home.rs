use yew::prelude::*;
use yew_router::prelude::*;

use crate::session::use_session;
use crate::Route;

#[function_component(Home)]
pub fn home() -> Html {
    let session = use_session();

    html! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div class="max-w-md">
                    <h1 class="text-4xl font-bold">{"Investor Registry"}</h1>
                    <p class="py-6">
                        {"Register investors, find the ones above a threshold and check whether they are active."}
                    </p>
                    if session.is_authenticated() {
                        <Link<Route> to={Route::Dashboard} classes="btn btn-primary">{"Open dashboard"}</Link<Route>>
                    } else {
                        <div class="flex justify-center gap-2">
                            <Link<Route> to={Route::Login} classes="btn btn-primary">{"Sign in"}</Link<Route>>
                            <Link<Route> to={Route::Register} classes="btn">{"Create account"}</Link<Route>>
                        </div>
                    }
                </div>
            </div>
        </div>
    }
}
