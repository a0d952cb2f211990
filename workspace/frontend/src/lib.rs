use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod pages;
pub mod api_client;
pub mod common;
pub mod hooks;
pub mod query;
pub mod session;
pub mod settings;
pub mod validation;

use components::navbar::Navbar;
use pages::dashboard::Dashboard;
use pages::home::Home;
use pages::login::Login;
use pages::register::Register;
use query::QueryProvider;
use session::SessionProvider;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/dashboard")]
    Dashboard,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    log::debug!("Routing to: {:?}", routes);
    match routes {
        Route::Home => html! { <Home /> },
        Route::Login => html! { <Login /> },
        Route::Register => html! { <Register /> },
        Route::Dashboard => {
            log::trace!("Rendering Dashboard page");
            html! { <Dashboard /> }
        }
        Route::NotFound => {
            log::warn!("404 - Route not found");
            html! {
                <div class="text-center py-16">
                    <h1 class="text-3xl font-bold">{"404 Not Found"}</h1>
                    <Link<Route> to={Route::Home} classes="link">{"Back home"}</Link<Route>>
                </div>
            }
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <SessionProvider>
            <QueryProvider>
                <BrowserRouter>
                    <Navbar />
                    <main class="min-h-screen bg-base-200">
                        <Switch<Route> render={switch} />
                    </main>
                </BrowserRouter>
            </QueryProvider>
        </SessionProvider>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    // Initialize settings first
    settings::init_settings();

    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== Investor Registry frontend starting ===");
    log::debug!("API base URL: {}", settings.api_base_url());
    log::debug!("Debug mode: {}", settings.debug_mode);

    yew::Renderer::<App>::new().render();
}
