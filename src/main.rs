use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};

mod config;
mod content;
mod countdown;
mod events;
mod notifier;
mod storage;
mod theme;
mod timing {
    pub mod clock;
    pub mod random;
    pub mod scheduler;
}
mod chat {
    pub mod script;
    pub mod session;
}
mod components {
    pub mod chat_widget;
    pub mod countdown_timer;
    pub mod faq;
}
mod pages {
    pub mod home;
    pub mod mentorship;
}

use events::EventBus;
use pages::{
    home::Home,
    mentorship::{Mentorship, MentorshipPage},
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/mentoria/ia")]
    MentoriaIa,
    #[at("/gestao-de-escritorio")]
    GestaoDeEscritorio,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::MentoriaIa => {
            info!("Rendering Mentoria IA page");
            html! { <MentorshipPage mentorship={Mentorship::Ia} /> }
        },
        Route::GestaoDeEscritorio => {
            info!("Rendering Gestao de Escritorio page");
            html! { <MentorshipPage mentorship={Mentorship::Gestao} /> }
        },
        Route::NotFound => {
            info!("Unknown path, redirecting home");
            html! { <Redirect<Route> to={Route::Home} /> }
        },
    }
}

#[function_component]
fn App() -> Html {
    // One bus for the whole app; pages publish, the chat widget listens.
    let bus = use_memo(|_| EventBus::new(), ());

    html! {
        <ContextProvider<EventBus> context={(*bus).clone()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<EventBus>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
