use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::chat_widget::ChatWidget;
use crate::content::ChatContent;
use crate::theme::Theme;
use crate::Route;

#[function_component(Home)]
pub fn home() -> Html {
    let chat = ChatContent::default();

    html! {
        <div class="home">
            <ChatWidget
                mentor_name={chat.mentor_name}
                custom_messages={chat.custom_messages}
                theme={Theme::Cyan}
            />
            <section class="home__hero">
                <span class="home__badge">{"V&A Mentorias"}</span>
                <h1>{"Advocacia moderna, do atendimento à gestão"}</h1>
                <p>{"Escolha a mentoria que faz sentido para o momento do seu escritório."}</p>
            </section>

            <section class="home__cards">
                <Link<Route> to={Route::MentoriaIa} classes="home__card home__card--cyan">
                    <h2>{"Mentoria IA"}</h2>
                    <p>{"Automatize petições, atendimento e rotinas com inteligência artificial."}</p>
                    <span class="home__more">{"Conhecer →"}</span>
                </Link<Route>>
                <Link<Route> to={Route::GestaoDeEscritorio} classes="home__card home__card--purple">
                    <h2>{"Gestão de Escritório"}</h2>
                    <p>{"Processos, equipe e financeiro organizados para crescer com previsibilidade."}</p>
                    <span class="home__more">{"Conhecer →"}</span>
                </Link<Route>>
            </section>

            <style>
                {r#"
                .home {
                    min-height: 100vh;
                    background: #020617;
                    color: #f1f5f9;
                    padding: 6rem 1.5rem;
                    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                }
                .home__hero {
                    text-align: center;
                    max-width: 720px;
                    margin: 0 auto 4rem;
                }
                .home__hero h1 {
                    font-size: clamp(2rem, 5vw, 3.5rem);
                    font-weight: 800;
                    line-height: 1.1;
                }
                .home__hero p { color: #cbd5e1; font-size: 1.125rem; }
                .home__badge {
                    display: inline-block;
                    padding: 0.375rem 1rem;
                    border-radius: 999px;
                    border: 1px solid rgba(6, 182, 212, 0.3);
                    color: #22d3ee;
                    margin-bottom: 1.5rem;
                }
                .home__cards {
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
                    gap: 2rem;
                    max-width: 900px;
                    margin: 0 auto;
                }
                .home__card {
                    display: block;
                    padding: 2rem;
                    border-radius: 1.5rem;
                    background: rgba(15, 23, 42, 0.5);
                    color: inherit;
                    text-decoration: none;
                    transition: transform 0.2s ease;
                }
                .home__card:hover { transform: translateY(-4px); }
                .home__card--cyan { border: 1px solid rgba(6, 182, 212, 0.3); }
                .home__card--purple { border: 1px solid rgba(168, 85, 247, 0.3); }
                .home__card p { color: #94a3b8; }
                .home__more { font-weight: 700; }
                .home__card--cyan .home__more { color: #22d3ee; }
                .home__card--purple .home__more { color: #c084fc; }
                "#}
            </style>
        </div>
    }
}
