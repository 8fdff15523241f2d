use log::info;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, MouseEvent};
use yew::prelude::*;

use crate::components::chat_widget::ChatWidget;
use crate::components::countdown_timer::CountdownTimer;
use crate::components::faq::FaqList;
use crate::config::{GESTAO_COUNTDOWN_KEY, IA_COUNTDOWN_KEY, STICKY_CTA_SCROLL_PX};
use crate::content::{BulletSection, PageContent};
use crate::events::{EventBus, OPEN_CHAT_WIDGET};
use crate::theme::Theme;

/// The sales pages built from the shared template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mentorship {
    Ia,
    Gestao,
}

impl Mentorship {
    pub fn content(self) -> PageContent {
        match self {
            Mentorship::Ia => {
                PageContent::load("mentoria-ia", include_str!("../../content/mentoria-ia.json"))
            }
            Mentorship::Gestao => PageContent::load(
                "mentoria-gestao",
                include_str!("../../content/mentoria-gestao.json"),
            ),
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            Mentorship::Ia => Theme::Cyan,
            Mentorship::Gestao => Theme::Purple,
        }
    }

    pub fn countdown_key(self) -> &'static str {
        match self {
            Mentorship::Ia => IA_COUNTDOWN_KEY,
            Mentorship::Gestao => GESTAO_COUNTDOWN_KEY,
        }
    }

    pub fn mentor_image(self) -> &'static str {
        match self {
            Mentorship::Ia => "/img/tulio.webp",
            Mentorship::Gestao => "/img/img128.jpg",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct MentorshipPageProps {
    pub mentorship: Mentorship,
}

fn bullet_section(section: &BulletSection, class: &'static str, marker: &'static str) -> Html {
    if section.items.is_empty() {
        return html! {};
    }
    html! {
        <section class={classes!("page-section", class)}>
            <div class="container">
                <h2>{&section.title}</h2>
                <ul class="bullet-list">
                    { for section.items.iter().map(|item| html! {
                        <li>
                            <span class="bullet-list__marker">{marker}</span>
                            <span>{item}</span>
                        </li>
                    }) }
                </ul>
            </div>
        </section>
    }
}

#[function_component(MentorshipPage)]
pub fn mentorship_page(props: &MentorshipPageProps) -> Html {
    let mentorship = props.mentorship;
    let content = use_memo(|m: &Mentorship| m.content(), mentorship);
    let theme = mentorship.theme();
    let countdown_key = AttrValue::from(mentorship.countdown_key());
    let show_sticky_cta = use_state(|| false);
    let bus = use_context::<EventBus>();

    {
        let show_sticky_cta = show_sticky_cta.clone();
        use_effect_with_deps(
            move |_| {
                let listener = window().map(|window| {
                    let scroll_window = window.clone();
                    let scroll_callback = Closure::wrap(Box::new(move || {
                        let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
                        show_sticky_cta.set(scroll_y > STICKY_CTA_SCROLL_PX);
                    }) as Box<dyn FnMut()>);

                    let _ = window.add_event_listener_with_callback(
                        "scroll",
                        scroll_callback.as_ref().unchecked_ref(),
                    );
                    (window, scroll_callback)
                });

                move || {
                    if let Some((window, scroll_callback)) = listener {
                        let _ = window.remove_event_listener_with_callback(
                            "scroll",
                            scroll_callback.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    let open_chat = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        if let Some(bus) = &bus {
            info!("Call to action asked the chat to open");
            bus.publish(OPEN_CHAT_WIDGET);
        }
    });

    let checkout = content.cta.links.checkout.clone().unwrap_or_else(|| "#oferta".to_string());
    let hero = &content.hero;

    html! {
        <div class={classes!("mentorship-page", theme.class())}>
            <ChatWidget
                mentor_name={content.chat.mentor_name.clone()}
                mentor_image={Some(AttrValue::from(mentorship.mentor_image()))}
                custom_messages={content.chat.custom_messages.clone()}
                theme={theme}
                raised={*show_sticky_cta}
            />

            <section class="hero">
                <div class="container">
                    {
                        if hero.badge.is_empty() {
                            html! {}
                        } else {
                            html! { <span class="hero__badge">{&hero.badge}</span> }
                        }
                    }
                    <h1 class="hero__title">
                        {&hero.title}{" "}
                        <span class="hero__highlight">{&hero.highlight}</span>
                    </h1>
                    <p class="hero__subtitle">{&hero.subtitle}</p>
                    <div class="hero__actions">
                        <a class="cta-button" href={checkout.clone()}>{"QUERO MINHA VAGA"}</a>
                        <button class="cta-button cta-button--secondary" onclick={open_chat.clone()}>
                            {"Tirar dúvidas no chat"}
                        </button>
                    </div>
                </div>
            </section>

            { bullet_section(&content.problem, "page-section--problem", "✕") }
            { bullet_section(&content.solution, "page-section--solution", "✓") }

            {
                if content.faq.is_empty() {
                    html! {}
                } else {
                    html! {
                        <section class="page-section">
                            <div class="container">
                                <h2>{"Perguntas frequentes"}</h2>
                                <FaqList entries={content.faq.clone()} />
                                <button class="cta-button cta-button--secondary" onclick={open_chat.clone()}>
                                    {"Ainda tem dúvidas? Fale com a gente"}
                                </button>
                            </div>
                        </section>
                    }
                }
            }

            <section id="oferta" class="page-section page-section--offer">
                <div class="container offer-card">
                    <h2>{"Garanta sua vaga "}<span class="hero__highlight">{"ainda hoje."}</span></h2>
                    <CountdownTimer countdown_key={countdown_key.clone()} theme={theme} />
                    {
                        match &content.cta.pricing {
                            Some(pricing) => html! {
                                <div class="pricing">
                                    <div class="pricing__old">{&pricing.old}</div>
                                    <div class="pricing__current">
                                        <span class="pricing__value">{&pricing.current}</span>
                                        <span class="pricing__cents">{&pricing.cents}</span>
                                    </div>
                                    {
                                        match (&pricing.installments_text, &pricing.installment_value) {
                                            (Some(text), Some(value)) => html! {
                                                <div class="pricing__installments">{format!("{} {}", text, value)}</div>
                                            },
                                            _ => html! {},
                                        }
                                    }
                                </div>
                            },
                            None => html! {},
                        }
                    }
                    <a class="cta-button" href={checkout.clone()}>{"COMPRAR NA KIWIFY"}</a>
                    <p class="offer-card__guarantee">{"Satisfação garantida ou seu dinheiro de volta."}</p>
                </div>
            </section>

            <footer class="page-footer">
                <p>{"© V&A Mentorias. Todos os direitos reservados."}</p>
            </footer>
            <div class="page-footer__spacer"></div>

            {
                if *show_sticky_cta {
                    html! {
                        <div class="sticky-cta">
                            <div class="sticky-cta__inner">
                                <div class="sticky-cta__timer">
                                    <span class="sticky-cta__label">{"Oferta expira em:"}</span>
                                    <CountdownTimer countdown_key={countdown_key.clone()} theme={theme} compact={true} />
                                </div>
                                <div class="sticky-cta__price">
                                    {
                                        match &content.cta.pricing {
                                            Some(pricing) => html! {
                                                <>
                                                    <span class="sticky-cta__old">{&pricing.old}</span>
                                                    <span class="sticky-cta__current">{&pricing.current}</span>
                                                </>
                                            },
                                            None => html! {},
                                        }
                                    }
                                </div>
                                <a class="cta-button" href={checkout}>{"GARANTIR VAGA"}</a>
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }
            }

            <style>
                {r#"
                .mentorship-page {
                    background: #020617;
                    color: #f1f5f9;
                    min-height: 100vh;
                    overflow-x: hidden;
                    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                }
                .theme-cyan { --accent: #22d3ee; --accent-border: rgba(6, 182, 212, 0.3); --accent-strong: #0891b2; }
                .theme-purple { --accent: #c084fc; --accent-border: rgba(168, 85, 247, 0.3); --accent-strong: #9333ea; }
                .container {
                    max-width: 1100px;
                    margin: 0 auto;
                    padding: 0 1.5rem;
                }
                .hero {
                    padding: 8rem 0 5rem;
                    text-align: center;
                }
                .hero__badge {
                    display: inline-block;
                    padding: 0.375rem 1rem;
                    border-radius: 999px;
                    border: 1px solid var(--accent-border);
                    color: var(--accent);
                    font-size: 0.875rem;
                    margin-bottom: 1.5rem;
                }
                .hero__title {
                    font-size: clamp(2.25rem, 5vw, 4rem);
                    font-weight: 800;
                    line-height: 1.1;
                    margin-bottom: 1.5rem;
                }
                .hero__highlight {
                    color: var(--accent);
                }
                .hero__subtitle {
                    color: #cbd5e1;
                    font-size: 1.125rem;
                    max-width: 720px;
                    margin: 0 auto 2.5rem;
                }
                .hero__actions {
                    display: flex;
                    gap: 1rem;
                    justify-content: center;
                    flex-wrap: wrap;
                }
                .cta-button {
                    display: inline-flex;
                    align-items: center;
                    justify-content: center;
                    padding: 1rem 2.5rem;
                    border-radius: 0.75rem;
                    background: var(--accent-strong);
                    color: #fff;
                    font-weight: 700;
                    text-decoration: none;
                    border: none;
                    cursor: pointer;
                }
                .cta-button--secondary {
                    background: transparent;
                    border: 1px solid var(--accent-border);
                    color: var(--accent);
                    margin-top: 1.5rem;
                }
                .hero__actions .cta-button--secondary {
                    margin-top: 0;
                }
                .page-section {
                    padding: 5rem 0;
                }
                .page-section h2 {
                    font-size: 2rem;
                    font-weight: 700;
                    margin-bottom: 2rem;
                    text-align: center;
                }
                .bullet-list {
                    list-style: none;
                    padding: 0;
                    max-width: 720px;
                    margin: 0 auto;
                }
                .bullet-list li {
                    display: flex;
                    gap: 1rem;
                    padding: 1rem 1.25rem;
                    margin-bottom: 0.75rem;
                    border-radius: 1rem;
                    background: rgba(15, 23, 42, 0.5);
                    border: 1px solid rgba(255, 255, 255, 0.05);
                }
                .page-section--problem .bullet-list__marker { color: #f87171; }
                .page-section--solution .bullet-list__marker { color: var(--accent); }
                .faq-list {
                    max-width: 800px;
                    margin: 0 auto;
                    display: flex;
                    flex-direction: column;
                    gap: 1rem;
                }
                .faq-item {
                    border: 1px solid var(--accent-border);
                    border-radius: 1rem;
                    background: rgba(15, 23, 42, 0.4);
                    overflow: hidden;
                }
                .faq-question {
                    width: 100%;
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    padding: 1.5rem;
                    background: none;
                    border: none;
                    color: #fff;
                    font-size: 1.125rem;
                    font-weight: 700;
                    text-align: left;
                    cursor: pointer;
                }
                .faq-item.open .toggle-icon { color: var(--accent); }
                .faq-answer {
                    padding: 0 1.5rem 1.5rem;
                    color: #cbd5e1;
                    line-height: 1.6;
                }
                .page-section--offer .container > .cta-button--secondary,
                .page-section .container > .cta-button--secondary {
                    display: flex;
                    margin: 2rem auto 0;
                }
                .offer-card {
                    text-align: center;
                    background: rgba(15, 23, 42, 0.4);
                    border: 1px solid var(--accent-border);
                    border-radius: 3rem;
                    padding: 4rem 2rem;
                }
                .pricing { margin-bottom: 2.5rem; }
                .pricing__old {
                    color: #94a3b8;
                    text-decoration: line-through;
                    font-size: 1.125rem;
                }
                .pricing__value {
                    font-size: clamp(2.5rem, 6vw, 3.75rem);
                    font-weight: 900;
                }
                .pricing__cents {
                    font-size: 1.25rem;
                    color: #94a3b8;
                }
                .pricing__installments {
                    display: inline-block;
                    padding: 0.25rem 1rem;
                    border-radius: 999px;
                    color: var(--accent);
                    background: rgba(59, 130, 246, 0.1);
                    font-size: 0.875rem;
                }
                .offer-card__guarantee {
                    color: #64748b;
                    font-size: 0.875rem;
                    margin-top: 1.5rem;
                }
                .page-footer {
                    text-align: center;
                    color: #64748b;
                    padding: 3rem 0;
                    border-top: 1px solid rgba(255, 255, 255, 0.05);
                }
                .page-footer__spacer { height: 80px; }
                .sticky-cta {
                    position: fixed;
                    bottom: 0;
                    left: 0;
                    right: 0;
                    z-index: 50;
                    background: rgba(2, 6, 23, 0.9);
                    backdrop-filter: blur(16px);
                    border-top: 1px solid rgba(255, 255, 255, 0.1);
                    animation: slideUp 0.3s ease-out;
                }
                @keyframes slideUp {
                    from { transform: translateY(100%); }
                    to { transform: translateY(0); }
                }
                .sticky-cta__inner {
                    max-width: 1200px;
                    margin: 0 auto;
                    padding: 0.75rem 1rem;
                    display: flex;
                    align-items: center;
                    justify-content: space-between;
                    gap: 1rem;
                }
                .sticky-cta__timer {
                    display: flex;
                    align-items: center;
                    gap: 0.5rem;
                }
                .sticky-cta__label {
                    font-size: 0.75rem;
                    color: #94a3b8;
                    text-transform: uppercase;
                    letter-spacing: 0.05em;
                }
                .sticky-cta__price {
                    display: flex;
                    flex-direction: column;
                    line-height: 1;
                }
                .sticky-cta__old {
                    font-size: 0.625rem;
                    color: #64748b;
                    text-decoration: line-through;
                }
                .sticky-cta__current {
                    font-size: 1.25rem;
                    font-weight: 700;
                }
                .sticky-cta .cta-button { padding: 0.75rem 1.5rem; }

                .countdown {
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    gap: 0.75rem;
                    color: #fff;
                    margin-bottom: 1.5rem;
                }
                .countdown__block {
                    background: rgba(15, 23, 42, 0.8);
                    border: 1px solid var(--accent-border);
                    border-radius: 0.75rem;
                    padding: 0.75rem 1rem;
                    min-width: 70px;
                    text-align: center;
                }
                .countdown__value,
                .countdown__sep {
                    font-size: 1.875rem;
                    font-weight: 700;
                    color: var(--accent);
                }
                .countdown__label {
                    font-size: 0.75rem;
                    color: #94a3b8;
                    text-transform: uppercase;
                    letter-spacing: 0.05em;
                }
                .countdown-compact {
                    display: flex;
                    align-items: center;
                    gap: 0.25rem;
                    font-family: monospace;
                    font-weight: 700;
                    color: #fff;
                    font-variant-numeric: tabular-nums;
                }
                .countdown-compact__cell {
                    background: rgba(30, 41, 59, 0.8);
                    border-radius: 0.25rem;
                    padding: 0.25rem 0.375rem;
                    min-width: 24px;
                    text-align: center;
                }
                .countdown-compact__sep {
                    color: #64748b;
                    opacity: 0.5;
                }

                @media (max-width: 768px) {
                    .sticky-cta__label { display: none; }
                }
                "#}
            </style>
        </div>
    }
}
