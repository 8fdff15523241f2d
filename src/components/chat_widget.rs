use std::rc::Rc;

use web_sys::{Element, MouseEvent};
use yew::prelude::*;

use crate::chat::script::{ChatScript, CustomMessages};
use crate::chat::session::{ChatScheduler, ChatSession};
use crate::config::{ChatTimings, NOTIFICATION_SOUND_URL, NOTIFICATION_VOLUME, WHATSAPP_URL};
use crate::events::{EventBus, OPEN_CHAT_WIDGET};
use crate::notifier::AudioNotifier;
use crate::theme::Theme;
use crate::timing::random::SeededRandom;
use crate::timing::scheduler::BrowserScheduler;

#[derive(Properties, PartialEq)]
pub struct ChatWidgetProps {
    pub mentor_name: AttrValue,
    #[prop_or_default]
    pub mentor_image: Option<AttrValue>,
    #[prop_or_default]
    pub custom_messages: Option<CustomMessages>,
    pub theme: Theme,
    /// Lifts the widget above the sticky checkout bar.
    #[prop_or_default]
    pub raised: bool,
}

fn build_chat(custom: &Option<CustomMessages>) -> ChatScheduler {
    ChatScheduler::new(
        ChatScript::with_custom(custom.as_ref()),
        ChatTimings::default(),
        Rc::new(BrowserScheduler::new()),
        Box::new(SeededRandom::from_entropy()),
        Rc::new(AudioNotifier::new(NOTIFICATION_SOUND_URL, NOTIFICATION_VOLUME)),
    )
}

#[function_component(ChatWidget)]
pub fn chat_widget(props: &ChatWidgetProps) -> Html {
    let bus = use_context::<EventBus>();
    let session = use_state(ChatSession::default);
    let body_ref = use_node_ref();
    let chat = use_memo(build_chat, props.custom_messages.clone());
    let owner = chat.owner();

    {
        let chat = chat.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |_| {
                let listener_session = session.clone();
                chat.set_listener(move |snapshot: &ChatSession| {
                    listener_session.set(snapshot.clone());
                });
                session.set(chat.snapshot());

                let subscription = bus.map(|bus| {
                    let chat = chat.clone();
                    bus.subscribe(OPEN_CHAT_WIDGET, move || chat.open())
                });

                move || {
                    drop(subscription);
                    chat.shutdown();
                }
            },
            owner,
        );
    }

    {
        // Keep the newest message in view.
        let body_ref = body_ref.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(body) = body_ref.cast::<Element>() {
                    body.set_scroll_top(body.scroll_height());
                }
                || ()
            },
            (session.messages.len(), session.is_typing),
        );
    }

    let toggle = {
        let chat = chat.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            chat.toggle();
        })
    };

    let close = {
        let chat = chat.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            chat.close();
        })
    };

    let ui = &chat.script().ui;

    html! {
        <div class={classes!("chat-widget", props.theme.class(), props.raised.then(|| "chat-widget--raised"))}>
            {
                if session.is_open {
                    html! {
                        <div class="chat-panel">
                            <div class="chat-panel__header">
                                <div class="chat-panel__identity">
                                    <div class="chat-panel__avatar">
                                        {
                                            match &props.mentor_image {
                                                Some(src) => html! { <img src={src.clone()} alt={props.mentor_name.clone()} /> },
                                                None => html! { <span class="chat-panel__initial">{props.mentor_name.chars().next().unwrap_or('?').to_string()}</span> },
                                            }
                                        }
                                        <span class="chat-panel__status-dot"></span>
                                    </div>
                                    <div>
                                        <h3>{props.mentor_name.to_string()}</h3>
                                        <p>{&ui.status_online}</p>
                                    </div>
                                </div>
                                <button class="chat-panel__close" onclick={close}>{"✕"}</button>
                            </div>

                            <div class="chat-panel__body" ref={body_ref}>
                                { for session.messages.iter().enumerate().map(|(i, message)| html! {
                                    <div key={i} class="chat-bubble">{message}</div>
                                }) }
                                {
                                    if session.is_typing {
                                        html! {
                                            <div class="chat-typing">
                                                <span class="chat-typing__dot"></span>
                                                <span class="chat-typing__dot"></span>
                                                <span class="chat-typing__dot"></span>
                                                <span>{format!("{} {}", props.mentor_name, ui.typing_suffix)}</span>
                                            </div>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </div>

                            <div class="chat-panel__footer">
                                <a href={WHATSAPP_URL} target="_blank" rel="noopener noreferrer" class="chat-panel__cta">
                                    <span>{&ui.cta_button}</span>
                                    <span class="arrow">{"→"}</span>
                                </a>
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            <button class="chat-launcher" onclick={toggle}>
                { if session.is_open { "✕" } else { "💬" } }
            </button>
            <style>
                {r#"
                .chat-widget.theme-cyan { --accent-border: rgba(6, 182, 212, 0.3); --accent-strong: #0891b2; }
                .chat-widget.theme-purple { --accent-border: rgba(168, 85, 247, 0.3); --accent-strong: #9333ea; }
                .chat-widget {
                    position: fixed;
                    right: 2rem;
                    bottom: 2rem;
                    z-index: 60;
                    display: flex;
                    flex-direction: column;
                    align-items: flex-end;
                    gap: 1rem;
                    transition: bottom 0.3s ease;
                }
                .chat-widget--raised { bottom: 6rem; }
                .chat-panel {
                    width: 20rem;
                    background: #0f172a;
                    border: 1px solid var(--accent-border);
                    border-radius: 1rem;
                    overflow: hidden;
                    box-shadow: 0 16px 32px rgba(0, 0, 0, 0.4);
                    animation: fadeIn 0.2s ease-out;
                }
                @keyframes fadeIn {
                    from { opacity: 0; transform: scale(0.9); }
                    to { opacity: 1; transform: scale(1); }
                }
                .chat-panel__header {
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    padding: 1rem;
                    background: var(--accent-strong);
                }
                .chat-panel__identity {
                    display: flex;
                    align-items: center;
                    gap: 0.75rem;
                }
                .chat-panel__identity h3 { margin: 0; font-size: 0.875rem; }
                .chat-panel__identity p { margin: 0; font-size: 0.75rem; opacity: 0.8; }
                .chat-panel__avatar {
                    position: relative;
                    width: 2.5rem;
                    height: 2.5rem;
                }
                .chat-panel__avatar img,
                .chat-panel__initial {
                    width: 100%;
                    height: 100%;
                    border-radius: 50%;
                    object-fit: cover;
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    background: rgba(255, 255, 255, 0.2);
                }
                .chat-panel__status-dot {
                    position: absolute;
                    right: 0;
                    bottom: 0;
                    width: 0.75rem;
                    height: 0.75rem;
                    border-radius: 50%;
                    background: #4ade80;
                    border: 2px solid var(--accent-strong);
                }
                .chat-panel__close {
                    background: none;
                    border: none;
                    color: rgba(255, 255, 255, 0.8);
                    cursor: pointer;
                    font-size: 1rem;
                }
                .chat-panel__body {
                    height: 300px;
                    overflow-y: auto;
                    padding: 1rem;
                    display: flex;
                    flex-direction: column;
                    gap: 1rem;
                    background: rgba(15, 23, 42, 0.5);
                    scroll-behavior: smooth;
                }
                .chat-bubble {
                    align-self: flex-start;
                    background: #1e293b;
                    color: #e2e8f0;
                    padding: 0.75rem;
                    border-radius: 1rem;
                    border-top-left-radius: 0;
                    font-size: 0.875rem;
                    line-height: 1.5;
                }
                .chat-typing {
                    display: flex;
                    align-items: center;
                    gap: 0.375rem;
                    font-size: 0.75rem;
                    color: #64748b;
                    font-style: italic;
                }
                .chat-typing__dot {
                    width: 6px;
                    height: 6px;
                    border-radius: 50%;
                    background: #64748b;
                    animation: bounce 1s infinite;
                }
                .chat-typing__dot:nth-child(2) { animation-delay: 0.15s; }
                .chat-typing__dot:nth-child(3) { animation-delay: 0.3s; }
                @keyframes bounce {
                    0%, 100% { transform: translateY(0); }
                    50% { transform: translateY(-4px); }
                }
                .chat-panel__footer {
                    padding: 1rem;
                    border-top: 1px solid rgba(255, 255, 255, 0.05);
                }
                .chat-panel__cta {
                    display: flex;
                    justify-content: center;
                    gap: 0.5rem;
                    padding: 0.75rem;
                    border-radius: 0.75rem;
                    background: var(--accent-strong);
                    color: #fff;
                    font-weight: 700;
                    text-decoration: none;
                }
                .chat-launcher {
                    width: 4rem;
                    height: 4rem;
                    border-radius: 50%;
                    border: 4px solid #020617;
                    background: var(--accent-strong);
                    color: #fff;
                    font-size: 1.75rem;
                    cursor: pointer;
                    box-shadow: 0 0 30px var(--accent-border);
                }

                @media (max-width: 768px) {
                    .chat-widget { right: 1rem; bottom: 1rem; }
                    .chat-widget--raised { bottom: 7rem; }
                    .chat-panel { width: calc(100vw - 2rem); }
                }
                "#}
            </style>
        </div>
    }
}
