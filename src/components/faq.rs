use web_sys::MouseEvent;
use yew::prelude::*;

use crate::content::FaqEntry;

#[derive(Properties, PartialEq)]
struct FaqItemProps {
    question: String,
    answer: String,
    is_open: bool,
    on_toggle: Callback<()>,
}

#[function_component(FaqItem)]
fn faq_item(props: &FaqItemProps) -> Html {
    let toggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_toggle.emit(());
        })
    };

    html! {
        <div class={classes!("faq-item", props.is_open.then(|| "open"))}>
            <button class="faq-question" type="button" onclick={toggle}>
                <span class="question-text">{&props.question}</span>
                <span class="toggle-icon">{if props.is_open { "−" } else { "+" }}</span>
            </button>
            {
                if props.is_open {
                    html! { <div class="faq-answer">{&props.answer}</div> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FaqListProps {
    pub entries: Vec<FaqEntry>,
}

/// Accordion where opening one question closes the previous one.
#[function_component(FaqList)]
pub fn faq_list(props: &FaqListProps) -> Html {
    let open_index = use_state(|| None::<usize>);

    html! {
        <div class="faq-list">
            { for props.entries.iter().enumerate().map(|(index, entry)| {
                let on_toggle = {
                    let open_index = open_index.clone();
                    Callback::from(move |_: ()| {
                        let next = if *open_index == Some(index) { None } else { Some(index) };
                        open_index.set(next);
                    })
                };
                html! {
                    <FaqItem
                        key={index}
                        question={entry.question.clone()}
                        answer={entry.answer.clone()}
                        is_open={*open_index == Some(index)}
                        {on_toggle}
                    />
                }
            }) }
        </div>
    }
}
