use std::rc::Rc;

use gloo_timers::callback::Interval;
use yew::prelude::*;

use crate::countdown::Countdown;
use crate::storage::{BrowserStorage, LocalStorage};
use crate::theme::Theme;
use crate::timing::clock::SystemClock;

#[derive(Properties, PartialEq)]
pub struct CountdownTimerProps {
    pub countdown_key: AttrValue,
    pub theme: Theme,
    #[prop_or_default]
    pub compact: bool,
}

fn start(key: &str) -> Countdown {
    Countdown::initialize(
        key,
        Rc::new(BrowserStorage::new(LocalStorage)),
        Rc::new(SystemClock),
    )
}

#[function_component(CountdownTimer)]
pub fn countdown_timer(props: &CountdownTimerProps) -> Html {
    let countdown = {
        let key = props.countdown_key.clone();
        use_mut_ref(move || start(&key))
    };
    let remaining = {
        let countdown = countdown.clone();
        use_state(move || countdown.borrow().remaining())
    };

    {
        let remaining = remaining.clone();
        use_effect_with_deps(
            move |key: &AttrValue| {
                if countdown.borrow().key() != key.as_str() {
                    *countdown.borrow_mut() = start(key);
                    remaining.set(countdown.borrow().remaining());
                }

                let interval = Interval::new(1_000, move || {
                    let next = countdown.borrow_mut().tick();
                    remaining.set(next);
                });

                move || drop(interval)
            },
            props.countdown_key.clone(),
        );
    }

    let [hours, minutes, seconds] = remaining.padded();

    if props.compact {
        return html! {
            <div class={classes!("countdown-compact", props.theme.class())}>
                <div class="countdown-compact__cell">{hours}</div>
                <span class="countdown-compact__sep">{":"}</span>
                <div class="countdown-compact__cell">{minutes}</div>
                <span class="countdown-compact__sep">{":"}</span>
                <div class="countdown-compact__cell">{seconds}</div>
            </div>
        };
    }

    html! {
        <div class={classes!("countdown", props.theme.class())}>
            <div class="countdown__block">
                <div class="countdown__value">{hours}</div>
                <div class="countdown__label">{"Horas"}</div>
            </div>
            <span class="countdown__sep">{":"}</span>
            <div class="countdown__block">
                <div class="countdown__value">{minutes}</div>
                <div class="countdown__label">{"Min"}</div>
            </div>
            <span class="countdown__sep">{":"}</span>
            <div class="countdown__block">
                <div class="countdown__value">{seconds}</div>
                <div class="countdown__label">{"Seg"}</div>
            </div>
        </div>
    }
}
