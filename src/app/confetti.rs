use std::time::Duration;

use leptos::{ev, html, prelude::*};
use leptos_use::{
    use_media_query, use_raf_fn_with_options, utils::Pausable, UseRafFnCallbackArgs,
    UseRafFnOptions,
};

use crate::confetti::{ConfettiBurst, ConfettiConfig};

use super::browser;

/// Full-viewport canvas that fires a burst each time `trigger` changes.
#[component]
pub fn Confetti(
    #[prop(into)] trigger: Signal<u32>,
    #[prop(optional)] config: Option<ConfettiConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let canvas_ref = NodeRef::<html::Canvas>::new();
    let reduced_motion = use_media_query("(prefers-reduced-motion: reduce)");
    let burst = StoredValue::new(None::<ConfettiBurst>);
    let running = RwSignal::new(false);

    let Pausable { pause, resume, .. } = use_raf_fn_with_options(
        move |args: UseRafFnCallbackArgs| {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let delta = Duration::from_secs_f64(args.delta.max(0.0) / 1000.0);
            let alive = burst
                .try_update_value(|b| match b {
                    Some(b) => {
                        let alive = b.advance(delta);
                        browser::draw_confetti(&canvas, b);
                        alive
                    }
                    None => false,
                })
                .unwrap_or(false);
            if !alive {
                burst.set_value(None);
                browser::clear_canvas(&canvas);
                running.set(false);
            }
        },
        UseRafFnOptions::default().immediate(false),
    );

    Effect::new(move |_| {
        if running.get() {
            resume();
        } else {
            pause();
        }
    });

    Effect::watch(
        move || trigger.get(),
        move |count, _, _| {
            if *count == 0 {
                return;
            }
            if reduced_motion.get_untracked() {
                log::debug!("reduced motion preferred, skipping confetti");
                return;
            }
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let size = browser::viewport();
            browser::size_canvas(&canvas, size);
            burst.set_value(Some(ConfettiBurst::new(
                &config,
                size.0,
                size.1,
                &mut browser::random,
            )));
            running.set(true);
        },
        false,
    );

    let resize_handle = window_event_listener(ev::resize, move |_| {
        if !running.get_untracked() {
            return;
        }
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let size = browser::viewport();
        browser::size_canvas(&canvas, size);
        burst.update_value(|b| {
            if let Some(b) = b {
                b.resize(size.0, size.1);
            }
        });
    });
    on_cleanup(move || resize_handle.remove());

    view! {
        <canvas
            node_ref=canvas_ref
            class="fixed inset-0 pointer-events-none z-[70]"
            aria-hidden="true"
        />
    }
}
