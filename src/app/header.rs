use leptos::{ev, html, prelude::*, task::spawn_local};
use leptos_router::{
    hooks::{use_location, use_navigate},
    NavigateOptions,
};

use crate::{
    content::NAV_ITEMS,
    navigation::{
        plan_section_navigation, MenuEvent, NavigationController, SectionNavigation, HOME_PATH,
    },
    wait::{wait_for, BrowserTimer, Cancellation},
};

use super::{browser, ThemeContext};

/// Owns header navigation state and any in-flight section lookups.
#[derive(Clone, Copy)]
pub struct SectionNavigator {
    nav: RwSignal<NavigationController>,
    cancel: StoredValue<Cancellation>,
}

impl SectionNavigator {
    pub fn new() -> Self {
        Self {
            nav: RwSignal::new(NavigationController::default()),
            cancel: StoredValue::new(Cancellation::new()),
        }
    }

    pub fn state(&self) -> RwSignal<NavigationController> {
        self.nav
    }

    /// Brings section `id` into view from wherever the user is, routing
    /// home first when needed.
    pub fn go(&self, id: &str, pathname: &str, navigate: &impl Fn(&str, NavigateOptions)) {
        let nav = self.nav;
        nav.update(|n| {
            n.menu(MenuEvent::Navigate);
        });
        if !nav.with_untracked(|n| n.is_known_section(id)) {
            log::warn!("navigating to unknown section #{id}");
        }

        let plan = plan_section_navigation(pathname, id, browser::section_top(id).is_some());
        log::debug!("section navigation to #{id}: {plan:?}");
        let retry = match plan {
            SectionNavigation::ScrollNow => {
                if let Some(top) = browser::section_top(id) {
                    browser::smooth_scroll_to(top);
                }
                return;
            }
            SectionNavigation::AwaitMount(retry) => retry,
            SectionNavigation::ChangeRoute { href, retry } => {
                navigate(&href, NavigateOptions::default());
                retry
            }
        };

        nav.update(|n| n.begin_navigation());
        let Some(cancel) = self.cancel.try_get_value() else {
            return;
        };
        let id = id.to_string();
        spawn_local(async move {
            let top = wait_for(retry, &BrowserTimer, &cancel, || browser::section_top(&id)).await;
            if cancel.is_cancelled() {
                return;
            }
            match top {
                Some(top) => browser::smooth_scroll_to(top),
                None => log::debug!("section #{id} never mounted"),
            }
            nav.try_update(|n| n.finish_navigation());
        });
    }

    pub fn cancel_pending(&self) {
        self.cancel.try_with_value(Cancellation::cancel);
    }
}

impl Default for SectionNavigator {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let navigator = expect_context::<SectionNavigator>();
    let theme = expect_context::<ThemeContext>();
    let nav = navigator.state();
    let pathname = use_location().pathname;
    let navigate = use_navigate();
    let menu_ref = NodeRef::<html::Div>::new();
    let toggle_ref = NodeRef::<html::Button>::new();

    let scrolled = Memo::new(move |_| nav.with(|n| n.state().scrolled));
    let active = Memo::new(move |_| nav.with(|n| n.state().active_section.clone()));
    let menu_open = Memo::new(move |_| nav.with(|n| n.state().menu.is_open()));
    let navigating = Memo::new(move |_| nav.with(|n| n.state().navigating));

    // initial position, then at most one recompute per animation frame
    Effect::new(move |_| {
        nav.update(|n| n.recompute(browser::scroll_y(), &browser::DomSections));
    });
    let scroll_handle = window_event_listener(ev::scroll, move |_| {
        let schedule = nav.try_update_untracked(|n| n.scroll_event()).unwrap_or(false);
        if schedule {
            request_animation_frame(move || {
                nav.try_update(|n| n.frame(browser::scroll_y(), &browser::DomSections));
            });
        }
    });
    on_cleanup(move || scroll_handle.remove());

    // outside-interaction listeners only live while the menu is open
    let outside = StoredValue::new_local(Vec::<WindowListenerHandle>::new());
    let close_outside = move |ev: &web_sys::Event| {
        let roots: [Option<web_sys::Element>; 2] = [
            menu_ref.get_untracked().map(Into::into),
            toggle_ref.get_untracked().map(Into::into),
        ];
        if !browser::event_within(ev, &roots) {
            nav.update(|n| {
                n.menu(MenuEvent::OutsideInteraction);
            });
        }
    };
    Effect::new(move |_| {
        if menu_open.get() {
            outside.update_value(|handles| {
                handles.push(window_event_listener(ev::mousedown, move |ev| {
                    close_outside(&ev)
                }));
                handles.push(window_event_listener(ev::touchstart, move |ev| {
                    close_outside(&ev)
                }));
            });
        } else {
            outside.update_value(|handles| handles.drain(..).for_each(WindowListenerHandle::remove));
        }
    });
    on_cleanup(move || {
        outside.try_update_value(|handles| handles.drain(..).for_each(WindowListenerHandle::remove));
    });

    let go = move |id: &'static str| {
        navigator.go(id, &pathname.get_untracked(), &navigate);
    };
    let home_click = move |ev: ev::MouseEvent| {
        if pathname.get_untracked() == HOME_PATH {
            ev.prevent_default();
            browser::smooth_scroll_to(0.0);
            nav.update(|n| n.go_home());
        } else {
            nav.update(|n| {
                n.menu(MenuEvent::Navigate);
            });
        }
    };
    let item_class = move |section: &'static str, base: &'static str| {
        let current = active.with(|a| a.as_deref() == Some(section));
        if current {
            format!("{base} text-violet-600 dark:text-violet-400")
        } else {
            format!("{base} text-gray-600 hover:text-violet-600 dark:text-gray-300 dark:hover:text-violet-400")
        }
    };

    let desktop_items = {
        let go = go.clone();
        NAV_ITEMS
            .iter()
            .map(move |item| {
                let go = go.clone();
                let section = item.section;
                view! {
                    <a
                        href=item.href()
                        class=move || item_class(section, "text-sm font-semibold tracking-wide transition-colors")
                        aria-current=move || active.with(|a| a.as_deref() == Some(section)).then_some("true")
                        on:click=move |ev| {
                            ev.prevent_default();
                            go(section);
                        }
                    >
                        {item.label}
                    </a>
                }
            })
            .collect_view()
    };

    let mobile_items = NAV_ITEMS
        .iter()
        .enumerate()
        .map(move |(i, item)| {
            let go = go.clone();
            let section = item.section;
            view! {
                <a
                    href=item.href()
                    class=move || item_class(section, "block px-4 py-3 rounded-lg font-semibold transition-all")
                    style=format!("transition-delay: {}ms", i * 50)
                    on:click=move |ev| {
                        ev.prevent_default();
                        go(section);
                    }
                >
                    {item.label}
                </a>
            }
        })
        .collect_view();

    view! {
        <div
            class="fixed top-0 left-0 z-[60] h-0.5 bg-violet-500 transition-all duration-300"
            class:w-full=move || navigating.get()
            class:w-0=move || !navigating.get()
            aria-hidden="true"
        />
        <header
            class="fixed top-0 inset-x-0 z-50 transition-all duration-300"
            class=(["bg-white/80", "dark:bg-gray-900/80", "backdrop-blur", "shadow-sm"], move || scrolled.get())
            class:pointer-events-none=move || navigating.get()
        >
            <nav class="mx-auto max-w-6xl px-4 sm:px-6 flex items-center justify-between h-16">
                <a
                    href=HOME_PATH
                    class="text-xl font-bold text-violet-600 dark:text-violet-400"
                    on:click=home_click
                >
                    "Honey"
                </a>
                <div class="hidden md:flex items-center gap-8">{desktop_items}</div>
                <div class="flex items-center gap-2">
                    <button
                        type="button"
                        class="p-2 rounded-full hover:bg-gray-100 dark:hover:bg-gray-800 transition-colors"
                        aria-label=move || format!("Switch to {} theme", theme.active().toggled())
                        on:click=move |_| theme.toggle()
                    >
                        {move || if theme.active().is_dark() { "☀️" } else { "🌙" }}
                    </button>
                    <button
                        node_ref=toggle_ref
                        type="button"
                        class="md:hidden p-2 rounded-lg hover:bg-gray-100 dark:hover:bg-gray-800"
                        aria-label="Toggle navigation menu"
                        aria-expanded=move || menu_open.get().to_string()
                        on:click=move |_| {
                            nav.update(|n| {
                                n.menu(MenuEvent::Toggle);
                            });
                        }
                    >
                        {move || if menu_open.get() { "✕" } else { "☰" }}
                    </button>
                </div>
            </nav>
            <div
                node_ref=menu_ref
                class="md:hidden overflow-hidden transition-all duration-300 bg-white dark:bg-gray-900"
                class=(["max-h-96", "opacity-100"], move || menu_open.get())
                class=(["max-h-0", "opacity-0"], move || !menu_open.get())
            >
                <div class="px-4 py-2 space-y-1">{mobile_items}</div>
            </div>
        </header>
    }
}
