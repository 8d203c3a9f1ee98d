use leptos::prelude::*;

use crate::settings::{Theme, Typography};

use super::ThemeContext;

#[component]
pub fn CustomizationPanel() -> impl IntoView {
    let theme = expect_context::<ThemeContext>();

    let theme_button = move |choice: Theme, label: &'static str| {
        view! {
            <button
                type="button"
                class="px-3 py-1 rounded-full text-sm border transition-colors"
                class=(["bg-violet-600", "text-white", "border-violet-600"], move || theme.active() == choice)
                class=(["border-gray-300", "dark:border-gray-700"], move || theme.active() != choice)
                aria-pressed=move || (theme.active() == choice).to_string()
                on:click=move |_| theme.choose(choice)
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="flex flex-wrap items-center justify-center gap-4 text-sm">
            <div class="flex items-center gap-2" role="group" aria-label="Color theme">
                {theme_button(Theme::Dark, "Dark")} {theme_button(Theme::Light, "Light")}
            </div>
            <label class="flex items-center gap-2">
                "Typography"
                <select
                    class="px-2 py-1 rounded border border-gray-300 dark:border-gray-700 bg-white dark:bg-gray-800"
                    prop:value=move || theme.typography().as_str()
                    on:change=move |ev| {
                        match event_target_value(&ev).parse::<Typography>() {
                            Ok(t) => theme.set_typography(t),
                            Err(e) => log::warn!("{e}"),
                        }
                    }
                >
                    {Typography::ALL
                        .into_iter()
                        .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                        .collect_view()}
                </select>
            </label>
        </div>
    }
}
