mod blog;
mod browser;
mod confetti;
mod contact;
mod customization;
mod header;
mod homepage;
mod projects;
mod reveal;

use blog::BlogPost;
use contact::ContactPage;
use customization::CustomizationPanel;
use header::{Header, SectionNavigator};
use homepage::HomePage;
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{components::*, path};
use leptos_use::use_preferred_dark;
use projects::ProjectDetails;
use reveal::RevealRegistry;

#[cfg(not(feature = "hydrate"))]
use crate::settings::MemoryStore;
use crate::settings::{SettingChange, Settings, Theme, ThemeState, Typography};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <meta name="color-scheme" content="light dark" />
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico" />
                <link rel="stylesheet" id="leptos" href="/pkg/honey-portfolio.css" />
                <MetaTags />
            </head>
            <body class="font-sans bg-white text-gray-900 dark:bg-gray-950 dark:text-gray-100 transition-colors">
                <App />
            </body>
        </html>
    }
}

/// Active theme and typography, backed by persisted [`Settings`].
#[derive(Clone, Copy)]
pub struct ThemeContext {
    state: RwSignal<ThemeState>,
    typography: RwSignal<Typography>,
    settings: StoredValue<Settings>,
}

impl ThemeContext {
    fn new(settings: Settings) -> Self {
        // SSR and first client render agree on this; stored values load after hydration
        let state = RwSignal::new(ThemeState::new(None, false));
        let typography = RwSignal::new(Typography::default());
        let listener = settings.subscribe(move |change| match change {
            SettingChange::Theme(theme) => state.update(|s| s.choose(theme)),
            SettingChange::Typography(t) => typography.set(t),
        });
        let settings = StoredValue::new(settings);
        on_cleanup(move || {
            settings.try_with_value(|s| s.unsubscribe(listener));
        });
        Self {
            state,
            typography,
            settings,
        }
    }

    fn restore(&self) {
        let Some((preference, typography)) = self
            .settings
            .try_with_value(|s| (s.theme_preference(), s.typography()))
        else {
            return;
        };
        self.state.update(|s| s.restore(preference));
        self.typography.set(typography);
    }

    fn system_changed(&self, dark: bool) {
        self.state.update(|s| {
            if s.system_changed(dark) {
                log::debug!("following system theme: {}", s.active());
            }
        });
    }

    pub fn active(&self) -> Theme {
        self.state.with(ThemeState::active)
    }

    pub fn typography(&self) -> Typography {
        self.typography.get()
    }

    pub fn toggle(&self) {
        let next = self.state.with_untracked(|s| s.active().toggled());
        self.choose(next);
    }

    pub fn choose(&self, theme: Theme) {
        self.settings.with_value(|s| s.set_theme(theme));
    }

    pub fn set_typography(&self, typography: Typography) {
        self.settings.with_value(|s| s.set_typography(typography));
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    #[cfg(feature = "hydrate")]
    let settings = Settings::new(browser::LocalStorageStore::new());
    #[cfg(not(feature = "hydrate"))]
    let settings = Settings::new(MemoryStore::default());

    let theme = ThemeContext::new(settings);
    provide_context(theme);
    Effect::watch(|| (), move |_, _, _| theme.restore(), true);
    let prefers_dark = use_preferred_dark();
    Effect::watch(
        move || prefers_dark.get(),
        move |dark, _, _| theme.system_changed(*dark),
        true,
    );
    Effect::new(move |_| browser::apply_theme(theme.active()));
    Effect::new(move |_| browser::apply_typography(theme.typography()));

    provide_context(RevealRegistry::new(browser::observer_supported()));

    let navigator = SectionNavigator::new();
    provide_context(navigator);
    on_cleanup(move || navigator.cancel_pending());

    view! {
        <Title formatter=|title| format!("{title} | Honey") />

        <Router>
            <Header />
            <main class="pt-16 min-h-screen">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/projects/:slug") view=ProjectDetails />
                    <Route path=path!("/blog/:slug") view=BlogPost />
                    <Route path=path!("/contact") view=ContactPage />
                </Routes>
            </main>
            <Footer />
        </Router>
    }
}

#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer class="py-10 px-4 border-t border-gray-200 dark:border-gray-800">
            <div class="max-w-5xl mx-auto flex flex-col items-center gap-6">
                <CustomizationPanel />
                <p class="text-sm text-gray-500">
                    {format!("© {} Honey. Built with Leptos and Tailwind CSS.", env!("BUILD_YEAR"))}
                </p>
            </div>
        </footer>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    #[cfg(feature = "ssr")]
    {
        if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
            response.set_status(http::StatusCode::NOT_FOUND);
        }
    }

    view! {
        <Title text="Not Found" />
        <div class="max-w-xl mx-auto px-4 py-24 text-center">
            <h1 class="text-5xl font-bold mb-4">"404"</h1>
            <p class="text-gray-600 dark:text-gray-300 mb-8">
                "That page wandered off. Let's get you back on track."
            </p>
            <a
                href="/"
                class="px-6 py-3 rounded-full bg-violet-600 text-white font-semibold hover:bg-violet-700 transition-colors"
            >
                "Go home"
            </a>
        </div>
    }
}
