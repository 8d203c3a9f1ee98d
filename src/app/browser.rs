use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, ScrollBehavior, ScrollToOptions,
};

use crate::{
    confetti::ConfettiBurst,
    navigation::{section_scroll_top, SectionExtent, SectionLayout},
    settings::{Theme, Typography},
};

#[cfg(feature = "hydrate")]
pub use local::LocalStorageStore;

/// Section geometry read straight from the rendered document.
pub struct DomSections;

impl SectionLayout for DomSections {
    fn extent(&self, id: &str) -> Option<SectionExtent> {
        let el = document()
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(SectionExtent::new(
            el.offset_top() as f64,
            el.offset_height() as f64,
        ))
    }
}

pub fn scroll_y() -> f64 {
    window().scroll_y().unwrap_or_default()
}

/// Document scroll position that puts section `id` just under the header.
pub fn section_top(id: &str) -> Option<f64> {
    let el = document().get_element_by_id(id)?;
    Some(section_scroll_top(
        el.get_bounding_client_rect().top(),
        scroll_y(),
    ))
}

pub fn smooth_scroll_to(top: f64) {
    let opts = ScrollToOptions::new();
    opts.set_top(top);
    opts.set_behavior(ScrollBehavior::Smooth);
    window().scroll_to_with_scroll_to_options(&opts);
}

pub fn current_href() -> String {
    window().location().href().unwrap_or_default()
}

/// Whether `target` of `ev` sits inside any of `roots`.
pub fn event_within(ev: &web_sys::Event, roots: &[Option<web_sys::Element>]) -> bool {
    let Some(node) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
    else {
        return false;
    };
    roots.iter().flatten().any(|root| root.contains(Some(&node)))
}

/// The server has no viewport to ask, so it renders every region as
/// pending and lets the client decide.
#[cfg(feature = "hydrate")]
pub fn observer_supported() -> bool {
    js_sys::Reflect::has(&window(), &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

#[cfg(not(feature = "hydrate"))]
pub fn observer_supported() -> bool {
    true
}

pub fn stagger_children(el: &web_sys::Element, indices: &[usize]) {
    let children = el.children();
    for (pos, i) in indices.iter().enumerate() {
        let Some(child) = children
            .item(pos as u32)
            .and_then(|c| c.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        if let Err(e) = child.style().set_property("--i", &i.to_string()) {
            log::warn!("couldn't set stagger index: {e:?}");
        }
    }
}

fn root_element() -> Option<HtmlElement> {
    document().document_element()?.dyn_into::<HtmlElement>().ok()
}

pub fn apply_theme(theme: Theme) {
    let Some(root) = root_element() else {
        return;
    };
    let classes = root.class_list();
    let res = if theme.is_dark() {
        classes.add_1("dark")
    } else {
        classes.remove_1("dark")
    };
    if let Err(e) = res.and_then(|_| root.style().set_property("color-scheme", theme.as_str())) {
        log::warn!("couldn't apply {theme} theme: {e:?}");
    }
}

pub fn apply_typography(typography: Typography) {
    let Some(root) = root_element() else {
        return;
    };
    if let Err(e) = root
        .style()
        .set_property("--font-sans", typography.font_stack())
    {
        log::warn!("couldn't apply {typography} typography: {e:?}");
    }
}

pub fn viewport() -> (f64, f64) {
    let w = window();
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or_default();
    (dim(w.inner_width()), dim(w.inner_height()))
}

pub fn random() -> f64 {
    js_sys::Math::random()
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

pub fn size_canvas(canvas: &HtmlCanvasElement, (width, height): (f64, f64)) {
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
}

pub fn clear_canvas(canvas: &HtmlCanvasElement) {
    if let Some(ctx) = context_2d(canvas) {
        ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    }
}

pub fn draw_confetti(canvas: &HtmlCanvasElement, burst: &ConfettiBurst) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let (width, height) = burst.size();
    ctx.clear_rect(0.0, 0.0, width, height);
    for p in burst.particles() {
        ctx.save();
        let _ = ctx.translate(p.x, p.y);
        let _ = ctx.rotate(p.angle);
        ctx.set_fill_style_str(p.color);
        ctx.fill_rect(-p.size / 2.0, -p.size / 2.0, p.size, p.size * 0.6);
        ctx.restore();
    }
}

#[cfg(feature = "hydrate")]
mod local {
    use codee::string::FromToStringCodec;
    use leptos::prelude::*;
    use leptos_use::storage::use_local_storage;

    use crate::settings::{SettingsStore, THEME_KEY, TYPOGRAPHY_KEY};

    type Entry = (Signal<String>, WriteSignal<String>);

    /// Settings persisted in the browser's local storage, one key each.
    pub struct LocalStorageStore {
        theme: Entry,
        typography: Entry,
    }

    impl LocalStorageStore {
        pub fn new() -> Self {
            let (theme, set_theme, _) = use_local_storage::<String, FromToStringCodec>(THEME_KEY);
            let (typography, set_typography, _) =
                use_local_storage::<String, FromToStringCodec>(TYPOGRAPHY_KEY);
            Self {
                theme: (theme, set_theme),
                typography: (typography, set_typography),
            }
        }

        fn entry(&self, key: &str) -> Option<&Entry> {
            match key {
                THEME_KEY => Some(&self.theme),
                TYPOGRAPHY_KEY => Some(&self.typography),
                _ => None,
            }
        }
    }

    impl SettingsStore for LocalStorageStore {
        fn read(&self, key: &str) -> Option<String> {
            let value = self.entry(key)?.0.get_untracked();
            (!value.is_empty()).then_some(value)
        }

        fn write(&self, key: &str, value: &str) {
            match self.entry(key) {
                Some((_, set)) => set.set(value.to_string()),
                None => log::warn!("no storage slot for setting {key}"),
            }
        }
    }
}
