use std::sync::{Arc, Mutex};

use leptos::{html, prelude::*};
use leptos_use::{
    use_intersection_observer_with_options, UseIntersectionObserverOptions,
    UseIntersectionObserverReturn,
};

use crate::reveal::{
    IntersectionSample, RegionId, RevealController, RevealOptions, RevealPhase, RevealTransition,
    RootMargin, Threshold,
};

use super::browser;

/// Page-wide handle on the reveal controller, shared through context.
#[derive(Clone, Copy)]
pub struct RevealRegistry(StoredValue<Arc<Mutex<RevealController>>>);

impl RevealRegistry {
    pub fn new(observer_supported: bool) -> Self {
        if !observer_supported {
            log::info!("IntersectionObserver unavailable, revealing all content");
        }
        Self(StoredValue::new(Arc::new(Mutex::new(RevealController::new(
            observer_supported,
        )))))
    }

    fn with<T>(&self, f: impl FnOnce(&mut RevealController) -> T) -> Option<T> {
        self.0.try_with_value(|c| {
            let mut controller = c.lock().expect("should be able to lock reveal controller");
            f(&mut controller)
        })
    }

    fn attach(&self, options: RevealOptions) -> Option<RegionId> {
        self.with(|c| c.attach(options))
    }

    fn observe(&self, id: RegionId, sample: IntersectionSample, children: usize) -> Option<RevealTransition> {
        self.with(|c| c.observe(id, sample, children)).flatten()
    }

    fn is_revealed(&self, id: RegionId) -> bool {
        self.with(|c| c.is_revealed(id)).unwrap_or(true)
    }

    fn stagger_indices(&self, id: RegionId, children: usize) -> Option<Vec<usize>> {
        self.with(|c| c.stagger_indices(id, children)).flatten()
    }

    fn detach(&self, id: RegionId) {
        self.with(|c| c.detach(id));
    }
}

/// Wraps `children` so they fade in the first time they scroll into view.
#[component]
pub fn Reveal(
    children: Children,
    #[prop(optional, into)] class: String,
    /// Offset each direct child's entry by its position.
    #[prop(optional)]
    stagger: bool,
    #[prop(optional)] threshold: Option<Threshold>,
    #[prop(optional)] root_margin: Option<RootMargin>,
) -> impl IntoView {
    let registry = expect_context::<RevealRegistry>();
    let options = RevealOptions {
        root_margin: root_margin.unwrap_or_default(),
        threshold: threshold.unwrap_or_default(),
        stagger,
    };
    let observer_options = UseIntersectionObserverOptions::default()
        .root_margin(options.root_margin.to_string())
        .thresholds(options.threshold.values().to_vec());
    let region = registry.attach(options);

    let region_ref = NodeRef::<html::Div>::new();
    let (revealed, set_revealed) = signal(region.is_none());

    let reveal = move |indices: Option<Vec<usize>>| {
        if let (Some(indices), Some(el)) = (indices, region_ref.get_untracked()) {
            browser::stagger_children(&el, &indices);
        }
        set_revealed.set(true);
    };

    let UseIntersectionObserverReturn { stop, .. } = use_intersection_observer_with_options(
        region_ref,
        move |entries, _| {
            let Some(id) = region else {
                return;
            };
            let children = region_ref
                .get_untracked()
                .map_or(0, |el| el.child_element_count() as usize);
            for entry in entries {
                let sample = IntersectionSample {
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                };
                if let Some(transition) = registry.observe(id, sample, children) {
                    log::debug!("revealing region {id:?}");
                    reveal(transition.stagger_indices);
                }
            }
        },
        observer_options,
    );

    // regions revealed without an observer callback (no observer support)
    Effect::new(move |_| {
        let (Some(el), Some(id)) = (region_ref.get(), region) else {
            return;
        };
        if !revealed.get_untracked() && registry.is_revealed(id) {
            reveal(registry.stagger_indices(id, el.child_element_count() as usize));
        }
    });

    Effect::new(move |_| {
        if revealed.get() {
            stop();
        }
    });

    on_cleanup(move || {
        if let Some(id) = region {
            registry.detach(id);
        }
    });

    let classes = move || {
        let phase = RevealPhase::from_revealed(revealed.get()).css_class();
        let stagger = if stagger { " reveal-stagger" } else { "" };
        format!("{phase}{stagger} {class}")
    };

    view! {
        <div node_ref=region_ref class=classes>
            {children()}
        </div>
    }
}
