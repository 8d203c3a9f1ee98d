use crate::wait::RetryPolicy;

/// Scroll distance past which the header switches to its compact form.
pub const SCROLLED_THRESHOLD: f64 = 20.0;
/// Added to `scrollY` before section lookup, roughly the fixed header height.
pub const LOOK_AHEAD_OFFSET: f64 = 100.0;
/// Gap left above a section after navigating to it.
pub const HEADER_OFFSET: f64 = 80.0;

/// Scan order for the active-section lookup.
pub const SECTION_IDS: [&str; 4] = ["about", "projects", "skills", "contact-form"];

pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionExtent {
    pub offset_top: f64,
    pub height: f64,
}

impl SectionExtent {
    pub fn new(offset_top: f64, height: f64) -> Self {
        Self { offset_top, height }
    }

    pub fn contains(&self, y: f64) -> bool {
        y >= self.offset_top && y < self.offset_top + self.height
    }
}

/// Where each known section currently sits on the page.
pub trait SectionLayout {
    fn extent(&self, id: &str) -> Option<SectionExtent>;
}

impl<F> SectionLayout for F
where
    F: Fn(&str) -> Option<SectionExtent>,
{
    fn extent(&self, id: &str) -> Option<SectionExtent> {
        self(id)
    }
}

pub fn is_scrolled(scroll_y: f64) -> bool {
    scroll_y > SCROLLED_THRESHOLD
}

/// First section in `sections` order whose extent contains
/// `scroll_y + LOOK_AHEAD_OFFSET`. Sections missing from the layout are skipped.
pub fn active_section<'a>(
    sections: &'a [String],
    layout: &impl SectionLayout,
    scroll_y: f64,
) -> Option<&'a str> {
    let probe = scroll_y + LOOK_AHEAD_OFFSET;
    sections
        .iter()
        .find(|id| layout.extent(id).is_some_and(|e| e.contains(probe)))
        .map(String::as_str)
}

/// Window scroll position that puts an element's top `HEADER_OFFSET` below
/// the viewport top. `rect_top` is relative to the viewport.
pub fn section_scroll_top(rect_top: f64, page_y_offset: f64) -> f64 {
    rect_top + page_y_offset - HEADER_OFFSET
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Toggle,
    Navigate,
    OutsideInteraction,
}

impl MenuState {
    pub fn on(self, event: MenuEvent) -> Self {
        match (self, event) {
            (Self::Closed, MenuEvent::Toggle) => Self::Open,
            (Self::Open, MenuEvent::Toggle) => Self::Closed,
            (_, MenuEvent::Navigate) => Self::Closed,
            (Self::Open, MenuEvent::OutsideInteraction) => Self::Closed,
            (Self::Closed, MenuEvent::OutsideInteraction) => Self::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// The outside-interaction listener only exists while the menu is open.
    pub fn wants_outside_listener(self) -> bool {
        self.is_open()
    }
}

/// Coalesces bursts of scroll events into one recompute per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameThrottle {
    ticking: bool,
}

impl FrameThrottle {
    /// True when the caller should schedule a frame.
    pub fn request(&mut self) -> bool {
        if self.ticking {
            return false;
        }
        self.ticking = true;
        true
    }

    pub fn complete(&mut self) {
        self.ticking = false;
    }

    pub fn is_pending(&self) -> bool {
        self.ticking
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub scrolled: bool,
    pub active_section: Option<String>,
    pub menu: MenuState,
    pub navigating: bool,
}

/// How to reach a section from where the user currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionNavigation {
    /// Target is on screen already, scroll to it now.
    ScrollNow,
    /// On the home page but the target has not mounted yet.
    AwaitMount(RetryPolicy),
    /// Route to `href` first, then look for the target.
    ChangeRoute { href: String, retry: RetryPolicy },
}

pub fn plan_section_navigation(pathname: &str, id: &str, target_mounted: bool) -> SectionNavigation {
    if pathname != HOME_PATH {
        SectionNavigation::ChangeRoute {
            href: format!("{HOME_PATH}#{id}"),
            retry: RetryPolicy::after_route_change(),
        }
    } else if target_mounted {
        SectionNavigation::ScrollNow
    } else {
        SectionNavigation::AwaitMount(RetryPolicy::late_mount())
    }
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    sections: Vec<String>,
    state: NavigationState,
    throttle: FrameThrottle,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(SECTION_IDS)
    }
}

impl NavigationController {
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            state: NavigationState::default(),
            throttle: FrameThrottle::default(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn is_known_section(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s == id)
    }

    /// Raw scroll event. Returns true when a frame should be scheduled.
    pub fn scroll_event(&mut self) -> bool {
        self.throttle.request()
    }

    /// The scheduled frame: recompute from the current position.
    pub fn frame(&mut self, scroll_y: f64, layout: &impl SectionLayout) {
        self.throttle.complete();
        self.recompute(scroll_y, layout);
    }

    pub fn recompute(&mut self, scroll_y: f64, layout: &impl SectionLayout) {
        self.state.scrolled = is_scrolled(scroll_y);
        self.state.active_section =
            active_section(&self.sections, layout, scroll_y).map(str::to_string);
    }

    pub fn menu(&mut self, event: MenuEvent) -> MenuState {
        self.state.menu = self.state.menu.on(event);
        self.state.menu
    }

    pub fn begin_navigation(&mut self) {
        self.state.navigating = true;
    }

    pub fn finish_navigation(&mut self) {
        self.state.navigating = false;
    }

    /// Logo click while already home: back to top with nothing highlighted.
    pub fn go_home(&mut self) {
        self.state.active_section = None;
        self.menu(MenuEvent::Navigate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str) -> Option<SectionExtent> {
        match id {
            "about" => Some(SectionExtent::new(0.0, 500.0)),
            "projects" => Some(SectionExtent::new(500.0, 700.0)),
            "skills" => Some(SectionExtent::new(1200.0, 400.0)),
            _ => None,
        }
    }

    fn active_at(y: f64) -> Option<String> {
        let mut nav = NavigationController::default();
        nav.recompute(y, &page);
        nav.state().active_section.clone()
    }

    #[test]
    fn test_scrolled_threshold() {
        assert!(!is_scrolled(0.0));
        assert!(!is_scrolled(20.0));
        assert!(is_scrolled(20.5));
        assert!(is_scrolled(21.0));
    }

    #[test]
    fn test_active_section_uses_look_ahead() {
        assert_eq!(active_at(0.0).as_deref(), Some("about"));
        // 450 + 100 = 550 lands in projects
        assert_eq!(active_at(450.0).as_deref(), Some("projects"));
        assert_eq!(active_at(399.0).as_deref(), Some("about"));
        // 400 + 100 == projects.offset_top, the later section wins
        assert_eq!(active_at(400.0).as_deref(), Some("projects"));
        assert_eq!(active_at(1100.0).as_deref(), Some("skills"));
        // past every known section
        assert_eq!(active_at(1500.0), None);
    }

    #[test]
    fn test_active_section_is_recomputed_not_patched() {
        let mut nav = NavigationController::default();
        nav.recompute(450.0, &page);
        assert_eq!(nav.state().active_section.as_deref(), Some("projects"));
        nav.recompute(5000.0, &page);
        assert_eq!(nav.state().active_section, None);
        nav.recompute(450.0, &page);
        let first = nav.state().clone();
        nav.recompute(450.0, &page);
        assert_eq!(nav.state(), &first);
    }

    #[test]
    fn test_active_section_prefers_list_order_on_overlap() {
        let overlapping = |id: &str| match id {
            "about" | "projects" => Some(SectionExtent::new(0.0, 1000.0)),
            _ => None,
        };
        let sections = vec!["projects".to_string(), "about".to_string()];
        assert_eq!(active_section(&sections, &overlapping, 0.0), Some("projects"));
    }

    #[test]
    fn test_scroll_events_are_coalesced_per_frame() {
        let mut nav = NavigationController::default();
        assert!(nav.scroll_event());
        assert!(!nav.scroll_event());
        assert!(!nav.scroll_event());
        nav.frame(30.0, &page);
        assert!(nav.state().scrolled);
        assert!(nav.scroll_event());
    }

    #[test]
    fn test_mobile_menu_transitions() {
        let mut nav = NavigationController::default();
        assert_eq!(nav.state().menu, MenuState::Closed);

        assert_eq!(nav.menu(MenuEvent::Toggle), MenuState::Open);
        assert!(nav.state().menu.wants_outside_listener());
        assert_eq!(nav.menu(MenuEvent::OutsideInteraction), MenuState::Closed);
        assert!(!nav.state().menu.wants_outside_listener());

        nav.menu(MenuEvent::Toggle);
        assert_eq!(nav.menu(MenuEvent::Navigate), MenuState::Closed);

        // outside clicks never open it
        assert_eq!(nav.menu(MenuEvent::OutsideInteraction), MenuState::Closed);
        assert_eq!(nav.menu(MenuEvent::Navigate), MenuState::Closed);

        nav.menu(MenuEvent::Toggle);
        assert_eq!(nav.menu(MenuEvent::Toggle), MenuState::Closed);
    }

    #[test]
    fn test_navigation_plan() {
        assert_eq!(
            plan_section_navigation("/", "skills", true),
            SectionNavigation::ScrollNow
        );
        assert_eq!(
            plan_section_navigation("/", "skills", false),
            SectionNavigation::AwaitMount(RetryPolicy::late_mount())
        );
        // the target of another page is never mounted, whatever the caller says
        assert_eq!(
            plan_section_navigation("/blog/hello", "contact-form", true),
            SectionNavigation::ChangeRoute {
                href: "/#contact-form".to_string(),
                retry: RetryPolicy::after_route_change(),
            }
        );
    }

    #[test]
    fn test_scroll_target_leaves_header_gap() {
        // element 300px below viewport top, page already scrolled 1000px
        assert_eq!(section_scroll_top(300.0, 1000.0), 1220.0);
        assert_eq!(section_scroll_top(80.0, 0.0), 0.0);
    }

    #[test]
    fn test_go_home_clears_highlight_and_menu() {
        let mut nav = NavigationController::default();
        nav.recompute(450.0, &page);
        nav.menu(MenuEvent::Toggle);
        nav.go_home();
        assert_eq!(nav.state().active_section, None);
        assert_eq!(nav.state().menu, MenuState::Closed);
    }

    #[test]
    fn test_navigating_flag() {
        let mut nav = NavigationController::default();
        nav.begin_navigation();
        assert!(nav.state().navigating);
        nav.finish_navigation();
        assert!(!nav.state().navigating);
    }
}
