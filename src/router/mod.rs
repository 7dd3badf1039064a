//! Navigation state machine
//!
//! Maps a location fragment to a named route, produces that route's content
//! through a uniform handler signature, and drives the transition side
//! effects (loading indicator, title, content swap, active-nav highlight,
//! post-render hook) against a pluggable [`RenderTarget`].
//!
//! Content production can redirect (`dashboard` without a session lands on
//! `get-started`) and can fail; failures are swallowed into a generic error
//! view and never propagate out of [`Router::navigate`].

pub mod views;

use crate::session::SessionManager;
use crate::storage::StorageError;
use crate::users::UserStore;
use std::collections::HashMap;
use thiserror::Error;

/// Named routes, keyed 1:1 by location fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Work,
    Events,
    Contact,
    GetStarted,
    Dashboard,
}

impl Route {
    /// All routes, in nav order
    pub fn all() -> &'static [Route] {
        &[
            Route::Home,
            Route::About,
            Route::Work,
            Route::Events,
            Route::Contact,
            Route::GetStarted,
            Route::Dashboard,
        ]
    }

    /// The fragment identifier for this route
    pub fn fragment(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::About => "about",
            Route::Work => "work",
            Route::Events => "events",
            Route::Contact => "contact",
            Route::GetStarted => "get-started",
            Route::Dashboard => "dashboard",
        }
    }

    /// Resolve a fragment; empty or unknown fragments fall back to home
    pub fn from_fragment(fragment: &str) -> Route {
        let fragment = fragment.trim_start_matches('#');
        Route::all()
            .iter()
            .copied()
            .find(|r| r.fragment() == fragment)
            .unwrap_or(Route::Home)
    }

    /// The intercepted-click path: only targets starting with the fragment
    /// marker are converted into navigation
    pub fn from_href(href: &str) -> Option<Route> {
        href.strip_prefix('#').map(Route::from_fragment)
    }

    /// Document title while this route is active
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "MindTrack - Home",
            Route::About => "MindTrack - About Us",
            Route::Work => "MindTrack - Work With Us",
            Route::Events => "MindTrack - Events",
            Route::Contact => "MindTrack - Contact Us",
            Route::GetStarted => "MindTrack - Get Started",
            Route::Dashboard => "MindTrack - Dashboard",
        }
    }
}

/// Errors raised while producing a route's content
///
/// Never visible to the caller of the state machine; the router replaces
/// failed content with a generic error view.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to produce content: {0}")]
    Render(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Rendered content for one route
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: String,
    pub body: String,
}

/// What a handler produced: content, or a redirect to another route
#[derive(Debug, Clone, PartialEq)]
pub enum RouteContent {
    View(View),
    Redirect(Route),
}

/// Everything content producers may consult
pub struct RouteContext<'a> {
    pub users: &'a UserStore,
    pub session: &'a SessionManager,
}

/// The route table: route → handler, built once
pub struct RouteTable {
    handlers: HashMap<Route, views::RouteHandler>,
}

impl RouteTable {
    pub fn new() -> Self {
        let handlers = Route::all()
            .iter()
            .map(|&route| (route, views::RouteHandler::for_route(route)))
            .collect();
        Self { handlers }
    }

    fn handler(&self, route: Route) -> &views::RouteHandler {
        // Every route gets a handler at construction
        &self.handlers[&route]
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The seam to the host surface the router renders into
///
/// The container's entire content is replaced on each transition.
pub trait RenderTarget {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn set_title(&mut self, title: &str);
    fn replace_content(&mut self, body: &str);
    fn set_active_nav(&mut self, route: Route);
    /// Route-specific post-render wiring (form listeners, animations)
    fn after_render(&mut self, _route: Route) {}
}

/// Redirect chains are short by construction; this only guards against a
/// future handler wiring mistake becoming an infinite loop.
const MAX_REDIRECTS: usize = 4;

/// The navigation state machine
pub struct Router<'a, T: RenderTarget> {
    table: RouteTable,
    ctx: RouteContext<'a>,
    target: T,
    current: Option<Route>,
}

impl<'a, T: RenderTarget> Router<'a, T> {
    pub fn new(users: &'a UserStore, session: &'a SessionManager, target: T) -> Self {
        Self {
            table: RouteTable::new(),
            ctx: RouteContext { users, session },
            target,
            current: None,
        }
    }

    /// The route currently rendered, if any transition has happened
    pub fn current(&self) -> Option<Route> {
        self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Drive a transition for a fragment change
    ///
    /// Re-navigating to the current route is a no-op (guards redundant
    /// re-renders). Never returns an error; content failures render the
    /// generic error view instead.
    pub fn navigate(&mut self, fragment: &str) {
        let route = Route::from_fragment(fragment);
        if self.current == Some(route) {
            return;
        }

        tracing::debug!("Navigating to {:?}", route);
        self.target.show_loading();

        let (landed, view) = self.produce(route);
        self.target.replace_content(&view.body);
        self.target.set_title(&view.title);
        self.current = Some(landed);
        self.target.set_active_nav(landed);
        self.target.after_render(landed);

        self.target.hide_loading();
    }

    /// Intercept an in-page link click; returns whether it was handled
    pub fn handle_link(&mut self, href: &str) -> bool {
        match Route::from_href(href) {
            Some(route) => {
                self.navigate(route.fragment());
                true
            }
            None => false,
        }
    }

    /// Produce content for a route, following redirects, recovering errors
    fn produce(&self, mut route: Route) -> (Route, View) {
        for _ in 0..MAX_REDIRECTS {
            match self.table.handler(route).render(route, &self.ctx) {
                Ok(RouteContent::View(view)) => return (route, view),
                Ok(RouteContent::Redirect(next)) => {
                    tracing::debug!("Route {:?} redirected to {:?}", route, next);
                    route = next;
                }
                Err(e) => {
                    tracing::error!("Error producing content for {:?}: {}", route, e);
                    return (route, views::error_view());
                }
            }
        }

        tracing::error!("Redirect chain from {:?} did not settle", route);
        (route, views::error_view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;
    use crate::storage::{handle, MemoryStore};
    use crate::users::UserStore;

    /// Records every side effect in order
    #[derive(Default)]
    struct RecordingTarget {
        events: Vec<String>,
        content: String,
        title: String,
    }

    impl RenderTarget for RecordingTarget {
        fn show_loading(&mut self) {
            self.events.push("show_loading".into());
        }
        fn hide_loading(&mut self) {
            self.events.push("hide_loading".into());
        }
        fn set_title(&mut self, title: &str) {
            self.events.push(format!("title:{title}"));
            self.title = title.to_string();
        }
        fn replace_content(&mut self, body: &str) {
            self.events.push("content".into());
            self.content = body.to_string();
        }
        fn set_active_nav(&mut self, route: Route) {
            self.events.push(format!("nav:{}", route.fragment()));
        }
        fn after_render(&mut self, route: Route) {
            self.events.push(format!("after:{}", route.fragment()));
        }
    }

    fn setup() -> (UserStore, SessionManager) {
        let durable = handle(MemoryStore::new());
        let users = UserStore::new(durable.clone());
        let manager = SessionManager::new(users.clone(), durable, handle(MemoryStore::new()));
        (users, manager)
    }

    fn logged_in_setup() -> (UserStore, SessionManager) {
        let (users, manager) = setup();
        manager
            .register(&crate::users::tests::profile("ada@example.com"))
            .unwrap();
        (users, manager)
    }

    #[test]
    fn test_unknown_fragment_falls_back_to_home() {
        assert_eq!(Route::from_fragment("no-such-page"), Route::Home);
        assert_eq!(Route::from_fragment(""), Route::Home);
        assert_eq!(Route::from_fragment("#about"), Route::About);
    }

    #[test]
    fn test_from_href_requires_fragment_marker() {
        assert_eq!(Route::from_href("#dashboard"), Some(Route::Dashboard));
        assert_eq!(Route::from_href("https://example.com"), None);
        assert_eq!(Route::from_href("about"), None);
    }

    #[test]
    fn test_transition_side_effect_order() {
        let (users, manager) = setup();
        let mut router = Router::new(&users, &manager, RecordingTarget::default());

        router.navigate("about");
        assert_eq!(router.current(), Some(Route::About));
        assert_eq!(
            router.target().events,
            vec![
                "show_loading",
                "content",
                "title:MindTrack - About Us",
                "nav:about",
                "after:about",
                "hide_loading",
            ]
        );
    }

    #[test]
    fn test_same_route_is_a_no_op() {
        let (users, manager) = setup();
        let mut router = Router::new(&users, &manager, RecordingTarget::default());

        router.navigate("about");
        let events_after_first = router.target().events.len();
        router.navigate("about");
        assert_eq!(router.target().events.len(), events_after_first);

        router.navigate("#about"); // marker included, still the same route
        assert_eq!(router.target().events.len(), events_after_first);
    }

    #[test]
    fn test_dashboard_without_session_redirects() {
        let (users, manager) = setup();
        let mut router = Router::new(&users, &manager, RecordingTarget::default());

        router.navigate("dashboard");
        assert_eq!(router.current(), Some(Route::GetStarted));
        assert_eq!(router.target().title, Route::GetStarted.title());
        assert!(router.target().content.contains("Create Your Account"));
    }

    #[test]
    fn test_get_started_with_session_shows_logged_in_branch() {
        let (users, manager) = logged_in_setup();
        let mut router = Router::new(&users, &manager, RecordingTarget::default());

        router.navigate("get-started");
        assert_eq!(router.current(), Some(Route::GetStarted));
        assert!(router.target().content.contains("already logged in"));
        assert!(!router.target().content.contains("Create Your Account"));
    }

    #[test]
    fn test_dashboard_with_session_renders_dashboard() {
        let (users, manager) = logged_in_setup();
        let mut router = Router::new(&users, &manager, RecordingTarget::default());

        router.navigate("dashboard");
        assert_eq!(router.current(), Some(Route::Dashboard));
        assert!(router.target().content.contains("Ada Lovelace"));
        assert!(router.target().content.contains("Tracking Streak"));
    }

    #[test]
    fn test_handle_link_navigates_only_fragments() {
        let (users, manager) = setup();
        let mut router = Router::new(&users, &manager, RecordingTarget::default());

        assert!(!router.handle_link("https://example.com/about"));
        assert_eq!(router.current(), None);

        assert!(router.handle_link("#events"));
        assert_eq!(router.current(), Some(Route::Events));
    }
}
