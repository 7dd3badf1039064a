//! Route content producers
//!
//! One handler per route behind a uniform `render` signature. The session-
//! gated routes (`dashboard`, `get-started`) consult the session state and
//! may redirect or branch; everything else returns a fixed page body.

use crate::chart::{self, ChartLayout};
use crate::metrics;
use crate::router::{ContentError, Route, RouteContent, RouteContext, View};
use crate::storage::mood_label;

/// How a route's content gets produced
pub enum RouteHandler {
    /// Fixed page body, no context needed
    Page(fn() -> String),
    /// Auth forms, or the "already logged in" branch
    GetStarted,
    /// The signed-in dashboard; redirects to get-started without a session
    Dashboard,
}

impl RouteHandler {
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Home => RouteHandler::Page(home_body),
            Route::About => RouteHandler::Page(about_body),
            Route::Work => RouteHandler::Page(work_body),
            Route::Events => RouteHandler::Page(events_body),
            Route::Contact => RouteHandler::Page(contact_body),
            Route::GetStarted => RouteHandler::GetStarted,
            Route::Dashboard => RouteHandler::Dashboard,
        }
    }

    /// Produce content for `route` given the navigation context
    pub fn render(&self, route: Route, ctx: &RouteContext) -> Result<RouteContent, ContentError> {
        match self {
            RouteHandler::Page(body) => Ok(RouteContent::View(View {
                title: route.title().to_string(),
                body: body(),
            })),
            RouteHandler::GetStarted => Ok(get_started(ctx)),
            RouteHandler::Dashboard => Ok(dashboard(ctx)),
        }
    }
}

/// Generic error view substituted for any failed content production
pub fn error_view() -> View {
    View {
        title: "MindTrack - Error".to_string(),
        body: "<main class=\"main-container\">\
               <h1>Something went wrong</h1>\
               <p>We couldn't load this page. Please try again.</p>\
               <a href=\"#home\" class=\"nav-link\">Back to home</a>\
               </main>"
            .to_string(),
    }
}

fn get_started(ctx: &RouteContext) -> RouteContent {
    if let Some(user) = ctx.session.current_user() {
        return RouteContent::View(View {
            title: Route::GetStarted.title().to_string(),
            body: format!(
                "<main class=\"main-container\">\
                 <h1>Already Logged In</h1>\
                 <p>{}, you are already logged in! Would you like to go to your dashboard?</p>\
                 <a href=\"#dashboard\" class=\"nav-link\">Go to Dashboard</a>\
                 </main>",
                user.name
            ),
        });
    }

    RouteContent::View(View {
        title: Route::GetStarted.title().to_string(),
        body: "<main class=\"main-container\">\
               <h1>Get Started</h1>\
               <section class=\"auth-form\" id=\"login\">\
               <h3>Welcome Back</h3>\
               <form><input name=\"email\"><input name=\"password\" type=\"password\"></form>\
               </section>\
               <section class=\"auth-form\" id=\"register\">\
               <h3>Create Your Account</h3>\
               <form><input name=\"name\"><input name=\"email\">\
               <input name=\"password\" type=\"password\"></form>\
               </section>\
               </main>"
            .to_string(),
    })
}

fn dashboard(ctx: &RouteContext) -> RouteContent {
    let user = match ctx.session.current_user() {
        Some(user) => user,
        None => return RouteContent::Redirect(Route::GetStarted),
    };
    // Re-read the stored record; the session snapshot predates any ledger
    // writes made since login.
    let user = ctx.users.find_by_id(&user.id).unwrap_or(user);

    let todays = metrics::todays_mood(&user)
        .map(|e| mood_label(e.mood).to_string())
        .unwrap_or_else(|| "Not logged".to_string());
    let weekly = rounded_label(metrics::average_mood(&user, 7));
    let monthly = rounded_label(metrics::average_mood(&user, 30));
    let streak = metrics::tracking_streak(&user);

    let activity: String = metrics::recent_activity(&user, 10)
        .iter()
        .map(|item| format!("<li>{}</li>", item.describe()))
        .collect();

    let chart = chart_svg(&chart::layout(&metrics::chart_series(&user), 400.0, 200.0));

    RouteContent::View(View {
        title: Route::Dashboard.title().to_string(),
        body: format!(
            "<main class=\"main-container dashboard-container\">\
             <h1>Welcome back, {name}!</h1>\
             <section class=\"overview-stats\">\
             <div class=\"stat-card\"><h3>Today's Mood</h3><span>{todays}</span></div>\
             <div class=\"stat-card\"><h3>Weekly Average</h3><span>{weekly}</span></div>\
             <div class=\"stat-card\"><h3>Monthly Average</h3><span>{monthly}</span></div>\
             <div class=\"stat-card\"><h3>Tracking Streak</h3><span>{streak} days</span></div>\
             </section>\
             <section class=\"chart-section\"><h3>Mood Trends (Last 30 Days)</h3>\
             {chart}</section>\
             <section class=\"recent-activity\"><h3>Recent Activity</h3>\
             <ul>{activity}</ul></section>\
             </main>",
            name = user.name,
        ),
    })
}

/// Replay a chart layout as inline SVG
fn chart_svg(layout: &ChartLayout) -> String {
    let mut svg = format!(
        "<svg id=\"moodChart\" width=\"{}\" height=\"{}\">",
        layout.width, layout.height
    );

    for axis in &layout.axes {
        svg.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
            axis.from.x, axis.from.y, axis.to.x, axis.to.y
        ));
    }
    for segment in &layout.segments {
        let points: Vec<String> = segment.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
        svg.push_str(&format!(
            "<polyline fill=\"none\" points=\"{}\"/>",
            points.join(" ")
        ));
    }
    for marker in &layout.markers {
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"3\"/>",
            marker.x, marker.y
        ));
    }
    for label in &layout.value_labels {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\">{}</text>",
            label.at.x, label.at.y, label.text
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn rounded_label(average: Option<f64>) -> String {
    match average {
        Some(avg) => mood_label(avg.round() as u8).to_string(),
        None => "No data".to_string(),
    }
}

fn home_body() -> String {
    "<main class=\"main-container\">\
     <section class=\"hero-section\">\
     <p class=\"motto\">You don't have to struggle in silence</p>\
     <a href=\"#get-started\" class=\"nav-link\">GET STARTED</a>\
     </section>\
     </main>"
        .to_string()
}

fn about_body() -> String {
    "<main class=\"main-container\">\
     <h1>About MindTrack</h1>\
     <p>MindTrack is dedicated to supporting mental health and well-being \
     in our community.</p>\
     </main>"
        .to_string()
}

fn work_body() -> String {
    "<main class=\"main-container\">\
     <h1>Work With Us</h1>\
     <p>Join our team of counselors, volunteers and developers.</p>\
     </main>"
        .to_string()
}

fn events_body() -> String {
    "<main class=\"main-container\">\
     <h1>Events</h1>\
     <p>Workshops, guided meditation sessions and community meetups.</p>\
     </main>"
        .to_string()
}

fn contact_body() -> String {
    "<main class=\"main-container\">\
     <h1>Contact Us</h1>\
     <p>Reach us any time; we are here just for you.</p>\
     </main>"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::session::SessionManager;
    use crate::storage::{handle, MemoryStore, MoodEntry, StoreHandle};
    use crate::users::UserStore;

    fn setup() -> (StoreHandle, UserStore, SessionManager) {
        let durable = handle(MemoryStore::new());
        let users = UserStore::new(durable.clone());
        let manager =
            SessionManager::new(users.clone(), durable.clone(), handle(MemoryStore::new()));
        (durable, users, manager)
    }

    #[test]
    fn test_dashboard_redirects_without_user() {
        let (_durable, users, manager) = setup();
        let ctx = RouteContext {
            users: &users,
            session: &manager,
        };
        let handler = RouteHandler::for_route(Route::Dashboard);

        assert_eq!(
            handler.render(Route::Dashboard, &ctx).unwrap(),
            RouteContent::Redirect(Route::GetStarted)
        );
    }

    #[test]
    fn test_dashboard_shows_no_data_sentinels() {
        let (_durable, users, manager) = setup();
        manager
            .register(&crate::users::tests::profile("ada@example.com"))
            .unwrap();
        let ctx = RouteContext {
            users: &users,
            session: &manager,
        };

        let rendered = RouteHandler::for_route(Route::Dashboard)
            .render(Route::Dashboard, &ctx)
            .unwrap();
        let RouteContent::View(view) = rendered else {
            panic!("expected a view");
        };
        assert!(view.body.contains("Not logged"));
        assert!(view.body.contains("No data"));
        assert!(view.body.contains("0 days"));
    }

    #[test]
    fn test_dashboard_reflects_ledger_writes_since_login() {
        let (durable, users, manager) = setup();
        let session = manager
            .register(&crate::users::tests::profile("ada@example.com"))
            .unwrap();

        // The ledger shares the durable tier; the session snapshot stays stale
        let ledger = Ledger::new(users.clone(), durable);
        ledger
            .record_mood(&session.user.id, MoodEntry::quick(5))
            .unwrap();

        let ctx = RouteContext {
            users: &users,
            session: &manager,
        };
        let rendered = RouteHandler::for_route(Route::Dashboard)
            .render(Route::Dashboard, &ctx)
            .unwrap();
        let RouteContent::View(view) = rendered else {
            panic!("expected a view");
        };
        assert!(view.body.contains("Great"));
        assert!(view.body.contains("1 days"));

        // The single entry shows up as one chart marker
        assert!(view.body.contains("<svg id=\"moodChart\""));
        assert_eq!(view.body.matches("<circle").count(), 1);
    }
}
