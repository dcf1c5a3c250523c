//! Navigation gate over the console's surfaces.

use crate::session::Session;

/// Every surface the console can navigate to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Setup,
    Login,
    ForgotPassword,
    SetPassword,
    Dashboard,
    Products,
    Messages,
    /// Anything else under the protected tree.
    Unknown,
}

impl Route {
    /// Surfaces reachable without a session.
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Setup | Self::Login | Self::ForgotPassword)
    }
}

/// Outcome of evaluating a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Admit,
    Redirect(Route),
}

/// Pure gate: a function of the session and the requested route, holding no
/// state of its own. Callers re-evaluate it on every navigation.
///
/// The set-password surface admits any authenticated session regardless of
/// the first-login flag; the server is the enforcement point for whether a
/// password set is actually required.
pub fn evaluate(session: &Session, requested: Route) -> RouteDecision {
    if requested.is_public() {
        return RouteDecision::Admit;
    }
    if !session.is_authenticated() {
        return RouteDecision::Redirect(Route::Login);
    }
    match requested {
        Route::Unknown => RouteDecision::Redirect(Route::Dashboard),
        _ => RouteDecision::Admit,
    }
}
