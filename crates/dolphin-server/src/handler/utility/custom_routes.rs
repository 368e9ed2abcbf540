//! Extension point for mounting extra routes next to the built-in ones.

use aide::axum::ApiRouter;

use crate::service::ServiceState;

/// Function transforming a router after its middleware is applied.
pub type RouterMapFn = fn(ApiRouter<ServiceState>) -> ApiRouter<ServiceState>;

/// Extra routes merged into the API router.
///
/// Protected routes sit behind the API key check together with the parse
/// endpoints; public routes are served next to `/` and `/health`.
///
/// # Examples
///
/// ```rust
/// use dolphin_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new();
/// assert!(custom.is_empty());
/// ```
#[derive(Default, Clone)]
pub struct CustomRoutes {
    protected: Option<ApiRouter<ServiceState>>,
    public: Option<ApiRouter<ServiceState>>,
    protected_map: Option<RouterMapFn>,
}

impl CustomRoutes {
    /// Creates an empty set of routes.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds routes that require an API key, merging with earlier ones.
    pub fn add_protected_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.protected = Some(match self.protected {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Adds routes served without an API key, merging with earlier ones.
    pub fn add_public_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.public = Some(match self.public {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Transforms all protected routes once the API key check is applied.
    pub fn with_protected_map(mut self, f: RouterMapFn) -> Self {
        self.protected_map = Some(f);
        self
    }

    /// Returns true if no extra routes are configured.
    pub fn is_empty(&self) -> bool {
        self.protected.is_none() && self.public.is_none()
    }

    /// Takes the protected routes.
    pub(crate) fn take_protected_routes(&mut self) -> Option<ApiRouter<ServiceState>> {
        self.protected.take()
    }

    /// Takes the public routes.
    pub(crate) fn take_public_routes(&mut self) -> Option<ApiRouter<ServiceState>> {
        self.public.take()
    }

    pub(crate) fn map_protected(&self, routes: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
        match self.protected_map {
            Some(f) => f(routes),
            None => routes,
        }
    }
}

impl std::fmt::Debug for CustomRoutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRoutes")
            .field("protected", &self.protected.is_some())
            .field("public", &self.public.is_some())
            .field("protected_map", &self.protected_map.is_some())
            .finish()
    }
}
