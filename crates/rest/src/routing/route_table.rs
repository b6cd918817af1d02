use crate::reference::Reference;
use crate::routing::{Route, RouteError, RouteId, RouterConfig, RoutingMode};
use crate::template::{MatchResult, MatchingMode, Template};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// An ordered set of routes and the policy selecting one of them for an input.
///
/// Registration order is significant: it breaks ties in [`RoutingMode::Best`] and
/// drives the scan of [`RoutingMode::First`], [`RoutingMode::Last`] and
/// [`RoutingMode::Next`]. The round robin cursor of [`RoutingMode::Next`] is the only
/// state shared between dispatches; it is updated with a compare and swap so that
/// concurrent dispatches never claim the same position.
#[derive(Debug)]
pub struct RouteTable<T> {
    routes: Vec<Route<T>>,
    default_route: Option<Route<T>>,
    config: RouterConfig,
    cursor: AtomicUsize,
    next_id: u64,
}

/// The route selected for an input.
#[derive(Debug)]
pub struct RouteMatch<'table, T> {
    route: &'table Route<T>,
    score: f64,
    bindings: MatchResult,
    is_default: bool,
}

impl<'table, T> RouteMatch<'table, T> {
    #[inline]
    pub fn route(&self) -> &'table Route<T> {
        self.route
    }

    #[inline]
    pub fn id(&self) -> RouteId {
        self.route.id()
    }

    #[inline]
    pub fn target(&self) -> &'table T {
        self.route.target()
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn bindings(&self) -> &MatchResult {
        &self.bindings
    }

    /// Value bound to the template variable `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name)
    }

    /// Whether no attached route was eligible and the default route was used.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

impl<T> RouteTable<T> {
    pub fn new(config: RouterConfig) -> Result<Self, RouteError> {
        if !(0.0..=1.0).contains(&config.required_score) {
            return Err(RouteError::invalid_required_score(config.required_score));
        }
        Ok(Self { routes: Vec::new(), default_route: None, config, cursor: AtomicUsize::new(0), next_id: 0 })
    }

    pub fn builder() -> RouteTableBuilder<T> {
        RouteTableBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> RoutingMode {
        self.config.mode
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Attached routes in registration order, the default route excluded.
    pub fn routes(&self) -> impl Iterator<Item = &Route<T>> {
        self.routes.iter()
    }

    pub fn route(&self, id: RouteId) -> Option<&Route<T>> {
        self.routes.iter().find(|route| route.id() == id)
    }

    pub fn default_route(&self) -> Option<&Route<T>> {
        self.default_route.as_ref()
    }

    /// Compiles `pattern` with the table's matching mode and case sensitivity, then attaches it.
    pub fn attach(&mut self, pattern: &str, target: T) -> Result<RouteId, RouteError> {
        let template = Template::builder(pattern)
            .matching_mode(self.config.default_matching_mode)
            .case_sensitive(self.config.case_sensitive)
            .compile()?;
        Ok(self.attach_with(template, target))
    }

    /// Attaches an already compiled template, keeping its own matching settings.
    pub fn attach_with(&mut self, template: Template, target: T) -> RouteId {
        let id = self.allocate_id();
        debug!(route = %id, pattern = template.pattern(), "attached route");
        self.routes.push(Route::new(id, template, target));
        id
    }

    /// Sets the route used when no attached route is eligible. It matches any input.
    pub fn set_default(&mut self, target: T) -> RouteId {
        let id = self.allocate_id();
        let template = Template::builder("").matching_mode(MatchingMode::StartsWith).compile();
        // an empty pattern has no variable, so it always compiles
        if let Ok(template) = template {
            self.default_route = Some(Route::new(id, template, target));
        }
        id
    }

    pub fn clear_default(&mut self) -> Option<Route<T>> {
        self.default_route.take()
    }

    /// Removes the attached route `id` and hands it back.
    pub fn detach(&mut self, id: RouteId) -> Result<Route<T>, RouteError> {
        let index = self.routes.iter().position(|route| route.id() == id).ok_or_else(|| RouteError::unknown_route(id))?;
        let route = self.routes.remove(index);
        let cursor = self.cursor.get_mut();
        if index < *cursor {
            *cursor -= 1;
        }
        *cursor = cursor.checked_rem(self.routes.len()).unwrap_or(0);
        debug!(route = %id, "detached route");
        Ok(route)
    }

    fn allocate_id(&mut self) -> RouteId {
        let id = RouteId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Selects the route for `input` according to the routing mode, falling back to
    /// the default route. `None` means that nothing matched.
    pub fn dispatch(&self, input: &str) -> Option<RouteMatch<'_, T>> {
        let required_score = self.config.required_score;
        let eligible = |route: &Route<T>| route.evaluate(input, required_score).filter(|(score, _)| *score >= required_score);

        let selected = match self.config.mode {
            RoutingMode::Best => self.select_best(&eligible),
            RoutingMode::First => self.routes.iter().find_map(|route| eligible(route).map(|evaluated| (route, evaluated))),
            RoutingMode::Last => self.routes.iter().rev().find_map(|route| eligible(route).map(|evaluated| (route, evaluated))),
            RoutingMode::Next => self.select_next(&eligible),
            RoutingMode::Random => self.select_random(&eligible),
        };

        if let Some((route, (score, bindings))) = selected {
            debug!(mode = ?self.config.mode, route = %route.id(), pattern = route.template().pattern(), input, score, "selected route");
            return Some(RouteMatch { route, score, bindings, is_default: false });
        }

        let route = self.default_route.as_ref()?;
        let (score, bindings) = route.evaluate(input, required_score)?;
        debug!(route = %route.id(), input, "default route selected");
        Some(RouteMatch { route, score, bindings, is_default: true })
    }

    /// Dispatches the remaining part of `reference`, its query taking part only when
    /// the table matches queries.
    pub fn dispatch_ref(&self, reference: &Reference) -> Option<RouteMatch<'_, T>> {
        let mut remaining = reference.remaining_part();
        if !self.config.matching_query
            && let Some(index) = remaining.find('?')
        {
            remaining.truncate(index);
        }
        self.dispatch(&remaining)
    }

    fn select_best<F>(&self, eligible: &F) -> Option<(&Route<T>, (f64, MatchResult))>
    where
        F: Fn(&Route<T>) -> Option<(f64, MatchResult)>,
    {
        let mut best: Option<(&Route<T>, (f64, MatchResult))> = None;
        for route in &self.routes {
            if let Some(evaluated) = eligible(route)
                && best.as_ref().is_none_or(|(_, (score, _))| evaluated.0 > *score)
            {
                best = Some((route, evaluated));
            }
        }
        best
    }

    fn select_next<F>(&self, eligible: &F) -> Option<(&Route<T>, (f64, MatchResult))>
    where
        F: Fn(&Route<T>) -> Option<(f64, MatchResult)>,
    {
        let len = self.routes.len();
        if len == 0 {
            return None;
        }

        loop {
            let current = self.cursor.load(Ordering::Acquire);
            let start = current % len;
            let (index, evaluated) =
                (0..len).map(|offset| (start + offset) % len).find_map(|index| eligible(&self.routes[index]).map(|e| (index, e)))?;

            if self.cursor.compare_exchange(current, (index + 1) % len, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                return Some((&self.routes[index], evaluated));
            }
        }
    }

    fn select_random<F>(&self, eligible: &F) -> Option<(&Route<T>, (f64, MatchResult))>
    where
        F: Fn(&Route<T>) -> Option<(f64, MatchResult)>,
    {
        let mut candidates: Vec<_> =
            self.routes.iter().filter_map(|route| eligible(route).map(|evaluated| (route, evaluated))).collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates.swap_remove(fastrand::usize(..candidates.len())))
    }
}

/// Collects the routes of a [`RouteTable`] before validating its configuration.
#[derive(Debug)]
pub struct RouteTableBuilder<T> {
    config: RouterConfig,
    routes: Vec<(String, T)>,
    templates: Vec<(Template, T)>,
    default_target: Option<T>,
}

impl<T> RouteTableBuilder<T> {
    fn new() -> Self {
        Self { config: RouterConfig::default(), routes: Vec::new(), templates: Vec::new(), default_target: None }
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mode(mut self, mode: RoutingMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn required_score(mut self, required_score: f64) -> Self {
        self.config.required_score = required_score;
        self
    }

    /// Attaches `pattern`, compiled with the table settings, at build time.
    pub fn route(mut self, pattern: impl Into<String>, target: T) -> Self {
        self.routes.push((pattern.into(), target));
        self
    }

    /// Attaches a template compiled with its own settings, after the routes given by pattern.
    pub fn template(mut self, template: Template, target: T) -> Self {
        self.templates.push((template, target));
        self
    }

    pub fn default_route(mut self, target: T) -> Self {
        self.default_target = Some(target);
        self
    }

    pub fn build(self) -> Result<RouteTable<T>, RouteError> {
        let mut table = RouteTable::new(self.config)?;
        for (pattern, target) in self.routes {
            table.attach(&pattern, target)?;
        }
        for (template, target) in self.templates {
            table.attach_with(template, target);
        }
        if let Some(target) = self.default_target {
            table.set_default(target);
        }
        Ok(table)
    }
}
