use crate::RequestContext;
use micro_rest::negotiation::Variant;
use std::fmt;

/// A routing target exposing the variants it can represent itself with.
#[cfg_attr(test, mockall::automock)]
pub trait Resource: Send + Sync {
    /// The candidate variants for this request, in order of preference on ties.
    fn variants(&self, context: &RequestContext) -> Vec<Variant>;
}

/// A resource computing its variants with a function.
pub struct FnResource<F> {
    f: F,
}

impl<F> fmt::Debug for FnResource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResource").finish_non_exhaustive()
    }
}

impl<F> Resource for FnResource<F>
where
    F: Fn(&RequestContext) -> Vec<Variant> + Send + Sync,
{
    fn variants(&self, context: &RequestContext) -> Vec<Variant> {
        (self.f)(context)
    }
}

pub fn resource_fn<F>(f: F) -> FnResource<F>
where
    F: Fn(&RequestContext) -> Vec<Variant> + Send + Sync,
{
    FnResource { f }
}

/// A resource whose variants never change.
impl Resource for Vec<Variant> {
    fn variants(&self, _context: &RequestContext) -> Vec<Variant> {
        self.clone()
    }
}
