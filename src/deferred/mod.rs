// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Single-settlement deferred values
//!
//! A `Deferred` starts out `Pending` and is settled exactly once, either by
//! `resolve` or by `reject`. Reactions registered with `done` and `fail` are
//! invoked synchronously in registration order, and a reaction registered after
//! settlement runs immediately with the stored values.
//!
//! ```
//! use deferred::Deferred;
//!
//! let d = Deferred::<i32>::new();
//! d.done(|args| assert_eq!(args[..], [5, 6]));
//! d.resolve_with(vec![5, 6]).unwrap();
//! assert!(d.is_resolved());
//! ```

mod cores;
mod pipe;

pub use self::cores::Reaction;
pub use self::pipe::*;

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::args::Args;
use crate::error::Result;
use crate::options::Options;
use crate::state::State;

use self::cores::Core;

/// The capability set that makes a value chainable
///
/// A pipe transform that hands back a `Promise` binds the piped master to that
/// promise's eventual settlement instead of resolving with it as a plain value.
pub trait Promise<T> {
    fn state(&self) -> State;
    fn on_done(&self, reaction: Reaction<T>);
    fn on_fail(&self, reaction: Reaction<T>);
    fn value(&self) -> Option<Args<T>>;
}

impl<T, P: Promise<T> + ?Sized> Promise<T> for Box<P> {
    fn state(&self) -> State {
        (**self).state()
    }

    fn on_done(&self, reaction: Reaction<T>) {
        (**self).on_done(reaction)
    }

    fn on_fail(&self, reaction: Reaction<T>) {
        (**self).on_fail(reaction)
    }

    fn value(&self) -> Option<Args<T>> {
        (**self).value()
    }
}

impl<T, P: Promise<T> + ?Sized> Promise<T> for Rc<P> {
    fn state(&self) -> State {
        (**self).state()
    }

    fn on_done(&self, reaction: Reaction<T>) {
        (**self).on_done(reaction)
    }

    fn on_fail(&self, reaction: Reaction<T>) {
        (**self).on_fail(reaction)
    }

    fn value(&self) -> Option<Args<T>> {
        (**self).value()
    }
}

/// A handle to a single-settlement value.
///
/// Cloning the handle does not clone the value: every clone observes and may
/// settle the same instance.
pub struct Deferred<T> {
    core: Rc<Core<T>>,
}

impl<T: 'static> Deferred<T> {
    /// Create a pending `Deferred` with default options
    pub fn new() -> Deferred<T> {
        Deferred::with_options(Options::new())
    }

    pub fn with_options(opts: Options) -> Deferred<T> {
        Deferred { core: Rc::new(Core::new(opts)) }
    }

    /// Create a pending `Deferred` and hand it to `init` before returning it
    pub fn with_init<F>(init: F) -> Deferred<T>
        where F: FnOnce(&Deferred<T>)
    {
        let d = Deferred::new();
        init(&d);
        d
    }

    /// Create a `Deferred` already resolved with `value`
    pub fn resolved(value: T) -> Deferred<T> {
        Deferred { core: Rc::new(Core::settled(Options::new(), State::Resolved, Args::single(value))) }
    }

    /// Create a `Deferred` already rejected with `value`
    pub fn rejected(value: T) -> Deferred<T> {
        Deferred { core: Rc::new(Core::settled(Options::new(), State::Rejected, Args::single(value))) }
    }

    /// Resolve with a single positional value
    pub fn resolve(&self, value: T) -> Result<&Deferred<T>> {
        self.resolve_args(Args::single(value))
    }

    /// Resolve with any number of positional values.
    ///
    /// No values at all settle with a single `T::default()`.
    pub fn resolve_with<I>(&self, values: I) -> Result<&Deferred<T>>
        where I: IntoIterator<Item = T>,
              T: Default
    {
        self.resolve_args(Args::new(values))
    }

    pub fn resolve_args(&self, args: Args<T>) -> Result<&Deferred<T>> {
        self.core.settle(State::Resolved, args)?;
        Ok(self)
    }

    /// Reject with a single positional value
    pub fn reject(&self, value: T) -> Result<&Deferred<T>> {
        self.reject_args(Args::single(value))
    }

    /// Reject with any number of positional values.
    ///
    /// No values at all settle with a single `T::default()`.
    pub fn reject_with<I>(&self, values: I) -> Result<&Deferred<T>>
        where I: IntoIterator<Item = T>,
              T: Default
    {
        self.reject_args(Args::new(values))
    }

    pub fn reject_args(&self, args: Args<T>) -> Result<&Deferred<T>> {
        self.core.settle(State::Rejected, args)?;
        Ok(self)
    }

    /// Register a success reaction
    pub fn done<F>(&self, f: F) -> &Deferred<T>
        where F: FnOnce(&Args<T>) + 'static
    {
        self.core.subscribe(State::Resolved, Box::new(f));
        self
    }

    /// Register a failure reaction
    pub fn fail<F>(&self, f: F) -> &Deferred<T>
        where F: FnOnce(&Args<T>) + 'static
    {
        self.core.subscribe(State::Rejected, Box::new(f));
        self
    }

    /// Register a success and a failure reaction at once, either may be `None`
    pub fn then<D, F>(&self, on_done: Option<D>, on_fail: Option<F>) -> &Deferred<T>
        where D: FnOnce(&Args<T>) + 'static,
              F: FnOnce(&Args<T>) + 'static
    {
        if let Some(f) = on_done {
            self.done(f);
        }
        if let Some(f) = on_fail {
            self.fail(f);
        }
        self
    }

    /// Register a reaction that runs on either outcome
    pub fn always<F>(&self, f: F) -> &Deferred<T>
        where F: FnOnce(&Args<T>) + 'static
    {
        let slot = Rc::new(Cell::new(Some(f)));
        let other = slot.clone();

        self.then(Some(move |args: &Args<T>| if let Some(f) = slot.take() {
                      f(args)
                  }),
                  Some(move |args: &Args<T>| if let Some(f) = other.take() {
                      f(args)
                  }))
    }

    #[inline]
    pub fn state(&self) -> State {
        self.core.state()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state() == State::Pending
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.state() == State::Resolved
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        self.state() == State::Rejected
    }

    /// The positional values this `Deferred` was settled with, `None` while pending
    pub fn value(&self) -> Option<Args<T>> {
        self.core.args()
    }

    pub fn name(&self) -> Option<&str> {
        self.core.options().name.as_ref().map(|s| &s[..])
    }

    /// Check whether `candidate` carries the `Promise` capability set for `T`
    ///
    /// The check goes by concrete type: it recognizes `Deferred<T>`,
    /// `Box<dyn Promise<T>>` and `Rc<dyn Promise<T>>`. Any other type that
    /// implements `Promise<T>` must be boxed or put behind an `Rc` as a
    /// trait object first, otherwise the answer is `false`.
    pub fn is_promise(candidate: &dyn Any) -> bool {
        candidate.is::<Deferred<T>>() || candidate.is::<Box<dyn Promise<T>>>() ||
        candidate.is::<Rc<dyn Promise<T>>>()
    }
}

impl<T: 'static> Promise<T> for Deferred<T> {
    fn state(&self) -> State {
        self.core.state()
    }

    fn on_done(&self, reaction: Reaction<T>) {
        self.core.subscribe(State::Resolved, reaction)
    }

    fn on_fail(&self, reaction: Reaction<T>) {
        self.core.subscribe(State::Rejected, reaction)
    }

    fn value(&self) -> Option<Args<T>> {
        self.core.args()
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Deferred<T> {
        Deferred { core: self.core.clone() }
    }
}

impl<T: 'static> Default for Deferred<T> {
    fn default() -> Deferred<T> {
        Deferred::new()
    }
}

impl<T: 'static> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("name", &self.core.label())
            .field("state", &self.state())
            .finish()
    }
}
