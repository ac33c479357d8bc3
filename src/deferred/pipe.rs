// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pipe composition

use crate::args::Args;
use crate::options::Options;
use crate::state::State;

use super::{Deferred, Promise};

/// What a pipe transform hands back
pub enum Piped<T> {
    /// Resolve the master with this as its only positional value
    Value(T),
    /// Resolve the master with all of these positional values
    Args(Args<T>),
    /// Settle the master however this promise eventually settles
    Promise(Box<dyn Promise<T>>),
}

impl<T> Piped<T> {
    #[inline]
    pub fn value(value: T) -> Piped<T> {
        Piped::Value(value)
    }

    /// Resolve the master with several positional values.
    ///
    /// No values at all resolve with a single `T::default()`.
    pub fn values<I>(values: I) -> Piped<T>
        where I: IntoIterator<Item = T>,
              T: Default
    {
        Piped::Args(Args::new(values))
    }

    pub fn promise<P>(promise: P) -> Piped<T>
        where P: Promise<T> + 'static
    {
        Piped::Promise(Box::new(promise))
    }

    pub fn is_promise(&self) -> bool {
        match *self {
            Piped::Promise(..) => true,
            Piped::Value(..) | Piped::Args(..) => false,
        }
    }
}

impl<T: 'static> From<Deferred<T>> for Piped<T> {
    fn from(d: Deferred<T>) -> Piped<T> {
        Piped::Promise(Box::new(d))
    }
}

impl<T: 'static> Deferred<T> {
    /// Derive a master `Deferred` from this one.
    ///
    /// When this deferred resolves, `on_done` (or `on_fail` on rejection) is
    /// called with the settled values. A plain `Piped::Value` resolves the master
    /// right away, a `Piped::Promise` keeps it pending until that promise
    /// settles and then mirrors it. A missing transform passes the settlement
    /// through untouched.
    pub fn pipe<D, F>(&self, on_done: Option<D>, on_fail: Option<F>) -> Deferred<T>
        where D: FnOnce(&Args<T>) -> Piped<T> + 'static,
              F: FnOnce(&Args<T>) -> Piped<T> + 'static
    {
        let master = Deferred::with_options(self.child_options());

        let m = master.clone();
        self.done(move |args| match on_done {
            Some(transform) => forward(&m, transform(args)),
            None => mirror(&m, State::Resolved, args.clone()),
        });

        let m = master.clone();
        self.fail(move |args| match on_fail {
            Some(transform) => forward(&m, transform(args)),
            None => mirror(&m, State::Rejected, args.clone()),
        });

        master
    }

    /// `pipe` with only a success transform
    pub fn pipe_done<D>(&self, on_done: D) -> Deferred<T>
        where D: FnOnce(&Args<T>) -> Piped<T> + 'static
    {
        self.pipe(Some(on_done), None::<fn(&Args<T>) -> Piped<T>>)
    }

    /// `pipe` with only a failure transform
    pub fn pipe_fail<F>(&self, on_fail: F) -> Deferred<T>
        where F: FnOnce(&Args<T>) -> Piped<T> + 'static
    {
        self.pipe(None::<fn(&Args<T>) -> Piped<T>>, Some(on_fail))
    }

    fn child_options(&self) -> Options {
        let parent = self.core.options();
        Options {
            name: parent.name.as_ref().map(|name| format!("{}|pipe", name)),
            dispatch: parent.dispatch,
        }
    }
}

fn forward<T: 'static>(master: &Deferred<T>, piped: Piped<T>) {
    match piped {
        Piped::Value(value) => mirror(master, State::Resolved, Args::single(value)),
        Piped::Args(args) => mirror(master, State::Resolved, args),
        Piped::Promise(promise) => {
            trace!("deferred {}: bound to a returned promise ({})",
                   master.core.label(),
                   promise.state());

            let m = master.clone();
            promise.on_done(Box::new(move |args: &Args<T>| mirror(&m, State::Resolved, args.clone())));
            let m = master.clone();
            promise.on_fail(Box::new(move |args: &Args<T>| mirror(&m, State::Rejected, args.clone())));
        }
    }
}

fn mirror<T: 'static>(master: &Deferred<T>, state: State, args: Args<T>) {
    // Someone holding the master may have settled it by hand already
    if let Err(err) = master.core.settle(state, args) {
        debug!("deferred {}: piped settlement dropped: {}", master.core.label(), err);
    }
}
