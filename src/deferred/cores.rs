// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::panic::{self, AssertUnwindSafe};

use crate::args::Args;
use crate::error::{Error, Result};
use crate::options::{Dispatch, Options};
use crate::state::State;

/// A callback registered with `done` or `fail`. Invoked at most once.
pub type Reaction<T> = Box<dyn FnOnce(&Args<T>)>;

pub struct CoreInner<T> {
    state: State,
    args: Option<Args<T>>,
    done: Vec<Reaction<T>>,
    fail: Vec<Reaction<T>>,
    // Reactions still to run while `settle` is dispatching
    queue: VecDeque<Reaction<T>>,
    dispatching: bool,
}

/// The shared data behind every handle of one `Deferred`
///
/// The `RefCell` is never borrowed while a reaction runs, so reactions are free
/// to register more reactions or settle other deferreds.
pub struct Core<T> {
    opts: Options,
    inner: RefCell<CoreInner<T>>,
}

impl<T: 'static> Core<T> {
    pub fn new(opts: Options) -> Core<T> {
        Core {
            opts: opts,
            inner: RefCell::new(CoreInner {
                state: State::Pending,
                args: None,
                done: Vec::new(),
                fail: Vec::new(),
                queue: VecDeque::new(),
                dispatching: false,
            }),
        }
    }

    pub fn settled(opts: Options, state: State, args: Args<T>) -> Core<T> {
        debug_assert!(state.is_settled());
        Core {
            opts: opts,
            inner: RefCell::new(CoreInner {
                state: state,
                args: Some(args),
                done: Vec::new(),
                fail: Vec::new(),
                queue: VecDeque::new(),
                dispatching: false,
            }),
        }
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn label(&self) -> &str {
        self.opts.name.as_ref().map(|s| &s[..]).unwrap_or("<anonymous>")
    }

    #[inline]
    pub fn state(&self) -> State {
        self.inner.borrow().state
    }

    pub fn args(&self) -> Option<Args<T>> {
        self.inner.borrow().args.clone()
    }

    /// Transition out of `Pending` and fire the reactions of `state`.
    ///
    /// Reactions registered for the other outcome are dropped unrun.
    pub fn settle(&self, state: State, args: Args<T>) -> Result<()> {
        debug_assert!(state.is_settled());

        let (count, discarded) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_settled() {
                debug!("deferred {}: refusing to settle as {}, already {}",
                       self.label(),
                       state,
                       inner.state);
                return Err(Error::AlreadySettled { state: inner.state });
            }

            inner.state = state;
            inner.args = Some(args.clone());

            let done = mem::replace(&mut inner.done, Vec::new());
            let fail = mem::replace(&mut inner.fail, Vec::new());
            let (fired, discarded) = match state {
                State::Resolved => (done, fail),
                _ => (fail, done),
            };

            inner.queue.extend(fired);
            inner.dispatching = true;
            (inner.queue.len(), discarded)
        };
        drop(discarded);

        debug!("deferred {}: {} with {} value(s), dispatching {} reaction(s)",
               self.label(),
               state,
               args.len(),
               count);

        let _guard = DispatchGuard(self);
        loop {
            let reaction = self.inner.borrow_mut().queue.pop_front();
            match reaction {
                Some(reaction) => self.invoke(reaction, &args),
                None => break,
            }
        }

        Ok(())
    }

    /// Queue `reaction` for `on`, or run it right away if already settled that way.
    pub fn subscribe(&self, on: State, reaction: Reaction<T>) {
        debug_assert!(on.is_settled());

        let args = {
            let mut inner = self.inner.borrow_mut();
            match inner.state {
                State::Pending => {
                    let list = if on == State::Resolved {
                        &mut inner.done
                    } else {
                        &mut inner.fail
                    };
                    list.push(reaction);
                    trace!("deferred {}: queued {} reaction #{}",
                           self.label(),
                           on,
                           list.len());
                    return;
                }
                state if state == on && inner.dispatching => {
                    // Run after the reactions registered before it
                    inner.queue.push_back(reaction);
                    return;
                }
                state if state == on => inner.args.clone(),
                _ => None,
            }
        };

        match args {
            Some(args) => {
                trace!("deferred {}: already {}, invoking late reaction", self.label(), on);
                self.invoke(reaction, &args);
            }
            None => {}
        }
    }

    fn invoke(&self, reaction: Reaction<T>, args: &Args<T>) {
        match self.opts.dispatch {
            Dispatch::Propagate => reaction(args),
            Dispatch::Isolate => {
                if let Err(err) = panic::catch_unwind(AssertUnwindSafe(move || reaction(args))) {
                    error!("deferred {}: reaction panicked: {}",
                           self.label(),
                           panic_message(&*err));
                }
            }
        }
    }
}

/// Ends a dispatch round, also when a reaction unwinds out of it.
///
/// Reactions left in the queue by a panic are dropped unrun.
struct DispatchGuard<'a, T: 'static>(&'a Core<T>);

impl<'a, T: 'static> Drop for DispatchGuard<'a, T> {
    fn drop(&mut self) {
        let leftover = {
            let mut inner = self.0.inner.borrow_mut();
            inner.dispatching = false;
            mem::replace(&mut inner.queue, VecDeque::new())
        };
        if !leftover.is_empty() {
            debug!("deferred {}: dropping {} reaction(s) after a panic",
                   self.0.label(),
                   leftover.len());
        }
    }
}

fn panic_message(err: &(dyn Any + Send)) -> &str {
    if let Some(msg) = err.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = err.downcast_ref::<String>() {
        &msg[..]
    } else {
        "Box<Any>"
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counter(hits: &Rc<Cell<usize>>) -> Reaction<i32> {
        let hits = hits.clone();
        Box::new(move |_: &Args<i32>| hits.set(hits.get() + 1))
    }

    #[test]
    fn test_settle_once() {
        let core = Core::<i32>::new(Options::new());
        assert!(core.settle(State::Resolved, Args::single(1)).is_ok());
        assert_eq!(core.settle(State::Rejected, Args::single(2)),
                   Err(Error::AlreadySettled { state: State::Resolved }));
        assert_eq!(core.state(), State::Resolved);
        assert_eq!(core.args().unwrap()[0], 1);
    }

    #[test]
    fn test_other_outcome_is_dropped() {
        let hits = Rc::new(Cell::new(0));
        let core = Core::<i32>::new(Options::new());
        core.subscribe(State::Resolved, counter(&hits));
        core.subscribe(State::Rejected, counter(&hits));
        core.settle(State::Rejected, Args::single(0)).unwrap();
        assert_eq!(hits.get(), 1);

        core.subscribe(State::Resolved, counter(&hits));
        assert_eq!(hits.get(), 1);
        core.subscribe(State::Rejected, counter(&hits));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_settled_constructor() {
        let hits = Rc::new(Cell::new(0));
        let core = Core::settled(Options::new(), State::Resolved, Args::single(7));
        core.subscribe(State::Resolved, counter(&hits));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_registration_during_dispatch_is_fifo() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let core = Rc::new(Core::<i32>::new(Options::new()));

        let (o, c) = (order.clone(), core.clone());
        core.subscribe(State::Resolved,
                       Box::new(move |_: &Args<i32>| {
                           o.borrow_mut().push("A");
                           let o = o.clone();
                           c.subscribe(State::Resolved,
                                       Box::new(move |_: &Args<i32>| o.borrow_mut().push("C")));
                       }));
        let o = order.clone();
        core.subscribe(State::Resolved,
                       Box::new(move |_: &Args<i32>| o.borrow_mut().push("B")));

        core.settle(State::Resolved, Args::single(1)).unwrap();
        assert_eq!(*order.borrow(), vec!["A", "B", "C"]);

        // once dispatch is over, late reactions run immediately again
        let o = order.clone();
        core.subscribe(State::Resolved,
                       Box::new(move |_: &Args<i32>| o.borrow_mut().push("D")));
        assert_eq!(*order.borrow(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_panic_clears_queue() {
        let hits = Rc::new(Cell::new(0));
        let core = Core::<i32>::new(Options::new());
        core.subscribe(State::Resolved, Box::new(|_: &Args<i32>| panic!("boom")));
        core.subscribe(State::Resolved, counter(&hits));

        let result = panic::catch_unwind(AssertUnwindSafe(|| core.settle(State::Resolved, Args::single(1))));
        assert!(result.is_err());
        assert_eq!(hits.get(), 0);

        core.subscribe(State::Resolved, counter(&hits));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_panic_message() {
        let err = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(&*err), "boom");
    }
}
