// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deferred options

use std::default::Default;

/// What happens when a reaction panics while being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The panic unwinds into whoever triggered the dispatch. The settlement
    /// stays in place, reactions queued behind the panicking one never run.
    Propagate,
    /// Every reaction runs inside `catch_unwind`. A panic is logged and the
    /// remaining reactions are still invoked.
    Isolate,
}

impl Default for Dispatch {
    fn default() -> Dispatch {
        Dispatch::Propagate
    }
}

/// Deferred options
#[derive(Debug, Clone)]
pub struct Options {
    pub name: Option<String>,
    pub dispatch: Dispatch,
}

impl Options {
    pub fn new() -> Options {
        Options {
            name: None,
            dispatch: Dispatch::default(),
        }
    }

    pub fn name(&mut self, name: String) -> &mut Options {
        self.name = Some(name);
        self
    }

    pub fn dispatch(&mut self, dispatch: Dispatch) -> &mut Options {
        self.dispatch = dispatch;
        self
    }
}

impl Default for Options {
    fn default() -> Options {
        Options::new()
    }
}
