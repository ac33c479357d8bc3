// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

//  Permission is hereby granted, free of charge, to any person obtaining a
//  copy of this software and associated documentation files (the "Software"),
//  to deal in the Software without restriction, including without limitation
//  the rights to use, copy, modify, merge, publish, distribute, sublicense,
//  and/or sell copies of the Software, and to permit persons to whom the
//  Software is furnished to do so, subject to the following conditions:
//
//  The above copyright notice and this permission notice shall be included in
//  all copies or substantial portions of the Software.
//
//  THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
//  OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//  FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//  AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//  LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
//  FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
//  DEALINGS IN THE SOFTWARE.

//! Deferred values with synchronous reactions and pipe composition
//!
//! Everything here runs on the calling thread: settling a `Deferred` invokes
//! its reactions before `resolve`/`reject` returns, and registering a reaction
//! on an already settled `Deferred` invokes it before `done`/`fail` returns.

#[macro_use]
extern crate log;

pub use crate::args::Args;
pub use crate::deferred::{Deferred, Piped, Promise, Reaction};
pub use crate::error::{Error, Result};
pub use crate::options::{Dispatch, Options};
pub use crate::state::State;

pub mod args;
pub mod deferred;
pub mod error;
pub mod options;
pub mod state;

/// Deferred configuration. Provides detailed control over the properties and behavior of new deferreds.
pub struct Builder {
    opts: Options,
}

impl Builder {
    /// Generates the base configuration for a deferred, from which configuration methods can be chained.
    pub fn new() -> Builder {
        Builder { opts: Options::new() }
    }

    /// Names the deferred-to-be. The name shows up in log output and `Debug`.
    #[inline]
    pub fn name(mut self, name: String) -> Builder {
        self.opts.name = Some(name);
        self
    }

    /// Sets how panicking reactions are treated.
    #[inline]
    pub fn dispatch(mut self, dispatch: Dispatch) -> Builder {
        self.opts.dispatch = dispatch;
        self
    }

    /// Create a pending deferred
    #[inline]
    pub fn build<T: 'static>(self) -> Deferred<T> {
        Deferred::with_options(self.opts)
    }

    /// Create a pending deferred and hand it to `init` before returning it
    pub fn build_with<T, F>(self, init: F) -> Deferred<T>
        where T: 'static,
              F: FnOnce(&Deferred<T>)
    {
        let d = Deferred::with_options(self.opts);
        init(&d);
        d
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}
