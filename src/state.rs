// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settlement state of a `Deferred`

use std::fmt;

/// `Pending` is the only initial state, `Resolved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Pending,
    Resolved,
    Rejected,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match *self {
            State::Pending => "pending",
            State::Resolved => "resolved",
            State::Rejected => "rejected",
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        *self == State::Pending
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }
}

impl Default for State {
    fn default() -> State {
        State::Pending
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
