// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

use crate::state::State;

/// Errors raised by settlement calls.
///
/// A rejected `Deferred` is not an error, it is an outcome delivered to the
/// failure reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("deferred is already fulfilled ({state})")]
    AlreadySettled { state: State },
}

pub type Result<T> = ::std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_message_mentions_fulfilled() {
        let err = Error::AlreadySettled { state: State::Rejected };
        let msg = err.to_string();
        assert!(msg.contains("fulfilled"));
        assert!(msg.contains("rejected"));
    }
}
