// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

extern crate deferred;
extern crate env_logger;
extern crate rand;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use deferred::{Deferred, Error, State};
use rand::{thread_rng, Rng};

const ROUNDS: usize = 200;

/// Interleave random settle attempts and registrations, then check that
/// the first settle wins and every matching reaction fired exactly once.
#[test]
fn test_random_settle_sequences() {
    let _ = env_logger::try_init();

    let mut rng = thread_rng();

    for _ in 0..ROUNDS {
        let d = Deferred::<u32>::new();
        let hits: Rc<RefCell<Vec<(State, usize)>>> = Rc::new(RefCell::new(Vec::new()));
        let mut registered = Vec::new();
        let mut winner: Option<(State, u32)> = None;

        for step in 0..rng.gen_range(1, 30) {
            let value = rng.gen::<u32>();
            match rng.gen_range(0, 4) {
                0 => {
                    let result = d.resolve(value).map(|_| ());
                    match winner {
                        None => {
                            assert!(result.is_ok());
                            winner = Some((State::Resolved, value));
                        }
                        Some((state, _)) => assert_eq!(result, Err(Error::AlreadySettled { state: state })),
                    }
                }
                1 => {
                    let result = d.reject(value).map(|_| ());
                    match winner {
                        None => {
                            assert!(result.is_ok());
                            winner = Some((State::Rejected, value));
                        }
                        Some((state, _)) => assert_eq!(result, Err(Error::AlreadySettled { state: state })),
                    }
                }
                2 => {
                    let h = hits.clone();
                    d.done(move |_| h.borrow_mut().push((State::Resolved, step)));
                    registered.push((State::Resolved, step));
                }
                _ => {
                    let h = hits.clone();
                    d.fail(move |_| h.borrow_mut().push((State::Rejected, step)));
                    registered.push((State::Rejected, step));
                }
            }

            let expected_state = winner.map(|(state, _)| state).unwrap_or(State::Pending);
            assert_eq!(d.state(), expected_state);
        }

        match winner {
            None => {
                assert!(d.is_pending());
                assert!(d.value().is_none());
                assert!(hits.borrow().is_empty());
            }
            Some((state, value)) => {
                assert_eq!(d.value().unwrap(), vec![value]);

                // registration order, filtered to the winning outcome
                let expected: Vec<(State, usize)> =
                    registered.iter().cloned().filter(|&(s, _)| s == state).collect();
                let mut fired = hits.borrow().clone();
                fired.sort_by_key(|&(_, step)| step);
                assert_eq!(fired, expected);
            }
        }
    }
}

#[test]
fn test_reactions_fire_in_registration_order() {
    let mut rng = thread_rng();
    let order = Rc::new(RefCell::new(Vec::new()));
    let d = Deferred::<u8>::new();

    let count = rng.gen_range(1, 64);
    for i in 0..count {
        let o = order.clone();
        d.done(move |_| o.borrow_mut().push(i));
    }
    d.resolve(0).unwrap();

    assert_eq!(*order.borrow(), (0..count).collect::<Vec<_>>());
}

#[test]
fn test_each_reaction_fires_once() {
    let hits = Rc::new(Cell::new(0));
    let d = Deferred::<u8>::new();
    for _ in 0..10 {
        let h = hits.clone();
        d.done(move |_| h.set(h.get() + 1));
    }
    d.resolve(1).unwrap();
    let _ = d.resolve(2);
    let _ = d.reject(3);
    assert_eq!(hits.get(), 10);
}
