// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Positional settlement values

use std::fmt;
use std::iter::FromIterator;
use std::ops::{Deref, Index};
use std::rc::Rc;
use std::slice::{self, SliceIndex};

/// The ordered values a `Deferred` was settled with.
///
/// Built once at settlement and never mutated afterwards. Cloning shares the
/// underlying storage, so every reaction and every piped master sees the very
/// same sequence.
pub struct Args<T> {
    values: Rc<[T]>,
}

impl<T: Default> Args<T> {
    /// Collect positional values. An empty input holds a single `T::default()`.
    pub fn new<I>(values: I) -> Args<T>
        where I: IntoIterator<Item = T>
    {
        let mut values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            values.push(T::default());
        }
        Args { values: values.into() }
    }
}

impl<T> Args<T> {
    pub fn single(value: T) -> Args<T> {
        Args { values: Rc::from(vec![value]) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.values.get(idx)
    }

    /// The value in position 0
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<T> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> Clone for Args<T> {
    fn clone(&self) -> Args<T> {
        Args { values: self.values.clone() }
    }
}

impl<T> Deref for Args<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.values
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for Args<T> {
    type Output = I::Output;

    fn index(&self, idx: I) -> &I::Output {
        &self.values[idx]
    }
}

impl<'a, T> IntoIterator for &'a Args<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.values.iter()
    }
}

impl<T: Default> FromIterator<T> for Args<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Args<T> {
        Args::new(iter)
    }
}

impl<T: PartialEq> PartialEq for Args<T> {
    fn eq(&self, other: &Args<T>) -> bool {
        self.values[..] == other.values[..]
    }
}

impl<T: PartialEq> PartialEq<[T]> for Args<T> {
    fn eq(&self, other: &[T]) -> bool {
        &self.values[..] == other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Args<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.values[..] == &other[..]
    }
}

impl<T: fmt::Debug> fmt::Debug for Args<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}
