// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The application shell hosting the engine.

use alloc::boxed::Box;

/// Controls the host activity (or window) the engine renders into.
///
/// The bridge only ever asks the shell to finish, once, after the engine
/// reports that rendering should stop.
pub trait Shell {
    /// Terminates the hosting application shell.
    fn finish(&mut self);
}

impl<S: Shell + ?Sized> Shell for Box<S> {
    #[inline]
    fn finish(&mut self) {
        (**self).finish();
    }
}

impl<S: Shell + ?Sized> Shell for &mut S {
    #[inline]
    fn finish(&mut self) {
        (**self).finish();
    }
}

/// A [`Shell`] that ignores finish requests.
///
/// Useful for headless runs where nothing hosts the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedShell;

impl Shell for DetachedShell {
    fn finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Shell for Counter {
        fn finish(&mut self) {
            self.0 += 1;
        }
    }

    fn finish_twice<S: Shell>(mut shell: S) {
        shell.finish();
        shell.finish();
    }

    #[test]
    fn borrowed_shell_forwards() {
        let mut counter = Counter(0);
        finish_twice(&mut counter);
        assert_eq!(counter.0, 2, "both finishes reach the inner shell");
    }

    #[test]
    fn boxed_shells_forward() {
        finish_twice(Box::new(DetachedShell));
        let mut counter = Counter(0);
        let boxed: Box<dyn Shell + '_> = Box::new(&mut counter);
        finish_twice(boxed);
        assert_eq!(counter.0, 2, "boxed borrow forwards");
    }
}
