// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Minimal future plumbing for blocking in kernel context.

use core::{
    future::Future,
    pin::pin,
    task::{Context, Poll, Waker},
};

/// Drives a future to completion on the current thread of execution.
///
/// The poll loop uses a no-op waker and spins between polls; readiness is
/// re-checked on every iteration, so a wakeup delivered to the no-op waker is
/// never lost. Intended for short waits such as the exit/waitpid rendezvous.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
        core::hint::spin_loop();
    }
}
