// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Global error interceptor.
//!
//! Out-of-band errors reach the recovery core through two doors: an `Err`
//! returned from a scheduled callback, and a panic unwinding out of a body or
//! callback. Both end up as one [`InterceptedError`].
//!
//! Panics are seen twice: first by the process panic hook (which knows the
//! source location), then by [`guarded`] as an unwind payload. The hook parks
//! what it saw in a thread-local slot and `guarded` collects it, so the pair
//! becomes a single error.
//!
//! The process-wide hook is installed once and only captures panics raised on
//! a thread with a live [`HookRegistration`]; everything else is forwarded to
//! the hook that was installed before.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::registry::NodeId;
use crate::thrown::Thrown;

static INSTALL_HOOK: Once = Once::new();

#[derive(Default)]
struct PanicSlot {
    /// Live registrations on this thread
    depth: usize,
    last: Option<PanicRecord>,
}

struct PanicRecord {
    message: Option<String>,
    location: Option<String>,
}

thread_local! {
    static SLOT: RefCell<PanicSlot> = RefCell::new(PanicSlot::default());
    static FAULTS: Cell<u64> = const { Cell::new(0) };
}

fn record_fault() {
    let _ = FAULTS.try_with(|faults| faults.set(faults.get().saturating_add(1)));
}

fn current_faults() -> u64 {
    FAULTS.try_with(Cell::get).unwrap_or(0)
}

fn payload_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        Some((*message).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let captured = SLOT
                .try_with(|slot| match slot.try_borrow_mut() {
                    Ok(mut slot) if slot.depth > 0 => {
                        slot.last = Some(PanicRecord {
                            message: payload_message(info.payload()),
                            location: info.location().map(|loc| {
                                format!("{}:{}:{}", loc.file(), loc.line(), loc.column())
                            }),
                        });
                        true
                    }
                    Ok(_) => false,
                    Err(_) => {
                        record_fault();
                        true
                    }
                })
                .unwrap_or(false);

            if !captured {
                previous(info);
            }
        }));
    });
}

fn take_record() -> Option<PanicRecord> {
    SLOT.try_with(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => slot.last.take(),
        Err(_) => {
            record_fault();
            None
        }
    })
    .ok()
    .flatten()
}

/// Scoped claim on the panic hook for the current thread.
///
/// Registrations nest; panics are captured while at least one is alive.
/// Not `Send`: the claim belongs to the thread that made it.
pub struct HookRegistration {
    _thread_bound: PhantomData<*const ()>,
}

impl HookRegistration {
    pub fn new() -> Self {
        install_hook();
        let registered = SLOT
            .try_with(|slot| match slot.try_borrow_mut() {
                Ok(mut slot) => {
                    slot.depth += 1;
                    true
                }
                Err(_) => false,
            })
            .unwrap_or(false);
        if !registered {
            record_fault();
        }
        Self {
            _thread_bound: PhantomData,
        }
    }

    /// Whether the current thread has a live registration
    pub fn is_active() -> bool {
        SLOT.try_with(|slot| slot.try_borrow().map(|slot| slot.depth > 0).unwrap_or(false))
            .unwrap_or(false)
    }
}

impl Default for HookRegistration {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HookRegistration {
    fn drop(&mut self) {
        let _ = SLOT.try_with(|slot| {
            if let Ok(mut slot) = slot.try_borrow_mut() {
                slot.depth = slot.depth.saturating_sub(1);
                if slot.depth == 0 {
                    slot.last = None;
                }
            }
        });
    }
}

/// Run `f`, turning a panic into an `Err` carrying the panic message.
///
/// The source location is filled in when a [`HookRegistration`] is alive on
/// this thread.
pub fn guarded<R>(f: impl FnOnce() -> Result<R, Thrown>) -> Result<R, Thrown> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let record = take_record();
            let location = record.as_ref().and_then(|r| r.location.clone());
            let message = payload_message(payload.as_ref())
                .or_else(|| record.and_then(|r| r.message))
                .unwrap_or_else(|| "panic with a non-string payload".to_string());
            Err(Thrown::panic(message, location))
        }
    }
}

/// An out-of-band error, stamped for attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterceptedError {
    /// Monotonic per interceptor
    pub seq: u64,
    /// Virtual time of interception
    pub at_ms: u64,
    /// Runnable that scheduled the failing callback, if any
    pub owner: Option<NodeId>,
    pub error: Thrown,
}

/// Entry point for out-of-band errors during one run.
pub struct Interceptor {
    next_seq: u64,
    fault_baseline: u64,
    _registration: HookRegistration,
}

impl Interceptor {
    /// Register for the lifetime of the returned value
    pub fn register() -> Self {
        let fault_baseline = current_faults();
        Self {
            next_seq: 0,
            fault_baseline,
            _registration: HookRegistration::new(),
        }
    }

    pub fn intercept(&mut self, error: Thrown, at_ms: u64, owner: Option<NodeId>) -> InterceptedError {
        let seq = self.next_seq;
        self.next_seq += 1;
        InterceptedError {
            seq,
            at_ms,
            owner,
            error,
        }
    }

    /// Errors intercepted so far
    pub fn intercepted(&self) -> u64 {
        self.next_seq
    }

    /// Interception failures on this thread since registration
    pub fn faults(&self) -> u64 {
        current_faults().saturating_sub(self.fault_baseline)
    }
}

#[cfg(test)]
#[path = "intercept_tests.rs"]
mod tests;
