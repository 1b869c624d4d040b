//! Callee-side runtime: the object tables behind the opaque handles and the
//! callback slot filled during the handshake.
//!
//! All state lives in one [`Runtime`] value. The exported C functions in
//! [`crate::ffi::raw`] go through a single process-wide instance; unit tests
//! construct their own so nothing leaks between them.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::error::{Error, Result};

/// Callback signature registered by the host during the handshake.
///
/// No payload in, a plain integer out. The return value is observed (logged)
/// but nothing in the protocol branches on it.
pub type CallbackFn = extern "C" fn() -> i32;

/// Counter object state. Mutated only through [`Runtime::counter_increment`].
struct CounterState {
    value: i32,
}

/// Seeded number object state. The stored value is immutable after creation.
struct NumberState {
    value: i32,
}

/// The whole callee side of the boundary.
pub struct Runtime {
    initialized: bool,
    callback: Option<CallbackFn>,
    counters: HashMap<u64, CounterState>,
    numbers: HashMap<u64, NumberState>,
    /// Next handle token. Starts at 1; 0 is the reserved invalid handle.
    next_handle: u64,
    /// Process-wide stream position mixed into `number_generate`, so the
    /// stored seed itself never has to change.
    stream: u64,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            initialized: false,
            callback: None,
            counters: HashMap::new(),
            numbers: HashMap::new(),
            next_handle: 1,
            stream: 0,
        }
    }

    /// Complete the handshake. Idempotent: repeat calls succeed, and the
    /// callback slot is written at most once (the first registration wins).
    pub fn init(&mut self, callback: Option<CallbackFn>) {
        if !self.initialized {
            log::debug!("randcore runtime initialized");
            self.initialized = true;
        }
        if self.callback.is_none() {
            if callback.is_some() {
                log::debug!("host callback registered");
            }
            self.callback = callback;
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Take a copy of the registered callback, if any.
    ///
    /// Callers must invoke it *after* releasing the runtime lock, so the
    /// reverse call may re-enter the library.
    pub fn callback(&self) -> Result<Option<CallbackFn>> {
        self.ensure_initialized()?;
        Ok(self.callback)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn alloc_handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    // Counter objects

    pub fn counter_new(&mut self) -> Result<u64> {
        self.ensure_initialized()?;
        let h = self.alloc_handle();
        self.counters.insert(h, CounterState { value: 0 });
        Ok(h)
    }

    pub fn counter_increment(&mut self, handle: u64) -> Result<i32> {
        self.ensure_initialized()?;
        let state = self.counters.get_mut(&handle).ok_or(Error::InvalidHandle)?;
        state.value = state.value.wrapping_add(1);
        Ok(state.value)
    }

    pub fn counter_value(&self, handle: u64) -> Result<i32> {
        self.ensure_initialized()?;
        let state = self.counters.get(&handle).ok_or(Error::InvalidHandle)?;
        Ok(state.value)
    }

    pub fn counter_free(&mut self, handle: u64) -> Result<()> {
        self.ensure_initialized()?;
        self.counters.remove(&handle).ok_or(Error::InvalidHandle)?;
        log::trace!("counter handle {handle} freed");
        Ok(())
    }

    // Seeded number objects

    pub fn number_new(&mut self, value: i32) -> Result<u64> {
        self.ensure_initialized()?;
        let h = self.alloc_handle();
        self.numbers.insert(h, NumberState { value });
        Ok(h)
    }

    pub fn number_value(&self, handle: u64) -> Result<i32> {
        self.ensure_initialized()?;
        let state = self.numbers.get(&handle).ok_or(Error::InvalidHandle)?;
        Ok(state.value)
    }

    /// Derive a value from the stored seed without touching it. Each call
    /// advances the shared stream position, so repeat calls on the same
    /// handle generally differ.
    pub fn number_generate(&mut self, handle: u64) -> Result<i32> {
        self.ensure_initialized()?;
        let seed = self
            .numbers
            .get(&handle)
            .ok_or(Error::InvalidHandle)?
            .value;
        self.stream = self.stream.wrapping_add(1);
        Ok(splitmix64((seed as u64) ^ self.stream.rotate_left(17)) as i32)
    }

    pub fn number_free(&mut self, handle: u64) -> Result<()> {
        self.ensure_initialized()?;
        self.numbers.remove(&handle).ok_or(Error::InvalidHandle)?;
        log::trace!("number handle {handle} freed");
        Ok(())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// SplitMix64 mixing step.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

static RUNTIME: OnceLock<Mutex<Runtime>> = OnceLock::new();

/// The process-wide runtime instance used by the exported C functions.
pub fn global() -> &'static Mutex<Runtime> {
    RUNTIME.get_or_init(|| Mutex::new(Runtime::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> Runtime {
        let mut rt = Runtime::new();
        rt.init(None);
        rt
    }

    #[test]
    fn test_operations_require_init() {
        let mut rt = Runtime::new();
        assert!(!rt.is_initialized());
        assert!(matches!(rt.counter_new(), Err(Error::NotInitialized)));
        assert!(matches!(rt.number_new(5), Err(Error::NotInitialized)));
        assert!(matches!(rt.callback(), Err(Error::NotInitialized)));

        rt.init(None);
        assert!(rt.is_initialized());
        assert!(rt.counter_new().is_ok());
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut rt = Runtime::new();
        rt.init(None);
        rt.init(None);
        assert!(rt.is_initialized());
    }

    #[test]
    fn test_counter_starts_at_zero_and_counts() {
        let mut rt = initialized();
        let h = rt.counter_new().unwrap();
        assert_eq!(rt.counter_value(h).unwrap(), 0);

        for expected in 1..=5 {
            assert_eq!(rt.counter_increment(h).unwrap(), expected);
        }
        assert_eq!(rt.counter_value(h).unwrap(), 5);
    }

    #[test]
    fn test_counters_are_independent() {
        let mut rt = initialized();
        let a = rt.counter_new().unwrap();
        let b = rt.counter_new().unwrap();
        assert_ne!(a, b, "distinct creations must yield distinct handles");

        rt.counter_increment(a).unwrap();
        rt.counter_increment(a).unwrap();
        assert_eq!(rt.counter_value(a).unwrap(), 2);
        assert_eq!(rt.counter_value(b).unwrap(), 0);
    }

    #[test]
    fn test_counter_free_then_use_is_checked() {
        let mut rt = initialized();
        let h = rt.counter_new().unwrap();
        rt.counter_free(h).unwrap();

        assert!(matches!(rt.counter_value(h), Err(Error::InvalidHandle)));
        assert!(matches!(rt.counter_increment(h), Err(Error::InvalidHandle)));
        // Double free is a checked error, not UB.
        assert!(matches!(rt.counter_free(h), Err(Error::InvalidHandle)));
    }

    #[test]
    fn test_number_stores_creation_value() {
        let mut rt = initialized();
        let h = rt.number_new(5).unwrap();
        assert_eq!(rt.number_value(h).unwrap(), 5);

        let neg = rt.number_new(-42).unwrap();
        assert_eq!(rt.number_value(neg).unwrap(), -42);
    }

    #[test]
    fn test_generate_never_mutates_seed() {
        let mut rt = initialized();
        let h = rt.number_new(5).unwrap();
        for _ in 0..100 {
            rt.number_generate(h).unwrap();
            assert_eq!(rt.number_value(h).unwrap(), 5);
        }
    }

    #[test]
    fn test_identical_seeds_yield_distinct_handles() {
        let mut rt = initialized();
        let a = rt.number_new(7).unwrap();
        let b = rt.number_new(7).unwrap();
        assert_ne!(a, b);
        rt.number_free(a).unwrap();
        assert_eq!(rt.number_value(b).unwrap(), 7);
    }

    #[test]
    fn test_invalid_number_handle() {
        let mut rt = initialized();
        assert!(matches!(rt.number_value(0), Err(Error::InvalidHandle)));
        assert!(matches!(rt.number_generate(999), Err(Error::InvalidHandle)));
        assert!(matches!(rt.number_free(999), Err(Error::InvalidHandle)));
    }

    #[test]
    fn test_handle_namespaces_are_shared_but_typed_tables_reject() {
        let mut rt = initialized();
        let c = rt.counter_new().unwrap();
        // A counter handle is not a number handle.
        assert!(matches!(rt.number_value(c), Err(Error::InvalidHandle)));
    }

    #[test]
    fn test_callback_slot_written_at_most_once() {
        extern "C" fn first() -> i32 {
            1
        }
        extern "C" fn second() -> i32 {
            2
        }

        let mut rt = Runtime::new();
        rt.init(Some(first));
        rt.init(Some(second));

        let cb = rt.callback().unwrap().expect("callback registered");
        assert_eq!(cb(), 1, "first registration must win");
    }
}
