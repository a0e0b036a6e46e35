//! Scriptable in-memory call adapter.
//!
//! Stands in for a native library when exercising a synthesized surface:
//! records every invocation, replays the last value written through a
//! linked setter from its getter, and serves scripted sibling chains that
//! end in the null sentinel.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::adapter::ForeignCallAdapter;
use crate::error::{CallError, Result};
use crate::value::{Handle, Value};

#[derive(Debug, Default)]
struct PropertyLink {
    getter: String,
    setter: String,
    stored: Option<Value>,
}

#[derive(Debug)]
struct Chain {
    start: Handle,
    items: Vec<Handle>,
}

#[derive(Debug, Default)]
struct ReplayState {
    calls: Vec<(String, Vec<Value>)>,
    queued: HashMap<String, VecDeque<Value>>,
    fixed: HashMap<String, Value>,
    properties: Vec<PropertyLink>,
    chains: Vec<Chain>,
    chain_index: HashMap<String, usize>,
}

/// A [`ForeignCallAdapter`] backed by scripted responses.
#[derive(Debug, Default)]
pub struct ReplayAdapter {
    state: Mutex<ReplayState>,
}

impl ReplayAdapter {
    pub fn new() -> Self {
        ReplayAdapter::default()
    }

    fn lock(&self) -> MutexGuard<'_, ReplayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue one result for the named function (consumed in order).
    pub fn push_result(&self, function: &str, value: Value) {
        self.lock()
            .queued
            .entry(function.to_string())
            .or_default()
            .push_back(value);
    }

    /// Fix the result of the named function for every call.
    pub fn set_result(&self, function: &str, value: Value) {
        self.lock().fixed.insert(function.to_string(), value);
    }

    /// Pair a getter with a setter: after the setter runs, the getter
    /// replays the last value it was given.
    pub fn link_property(&self, getter: &str, setter: &str) {
        self.lock().properties.push(PropertyLink {
            getter: getter.to_string(),
            setter: setter.to_string(),
            stored: None,
        });
    }

    /// Script a sibling chain: calling any of `functions` with `start`
    /// yields the first item, with an item yields its successor, and past
    /// the end yields the null sentinel.
    pub fn script_chain(&self, functions: &[&str], start: Handle, items: Vec<Handle>) {
        let mut state = self.lock();
        let index = state.chains.len();
        state.chains.push(Chain { start, items });
        for function in functions {
            state.chain_index.insert((*function).to_string(), index);
        }
    }

    /// Every recorded invocation, in order.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.lock().calls.clone()
    }

    /// How many times the named function was invoked.
    pub fn call_count(&self, function: &str) -> usize {
        self.lock().calls.iter().filter(|(f, _)| f == function).count()
    }
}

impl ForeignCallAdapter for ReplayAdapter {
    fn invoke(&self, function: &str, args: &[Value]) -> Result<Value> {
        let mut state = self.lock();
        state.calls.push((function.to_string(), args.to_vec()));

        if let Some(link) = state.properties.iter_mut().find(|l| l.setter == function) {
            // The written value is the last argument; the receiver is first.
            link.stored = args.last().cloned();
            return Ok(Value::Unit);
        }
        if let Some(link) = state.properties.iter().find(|l| l.getter == function) {
            if let Some(stored) = &link.stored {
                return Ok(stored.clone());
            }
        }

        if let Some(&index) = state.chain_index.get(function) {
            let chain = &state.chains[index];
            let arg = args
                .first()
                .and_then(Value::as_handle)
                .ok_or_else(|| CallError::Foreign(format!("chain step '{function}' needs a handle argument")))?;
            let next = if arg == chain.start {
                chain.items.first().copied()
            } else {
                chain
                    .items
                    .iter()
                    .position(|h| *h == arg)
                    .and_then(|i| chain.items.get(i + 1))
                    .copied()
            };
            return Ok(Value::Handle(next.unwrap_or(Handle::NULL)));
        }

        if let Some(queue) = state.queued.get_mut(function) {
            if let Some(value) = queue.pop_front() {
                return Ok(value);
            }
        }
        if let Some(value) = state.fixed.get(function) {
            return Ok(value.clone());
        }
        Ok(Value::Unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls() {
        let adapter = ReplayAdapter::new();
        adapter.invoke("LLVMDumpValue", &[Value::Handle(Handle::new(7))]).unwrap();
        assert_eq!(adapter.call_count("LLVMDumpValue"), 1);
        assert_eq!(adapter.calls()[0].0, "LLVMDumpValue");
    }

    #[test]
    fn queued_then_fixed_results() {
        let adapter = ReplayAdapter::new();
        adapter.set_result("LLVMGetBar", Value::Int(1));
        adapter.push_result("LLVMGetBar", Value::Int(99));

        // Queue drains first, then the fixed result takes over.
        assert_eq!(adapter.invoke("LLVMGetBar", &[]).unwrap(), Value::Int(99));
        assert_eq!(adapter.invoke("LLVMGetBar", &[]).unwrap(), Value::Int(1));
        assert_eq!(adapter.invoke("LLVMGetBar", &[]).unwrap(), Value::Int(1));
    }

    #[test]
    fn property_link_replays_last_set() {
        let adapter = ReplayAdapter::new();
        adapter.link_property("LLVMGetBar", "LLVMSetBar");

        let receiver = Value::Handle(Handle::new(1));
        adapter.invoke("LLVMSetBar", &[receiver.clone(), Value::Int(41)]).unwrap();
        adapter.invoke("LLVMSetBar", &[receiver.clone(), Value::Int(42)]).unwrap();
        assert_eq!(adapter.invoke("LLVMGetBar", &[receiver]).unwrap(), Value::Int(42));
    }

    #[test]
    fn chain_walks_and_terminates() {
        let adapter = ReplayAdapter::new();
        let start = Handle::new(0x10);
        let items = vec![Handle::new(1), Handle::new(2)];
        adapter.script_chain(&["LLVMGetNextFoo"], start, items);

        let step = |h: Handle| {
            adapter
                .invoke("LLVMGetNextFoo", &[Value::Handle(h)])
                .unwrap()
                .as_handle()
                .unwrap()
        };
        assert_eq!(step(start), Handle::new(1));
        assert_eq!(step(Handle::new(1)), Handle::new(2));
        assert_eq!(step(Handle::new(2)), Handle::NULL);
    }
}
