//! Persistence of goalstep state.
//!  - [key_value::KeyValueStore] is a string key-value store, [key_value::FileKeyValueStore] keeps
//!    every key as a file in the state directory.
//!  - [state_storage::StateStorage] serializes the whole state into one value of that store.

pub mod key_value;
pub mod state_storage;
