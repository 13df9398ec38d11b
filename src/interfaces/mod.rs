//! Interface adapters exposing the workflow to the outside world.

pub mod http;
