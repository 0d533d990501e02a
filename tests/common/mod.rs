#![allow(dead_code)]

pub mod fake_vision;
pub mod harness;
pub mod http_client;
