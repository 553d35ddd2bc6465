//! End-to-end tests for opsh.
//!
//! These tests drive the real gateway client against an in-process fake
//! gateway:
//! - Handshake and ping
//! - Workflow smoke test batches, sequential and concurrent
//! - Rejected invocations reported without aborting the batch
//! - Endpoint listing

#![cfg(test)]
