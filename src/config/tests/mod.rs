//! Unit tests for imagepub configuration.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`inputs_tests`] - Action input reading
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests
//! - [`resolve_tests`] - Required input validation

mod helpers;
