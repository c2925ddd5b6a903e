//! End-to-end tests for the Agora engine live in `tests/`.
