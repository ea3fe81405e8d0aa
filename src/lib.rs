//! Workspace-level integration tests for ackpool live under `tests/`.
