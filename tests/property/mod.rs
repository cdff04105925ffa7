//! Property-based tests for merge and auth group rules
