//! Property-based tests for loading and weight normalization.
