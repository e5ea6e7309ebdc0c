/*
 * Shared Layer
 *
 * Models and utilities used across features.
 */

pub mod cancellation;
pub mod models;
