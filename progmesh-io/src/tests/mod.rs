//! Test modules for progmesh-io
//!
//! This module organizes the tests for the progressive OBJ reader and writer,
//! including file round trips and error reporting.
