//! Test utilities for the symbol table
