// ABOUTME: Configuration module for the Fournee build server
// ABOUTME: Environment-variable based runtime configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fournee

/// Environment-based server configuration
pub mod environment;
