// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Route handlers for the HTTP API.

pub mod auth;
pub mod calendar;
pub mod call_logs;
pub mod clients;
pub mod dashboard;
pub mod messages;
pub mod properties;
pub mod saved_searches;
