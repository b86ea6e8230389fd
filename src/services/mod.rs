// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod auth;
pub mod auth_middleware;
pub mod calendar;
pub mod call_logs;
pub mod clients;
pub mod dashboard;
pub mod email;
pub mod error;
pub mod logging;
pub mod messages;
pub mod properties;
pub mod query;
pub mod reminders;
pub mod saved_searches;
pub mod search_session;
pub mod storage;
