// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! estate-desk is a real-estate brokerage backend: listing search, saved
//! searches, CRM records, calendar, messaging, and dashboards over Postgres.

pub mod app;
pub mod models;
pub mod routes;
pub mod services;
