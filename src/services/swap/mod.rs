// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

pub mod amount;
pub mod approval;
pub mod batch;
pub mod executor;
pub mod quote;
pub mod types;
