// SPDX-License-Identifier: MPL-2.0
//! Centralized styles shared across UI components.

pub mod button;
pub mod container;
